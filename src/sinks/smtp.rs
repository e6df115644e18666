//! SMTP invitation sink. Emails the coach's invitation link via lettre.

use async_trait::async_trait;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use secrecy::ExposeSecret;

use crate::config::SmtpConfig;
use crate::error::SinkError;

use super::InvitationSink;

const SINK_NAME: &str = "smtp";

const INVITE_SUBJECT: &str = "Votre coach vous invite sur FlexSync";

/// Emails invitations through an SMTP relay.
pub struct SmtpInvitationSink {
    config: SmtpConfig,
    invite_link: String,
}

impl SmtpInvitationSink {
    pub fn new(config: SmtpConfig, invite_link: impl Into<String>) -> Self {
        Self {
            config,
            invite_link: invite_link.into(),
        }
    }

    /// Build the invitation message for `to`.
    fn build_message(&self, to: &str) -> Result<Message, SinkError> {
        Message::builder()
            .from(
                self.config
                    .from_address
                    .parse()
                    .map_err(|e| send_failed(format!("Invalid from address: {e}")))?,
            )
            .to(to.parse().map_err(|e| SinkError::Rejected {
                sink: SINK_NAME.into(),
                reason: format!("Invalid recipient address {to:?}: {e}"),
            })?)
            .subject(INVITE_SUBJECT)
            .body(invite_body(&self.invite_link))
            .map_err(|e| send_failed(format!("Failed to build email: {e}")))
    }
}

fn send_failed(reason: String) -> SinkError {
    SinkError::Transport {
        sink: SINK_NAME.into(),
        reason,
    }
}

fn invite_body(link: &str) -> String {
    format!(
        "Bonjour,\n\n\
         Votre coach vous invite à le rejoindre sur FlexSync.\n\
         Créez votre compte en suivant ce lien : {link}\n"
    )
}

/// Blocking SMTP send. Run it on `spawn_blocking`.
fn send_blocking(config: &SmtpConfig, email: &Message) -> Result<(), SinkError> {
    let creds = Credentials::new(
        config.username.clone(),
        config.password.expose_secret().to_string(),
    );

    let transport = SmtpTransport::relay(&config.host)
        .map_err(|e| send_failed(format!("SMTP relay error: {e}")))?
        .port(config.port)
        .credentials(creds)
        .build();

    transport
        .send(email)
        .map_err(|e| send_failed(format!("SMTP send failed: {e}")))?;
    Ok(())
}

#[async_trait]
impl InvitationSink for SmtpInvitationSink {
    fn name(&self) -> &str {
        SINK_NAME
    }

    async fn send_invite(&self, email: &str) -> Result<(), SinkError> {
        let message = self.build_message(email)?;
        let config = self.config.clone();

        tokio::task::spawn_blocking(move || send_blocking(&config, &message))
            .await
            .map_err(|e| send_failed(format!("SMTP task panicked: {e}")))??;

        tracing::info!(to = %email, "Invitation email sent");
        Ok(())
    }
}
