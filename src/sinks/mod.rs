//! External collaborators the wizard hands its results to.
//!
//! The wizard only knows these traits. Transports live in the submodules:
//! - **http**: POST the finished profile as JSON
//! - **smtp**: email an invitation through an SMTP relay

pub mod http;
pub mod smtp;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::WizardConfig;
use crate::error::{self, SinkError};
use crate::wizard::model::CoachProfile;

pub use http::HttpSubmissionSink;
pub use smtp::SmtpInvitationSink;

/// Accepts a finished profile.
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    /// Sink name, used in logs and errors.
    fn name(&self) -> &str;

    async fn submit(&self, profile: &CoachProfile) -> Result<(), SinkError>;
}

/// Accepts an invitation addressed to one client.
#[async_trait]
pub trait InvitationSink: Send + Sync {
    fn name(&self) -> &str;

    async fn send_invite(&self, email: &str) -> Result<(), SinkError>;
}

/// Receives text to place on the clipboard. Fire-and-forget.
pub trait Clipboard: Send + Sync {
    fn copy(&self, text: &str);
}

/// Client-side navigation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &str);
}

/// Pick the sinks `config` asks for: HTTP and SMTP when configured, logging
/// otherwise.
pub fn from_config(
    config: &WizardConfig,
) -> error::Result<(Arc<dyn SubmissionSink>, Arc<dyn InvitationSink>)> {
    let submission: Arc<dyn SubmissionSink> = match config.submit_url {
        Some(ref url) => Arc::new(HttpSubmissionSink::new(url.clone(), config.http_timeout)?),
        None => Arc::new(LoggingSubmissionSink),
    };

    let invitation: Arc<dyn InvitationSink> = match config.smtp {
        Some(ref smtp) => Arc::new(SmtpInvitationSink::new(
            smtp.clone(),
            config.invite_link.clone(),
        )),
        None => Arc::new(LoggingInvitationSink),
    };

    tracing::debug!(
        submission = submission.name(),
        invitation = invitation.name(),
        "Sinks selected"
    );
    Ok((submission, invitation))
}

/// Submission sink that only logs the profile.
#[derive(Debug, Default)]
pub struct LoggingSubmissionSink;

#[async_trait]
impl SubmissionSink for LoggingSubmissionSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn submit(&self, profile: &CoachProfile) -> Result<(), SinkError> {
        let payload = serde_json::to_string(profile).map_err(|e| SinkError::Rejected {
            sink: "log".into(),
            reason: format!("Failed to serialize profile: {e}"),
        })?;
        tracing::info!(%payload, "Coach profile submitted");
        Ok(())
    }
}

/// Invitation sink that only logs the address.
#[derive(Debug, Default)]
pub struct LoggingInvitationSink;

#[async_trait]
impl InvitationSink for LoggingInvitationSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn send_invite(&self, email: &str) -> Result<(), SinkError> {
        tracing::info!(to = %email, "Invitation sent");
        Ok(())
    }
}

/// Clipboard that keeps the last copied text in memory.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn copy(&self, text: &str) {
        tracing::debug!(len = text.len(), "Copied to clipboard");
        *self
            .contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text.to_string());
    }
}

/// Navigator that records every destination it was asked to visit.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destinations in the order they were requested.
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: &str) {
        tracing::info!(%destination, "Navigating");
        self.visited
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(destination.to_string());
    }
}
