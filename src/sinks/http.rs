//! HTTP submission sink. POSTs the profile as JSON via reqwest.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::SinkError;
use crate::wizard::model::CoachProfile;

use super::SubmissionSink;

const SINK_NAME: &str = "http";

/// Sends the finished profile to a registration endpoint.
pub struct HttpSubmissionSink {
    url: String,
    client: reqwest::Client,
}

impl HttpSubmissionSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SinkError::Transport {
                sink: SINK_NAME.into(),
                reason: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SubmissionSink for HttpSubmissionSink {
    fn name(&self) -> &str {
        SINK_NAME
    }

    async fn submit(&self, profile: &CoachProfile) -> Result<(), SinkError> {
        let resp = self
            .client
            .post(&self.url)
            .json(profile)
            .send()
            .await
            .map_err(|e| SinkError::Transport {
                sink: SINK_NAME.into(),
                reason: format!("POST {} failed: {e}", self.url),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SinkError::Rejected {
                sink: SINK_NAME.into(),
                reason: format!("{status}: {}", body.chars().take(200).collect::<String>()),
            });
        }

        tracing::debug!(url = %self.url, %status, "Profile accepted by endpoint");
        Ok(())
    }
}
