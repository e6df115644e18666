//! Client invitation sub-flow state.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// How the coach invites clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationMode {
    /// Share the coach's invitation link.
    #[default]
    Link,
    /// Send an invitation email to one client.
    Email,
}

impl InvitationMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Link => "Lien d'invitation",
            Self::Email => "Invitation par email",
        }
    }
}

impl std::fmt::Display for InvitationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Link => write!(f, "link"),
            Self::Email => write!(f, "email"),
        }
    }
}

impl FromStr for InvitationMode {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "link" => Ok(Self::Link),
            "email" => Ok(Self::Email),
            other => Err(FieldError::UnknownMode(other.to_string())),
        }
    }
}

/// State of the invitation sub-flow.
///
/// Kept apart from the profile: none of this is part of the submitted payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationState {
    pub mode: InvitationMode,
    /// Address typed in email mode. Survives mode switches.
    pub pending_email_target: String,
    /// Read-only invitation URL supplied by configuration.
    pub generated_link: String,
}

impl InvitationState {
    pub fn new(generated_link: impl Into<String>) -> Self {
        Self {
            mode: InvitationMode::default(),
            pending_email_target: String::new(),
            generated_link: generated_link.into(),
        }
    }

    /// Switch modes. The pending email target is left as typed.
    pub fn set_mode(&mut self, mode: InvitationMode) {
        self.mode = mode;
    }

    /// Update the pending address. No format checks.
    pub fn set_pending_email_target(&mut self, value: impl Into<String>) {
        self.pending_email_target = value.into();
    }

    /// Called after the invitation sink accepted the pending target.
    pub fn mark_sent(&mut self) {
        self.pending_email_target.clear();
    }
}
