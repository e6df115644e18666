//! Error types for the coach signup wizard.

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Field error: {0}")]
    Field(#[from] FieldError),

    #[error("Submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("Invitation error: {0}")]
    Invitation(#[from] InvitationError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {key}. {hint}")]
    MissingRequired { key: String, hint: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failure reported by an external sink.
///
/// The wizard never inspects these; they are handed back to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SinkError {
    #[error("Sink {sink} rejected the request: {reason}")]
    Rejected { sink: String, reason: String },

    #[error("Sink {sink} transport failed: {reason}")]
    Transport { sink: String, reason: String },
}

/// Errors from dispatching a field or mode by name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Unknown profile field: {0}")]
    UnknownField(String),

    #[error("Unknown invitation mode: {0}")]
    UnknownMode(String),
}

/// Errors from submitting the finished profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Cannot submit from step {current}; submission happens on step {last}")]
    NotOnFinalStep { current: u8, last: u8 },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Errors from the invitation sub-flow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvitationError {
    #[error("Invitation mode is {actual}, operation requires {expected}")]
    ModeMismatch { expected: String, actual: String },

    #[error("Invitations are only available on step {last} (currently on step {current})")]
    NotOnInvitationStep { current: u8, last: u8 },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
