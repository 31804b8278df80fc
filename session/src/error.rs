//! Error types for sessions, configuration and the analysis webhook.

use thiserror::Error;

/// Errors raised outside of normalization itself.
///
/// Normalization never fails; these cover loading configuration and talking
/// to the analysis webhook.
#[derive(Debug, Error)]
pub enum SessionError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Configuration that parsed but cannot be used.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The webhook could not be reached or the body could not be read.
    #[error("network error: {0}")]
    Transport(String),

    /// The webhook answered with a non-success status.
    #[error("analysis service returned {status}: {body}")]
    ServiceStatus { status: u16, body: String },
}

impl SessionError {
    /// Whether the failure came from the analysis service round trip.
    ///
    /// Callers surface these as a transient "analysis failed" notice and keep
    /// whatever analysis they already display.
    pub fn is_request_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::ServiceStatus { .. })
    }
}

/// Convenience alias for results with [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
