//! Error types for webhook verification

use thiserror::Error;

/// Errors that can occur while verifying a webhook delivery
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The signature header is absent or empty
    #[error("webhook has no Gocxl-Signature header")]
    NotSigned,

    /// The signature header is present but malformed
    #[error("webhook has invalid Gocxl-Signature header")]
    InvalidHeader,

    /// No `v1` signature matched the expected signature
    #[error("webhook had no valid signature")]
    NoValidSignature,

    /// The signed timestamp is outside the tolerance window
    #[error("timestamp wasn't within tolerance")]
    TooOld,

    /// Payload deserialization failed after verification
    #[error("Payload error: {0}")]
    Payload(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WebhookError {
    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotSigned => "not_signed",
            Self::InvalidHeader => "invalid_header",
            Self::NoValidSignature => "no_valid_signature",
            Self::TooOld => "too_old",
            Self::Payload(_) => "payload",
            Self::Config(_) => "config",
        }
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::Payload(err.to_string())
    }
}
