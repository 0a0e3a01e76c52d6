//! Application layer errors

use thiserror::Error;

/// General bot errors raised by platform adapters
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Outcome of handling one webhook call
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("Missing signature header")]
    MissingSignature,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Failed to deliver {failed} of {total} replies")]
    DeliveryFailed { failed: usize, total: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<BotError> for HandlerError {
    fn from(err: BotError) -> Self {
        HandlerError::Internal(err.to_string())
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
