//! Error types for strikebot-channels

use thiserror::Error;

/// Channel error type
#[derive(Debug, Error)]
pub enum Error {
    /// Discord error
    #[error("discord error: {0}")]
    Discord(String),

    /// Message parsing error
    #[error("message parsing error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Strike ledger error
    #[error(transparent)]
    Core(#[from] strikebot_core::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Message safe to post in a public channel
    #[must_use]
    pub fn user_message(&self) -> String {
        use strikebot_core::UserFriendlyError;

        match self {
            Error::Core(e) => e.user_message(),
            Error::Discord(_) => "Discord rejected the request. Please try again.".to_string(),
            Error::Parse(msg) => crate::util::sanitize_error_for_user(msg),
            Error::Config(_) => "The bot is misconfigured. Please contact an administrator.".to_string(),
        }
    }
}
