//! Error types for strikebot-core
//!
//! Policy outcomes (denied, limit reached, no strikes) are not errors; they are
//! returned as values by the ledger and the service. The variants here are
//! failures the caller has to surface.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Durable write or read of the strike file failed
    #[error("persistence error at {path:?}: {message}")]
    Persistence {
        /// Path of the backing file
        path: PathBuf,
        /// Detailed message
        message: String,
    },

    /// Strike document could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Messaging gateway call failed
    #[error("gateway error: {0}")]
    Gateway(String),

    /// Recipient does not accept private messages
    #[error("private messages are unavailable for this member")]
    PrivateMessageUnavailable,

    /// Invalid configuration
    #[error("invalid configuration: {field}: {message}")]
    InvalidConfig {
        /// Config field name
        field: String,
        /// Detailed message
        message: String,
    },

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a persistence error for `path`
    pub fn persistence(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::Persistence {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Whether the error only means the private channel is closed
    #[must_use]
    pub fn is_private_message_unavailable(&self) -> bool {
        matches!(self, Self::PrivateMessageUnavailable)
    }
}

/// Public-safe rendering of an error
///
/// Diagnostic detail (paths, gateway responses) stays in [`std::fmt::Display`]
/// and goes to logs or to the invoking operator privately.
pub trait UserFriendlyError {
    /// Message that can be posted in a public channel
    fn user_message(&self) -> String;

    /// Hint for the operator, if any
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::Persistence { .. } | Error::Serialization(_) => {
                "The change could not be saved, so nothing was modified. Please try again.".to_string()
            }
            Error::Gateway(_) => "Discord rejected the request. Please try again.".to_string(),
            Error::PrivateMessageUnavailable => {
                "That member does not accept direct messages.".to_string()
            }
            Error::InvalidConfig { field, .. } => {
                format!("The bot is misconfigured ({}).", field)
            }
            Error::Internal(_) => "An internal error occurred. Please try again.".to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::Persistence { path, .. } => Some(format!(
                "Check that {} is writable and the disk is not full.",
                path.display()
            )),
            Error::Serialization(_) => {
                Some("The strike file may be corrupted; inspect it manually.".to_string())
            }
            Error::Gateway(_) => Some(
                "Check that the bot role sits above the roles it manages and has Manage Roles."
                    .to_string(),
            ),
            Error::InvalidConfig { message, .. } => Some(message.clone()),
            Error::PrivateMessageUnavailable | Error::Internal(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_message_hides_path() {
        let err = Error::persistence("/var/lib/strikebot/strikes.json", "disk full");
        assert!(err.to_string().contains("disk full"));
        assert!(!err.user_message().contains("/var/lib"));
        assert!(err.suggestion().unwrap().contains("strikes.json"));
    }

    #[test]
    fn test_persistence_message_is_operation_neutral() {
        let message = Error::persistence("strikes.json", "disk full").user_message();
        assert!(message.starts_with("The change could not be saved"));
        assert!(!message.contains("strike"));
    }

    #[test]
    fn test_private_message_unavailable() {
        assert!(Error::PrivateMessageUnavailable.is_private_message_unavailable());
        assert!(!Error::Gateway("503".into()).is_private_message_unavailable());
    }
}
