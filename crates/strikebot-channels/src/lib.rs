//! Strikebot Channels - Discord adapter
//!
//! This crate connects the strike service to Discord:
//! - Command parsing for the `!strike` family of prefix commands
//! - The serenity event handler that gates and dispatches them
//! - The serenity-backed [`strikebot_core::ModerationGateway`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod discord;
pub mod error;
pub mod util;

pub use error::{Error, Result};

pub use command::{Command, MemberRef, ParseError};

// Re-export Discord adapter
pub use discord::{DiscordAdapter, DiscordConfig};
