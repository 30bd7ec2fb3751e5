//! Server configuration types
//!
//! Contains all configuration structures for the strikebot process.

use serde::{Deserialize, Serialize};
use strikebot_core::{AccessPolicy, EscalationPolicy, DEFAULT_STRIKES_FILE};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub discord: DiscordAppConfig,
    #[serde(default)]
    pub access: AccessPolicy,
    #[serde(default)]
    pub escalation: EscalationPolicy,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Discord settings (the token comes from `DISCORD_BOT_TOKEN`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordAppConfig {
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    #[serde(default)]
    pub guild_id: Option<u64>,
}

impl Default for DiscordAppConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_prefix(),
            guild_id: None,
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

/// Strike file location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_strikes_path")]
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_strikes_path(),
        }
    }
}

fn default_strikes_path() -> String {
    DEFAULT_STRIKES_FILE.to_string()
}
