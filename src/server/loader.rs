//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Keys that accept comma-separated lists from the environment
const LIST_KEYS: &[&str] = &[
    "access.allowed_channels",
    "access.privileged_roles",
    "escalation.leadership_roles",
];

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let builder = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            File::with_name(&format!(
                "config/{}",
                std::env::var("STRIKEBOT_ENV").unwrap_or_else(|_| "development".to_string())
            ))
            .required(false),
        )
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority)
        .add_source(environment());

    builder
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

/// `STRIKEBOT_ACCESS__ALLOWED_CHANNELS=1,2` style overrides
///
/// prefix_separator("_") keeps a single underscore after the prefix; config-rs
/// otherwise expects `STRIKEBOT__ACCESS__...`.
fn environment() -> Environment {
    LIST_KEYS.iter().fold(
        Environment::with_prefix("STRIKEBOT")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .try_parsing(true),
        |env, key| env.with_list_parse_key(key),
    )
}
