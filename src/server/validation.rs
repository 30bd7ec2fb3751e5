//! Startup configuration checks
//!
//! Hard errors for values the service cannot run with, warnings for values
//! that make every command unusable.

use super::config::AppConfig;
use anyhow::{Context, Result};
use tracing::warn;

/// Validate the loaded configuration before starting the bot
pub fn validate_config(config: &AppConfig) -> Result<()> {
    config
        .escalation
        .validate()
        .context("Invalid escalation settings")?;

    if config.discord.command_prefix.trim().is_empty() {
        anyhow::bail!("discord.command_prefix must not be empty");
    }

    for issue in config_warnings(config) {
        warn!("{}", issue);
    }

    Ok(())
}

/// Non-fatal problems worth logging at startup
pub fn config_warnings(config: &AppConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.access.allowed_channels.is_empty() {
        warnings.push(
            "access.allowed_channels is empty: strike commands will be refused everywhere"
                .to_string(),
        );
    }
    if config.access.privileged_roles.is_empty() {
        warnings.push(
            "access.privileged_roles is empty: nobody can use strike commands".to_string(),
        );
    }
    if config.escalation.leadership_roles.is_empty() {
        warnings.push(
            "escalation.leadership_roles is empty: reaching the strike limit removes no roles"
                .to_string(),
        );
    }

    warnings
}
