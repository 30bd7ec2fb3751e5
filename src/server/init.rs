//! Bot startup
//!
//! Wires the JSON store, the Discord adapter and the strike service together.

use super::config::AppConfig;
use super::loader::load_config;
use super::validation::validate_config;
use anyhow::{Context, Result};
use std::sync::Arc;
use strikebot_channels::{DiscordAdapter, DiscordConfig};
use strikebot_core::{JsonFileStore, ModerationGateway, StrikeService, StrikeStore};
use tracing::{info, warn};

/// Run the bot until the gateway stops or Ctrl+C is received
pub async fn run() -> Result<()> {
    let config = load_config()?;
    validate_config(&config)?;

    let discord = discord_config(&config)?;

    let store: Arc<dyn StrikeStore> = Arc::new(JsonFileStore::new(&config.storage.path));
    let adapter = Arc::new(DiscordAdapter::new(discord));
    let gateway: Arc<dyn ModerationGateway> = adapter.clone();

    let service = StrikeService::load(
        store,
        gateway,
        config.access.clone(),
        config.escalation.clone(),
    )
    .await
    .with_context(|| format!("Failed to load strikes from {}", config.storage.path))?;
    let service = Arc::new(service);

    info!(
        strikes_file = %config.storage.path,
        threshold = config.escalation.threshold,
        allowed_channels = config.access.allowed_channels.len(),
        privileged_roles = config.access.privileged_roles.len(),
        leadership_roles = config.escalation.leadership_roles.len(),
        "Strike service ready"
    );

    tokio::select! {
        result = adapter.run(service) => {
            result.context("Discord adapter stopped")?;
            warn!("Discord client exited");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Token from the environment, prefix and guild from the file unless the
/// environment overrides them
fn discord_config(config: &AppConfig) -> Result<DiscordConfig> {
    let mut discord = DiscordConfig::from_env().context(
        "DISCORD_BOT_TOKEN must be set (in the environment or .env) to start the bot",
    )?;

    if std::env::var("DISCORD_COMMAND_PREFIX").is_err() {
        discord = discord.with_command_prefix(config.discord.command_prefix.clone());
    }
    if discord.guild_id.is_none() {
        discord = discord.with_guild(config.discord.guild_id);
    }

    discord.validate()?;
    Ok(discord)
}
