use crate::error::{Error, Result};
use serde::Deserialize;

/// Discord bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// Bot token (from DISCORD_BOT_TOKEN env)
    pub bot_token: String,
    /// Command prefix
    #[serde(default = "default_prefix")]
    pub command_prefix: String,
    /// Guild the bot moderates; learned at startup when unset
    #[serde(default)]
    pub guild_id: Option<u64>,
}

fn default_prefix() -> String {
    "!".to_string()
}

impl DiscordConfig {
    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let bot_token = std::env::var("DISCORD_BOT_TOKEN")
            .map_err(|_| Error::Config("DISCORD_BOT_TOKEN not set".to_string()))?;

        let command_prefix = std::env::var("DISCORD_COMMAND_PREFIX")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(default_prefix);

        let guild_id: Option<u64> = std::env::var("DISCORD_GUILD_ID")
            .ok()
            .and_then(|s| s.trim().parse().ok());

        Ok(Self {
            bot_token,
            command_prefix,
            guild_id,
        })
    }

    /// Create with a bot token
    #[must_use]
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            command_prefix: default_prefix(),
            guild_id: None,
        }
    }

    /// Set the command prefix
    #[must_use]
    pub fn with_command_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.command_prefix = prefix.into();
        self
    }

    /// Pin the moderated guild
    #[must_use]
    pub fn with_guild(mut self, guild_id: Option<u64>) -> Self {
        self.guild_id = guild_id;
        self
    }

    /// Reject an empty token or prefix
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            return Err(Error::Config("bot token is empty".to_string()));
        }
        if self.command_prefix.trim().is_empty() {
            return Err(Error::Config("command prefix is empty".to_string()));
        }
        Ok(())
    }
}
