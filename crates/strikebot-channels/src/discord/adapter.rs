use super::config::DiscordConfig;
use super::handler::DiscordHandler;
use crate::error::{Error, Result};

use serenity::all::{
    ChannelId, Client, CreateAllowedMentions, CreateMessage, GatewayIntents, GuildId, RoleId,
    UserId,
};
use serenity::http::{Http, HttpError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use strikebot_core::{ModerationGateway, StrikeService};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Discord JSON error code for "Cannot send messages to this user"
const DISCORD_CANNOT_DM_USER: isize = 50007;

/// Discord bot adapter
///
/// Runs the serenity client and implements [`ModerationGateway`] over its
/// HTTP client.
pub struct DiscordAdapter {
    pub(crate) config: DiscordConfig,
    pub(crate) bot_user_id: AtomicU64,
    pub(crate) guild_id: AtomicU64,
    pub(crate) http: RwLock<Option<Arc<Http>>>,
}

impl DiscordAdapter {
    /// Create a new Discord adapter
    #[must_use]
    pub fn new(config: DiscordConfig) -> Self {
        let guild_id = config.guild_id.unwrap_or(0);
        Self {
            config,
            bot_user_id: AtomicU64::new(0),
            guild_id: AtomicU64::new(guild_id),
            http: RwLock::new(None),
        }
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        let config = DiscordConfig::from_env()?;
        Ok(Self::new(config))
    }

    /// Command prefix
    #[must_use]
    pub fn command_prefix(&self) -> &str {
        &self.config.command_prefix
    }

    /// Get the bot user ID (0 until connected)
    pub fn bot_user_id(&self) -> u64 {
        self.bot_user_id.load(Ordering::SeqCst)
    }

    /// Moderated guild, once known
    pub fn guild_id(&self) -> Option<u64> {
        match self.guild_id.load(Ordering::SeqCst) {
            0 => None,
            id => Some(id),
        }
    }

    /// Check if a guild is the moderated one
    ///
    /// Before the guild is known every guild is accepted.
    pub fn is_guild_allowed(&self, guild_id: u64) -> bool {
        self.guild_id().map_or(true, |id| id == guild_id)
    }

    pub(crate) fn learn_guild(&self, guild_ids: &[u64]) {
        if self.guild_id().is_some() {
            return;
        }
        match guild_ids {
            [only] => {
                self.guild_id.store(*only, Ordering::SeqCst);
                info!(guild_id = %only, "Moderating the only connected guild");
            }
            _ => warn!(
                guilds = guild_ids.len(),
                "No guild configured and not exactly one guild connected; role removal is disabled until DISCORD_GUILD_ID is set"
            ),
        }
    }

    /// Start the bot with the given strike service
    #[instrument(skip(self, service))]
    pub async fn run(self: Arc<Self>, service: Arc<StrikeService>) -> Result<()> {
        self.config.validate()?;
        info!("Starting Discord bot");

        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let handler = DiscordHandler::new(self.clone(), service);

        let mut client = Client::builder(&self.config.bot_token, intents)
            .event_handler(handler)
            .await
            .map_err(|e| Error::Discord(format!("Failed to create client: {}", e)))?;

        // Store HTTP client for the moderation gateway
        {
            let mut http_guard = self.http.write().await;
            *http_guard = Some(client.http.clone());
        }

        client
            .start()
            .await
            .map_err(|e| Error::Discord(format!("Client error: {}", e)))?;

        Ok(())
    }

    async fn http(&self) -> strikebot_core::Result<Arc<Http>> {
        self.http
            .read()
            .await
            .clone()
            .ok_or_else(|| strikebot_core::Error::Gateway("Not connected".to_string()))
    }
}

/// Message whose text may only ping users
///
/// Reasons are typed by staff and echoed back, so `@everyone`, `@here` and
/// role mentions inside them must stay inert.
pub(crate) fn outgoing(text: &str) -> CreateMessage {
    CreateMessage::new().content(text).allowed_mentions(
        CreateAllowedMentions::new()
            .all_users(true)
            .all_roles(false)
            .everyone(false),
    )
}

fn parse_user(member: &strikebot_core::MemberId) -> strikebot_core::Result<UserId> {
    member
        .as_str()
        .parse::<u64>()
        .ok()
        .filter(|id| *id != 0)
        .map(UserId::new)
        .ok_or_else(|| {
            strikebot_core::Error::Gateway(format!("Invalid Discord user ID: {}", member))
        })
}

/// Whether Discord refused a DM because the user does not accept them
fn is_dm_closed(err: &serenity::Error) -> bool {
    matches!(
        err,
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
            if response.error.code == DISCORD_CANNOT_DM_USER
    )
}

#[async_trait::async_trait]
impl ModerationGateway for DiscordAdapter {
    async fn remove_roles(
        &self,
        member: &strikebot_core::MemberId,
        roles: &[strikebot_core::RoleId],
        reason: &str,
    ) -> strikebot_core::Result<()> {
        let guild_id = self
            .guild_id()
            .map(GuildId::new)
            .ok_or_else(|| strikebot_core::Error::Gateway("Guild not known".to_string()))?;
        let user_id = parse_user(member)?;
        let http = self.http().await?;

        for role in roles {
            http.remove_member_role(guild_id, user_id, RoleId::new(role.0), Some(reason))
                .await
                .map_err(|e| {
                    strikebot_core::Error::Gateway(format!("Failed to remove role {}: {}", role, e))
                })?;
            debug!(member_id = %member, role_id = %role, "Removed role");
        }
        Ok(())
    }

    async fn send_private(
        &self,
        member: &strikebot_core::MemberId,
        text: &str,
    ) -> strikebot_core::Result<()> {
        let user_id = parse_user(member)?;
        let http = self.http().await?;

        let channel = user_id.create_dm_channel(&http).await.map_err(|e| {
            if is_dm_closed(&e) {
                strikebot_core::Error::PrivateMessageUnavailable
            } else {
                strikebot_core::Error::Gateway(format!("Failed to open DM: {}", e))
            }
        })?;

        channel
            .id
            .send_message(&http, outgoing(text))
            .await
            .map_err(|e| {
                if is_dm_closed(&e) {
                    strikebot_core::Error::PrivateMessageUnavailable
                } else {
                    strikebot_core::Error::Gateway(format!("Failed to send DM: {}", e))
                }
            })?;
        Ok(())
    }

    async fn send_public(
        &self,
        channel: strikebot_core::ChannelId,
        text: &str,
    ) -> strikebot_core::Result<()> {
        let http = self.http().await?;

        ChannelId::new(channel.0)
            .send_message(&http, outgoing(text))
            .await
            .map_err(|e| strikebot_core::Error::Gateway(format!("Failed to send message: {}", e)))?;
        Ok(())
    }
}
