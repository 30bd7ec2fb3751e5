use super::adapter::{outgoing, DiscordAdapter};
use super::commands::{admit, needs_access_check, Admission, DiscordCommands};
use crate::command::{self, Command, MemberRef};
use crate::error::{Error, Result};
use crate::util::{mask_for_logging, sanitize_error_for_user};
use serenity::all::{
    Context, EventHandler, GuildId, Member, Message, MessageReference, Ready, UserId,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use strikebot_core::{ChannelId, Issuer, RoleId, StrikeService, Target, TargetKind};
use tracing::{error, info, warn};

/// Discord event handler
///
/// Routes prefix commands through the access policy to the strike service.
pub struct DiscordHandler {
    adapter: Arc<DiscordAdapter>,
    commands: DiscordCommands,
}

impl DiscordHandler {
    /// Create a new Discord event handler.
    pub fn new(adapter: Arc<DiscordAdapter>, service: Arc<StrikeService>) -> Self {
        Self {
            adapter,
            commands: DiscordCommands::new(service),
        }
    }
}

#[serenity::async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            guilds = ready.guilds.len(),
            "Discord bot connected as {}", ready.user.name
        );

        self.adapter
            .bot_user_id
            .store(ready.user.id.get(), Ordering::SeqCst);

        let guild_ids: Vec<u64> = ready.guilds.iter().map(|g| g.id.get()).collect();
        self.adapter.learn_guild(&guild_ids);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(guild_id) = msg.guild_id else {
            return;
        };
        if !self.adapter.is_guild_allowed(guild_id.get()) {
            return;
        }

        let prefix = self.adapter.command_prefix();
        let Some(parsed) = command::parse(&msg.content, prefix) else {
            return;
        };

        info!(
            channel_id = %msg.channel_id,
            user_id = %msg.author.id,
            text = %mask_for_logging(&msg.content),
            "Received strike command"
        );

        let decision = if needs_access_check(&parsed) {
            match self.caller_roles(&ctx, &msg, guild_id).await {
                Ok(roles) => Some(
                    self.commands
                        .authorize(ChannelId(msg.channel_id.get()), &roles),
                ),
                Err(e) => {
                    let name = parsed.as_ref().map_or("command", Command::name);
                    self.report_failure(&ctx, &msg, name, &e).await;
                    return;
                }
            }
        } else {
            None
        };

        let command = match admit(parsed, decision, prefix) {
            Admission::Dispatch(command) => command,
            Admission::Reply(text) => {
                info!(user_id = %msg.author.id, decision = ?decision, "Strike command not run");
                reply(&ctx, &msg, &text).await;
                return;
            }
            Admission::Ignore => return,
        };

        let name = command.name();
        match self.dispatch(&ctx, &msg, guild_id, command).await {
            Ok(replies) => {
                for text in replies {
                    reply(&ctx, &msg, &text).await;
                }
            }
            Err(e) => self.report_failure(&ctx, &msg, name, &e).await,
        }
    }
}

impl DiscordHandler {
    async fn dispatch(
        &self,
        ctx: &Context,
        msg: &Message,
        guild_id: GuildId,
        command: Command,
    ) -> Result<Vec<String>> {
        match command {
            Command::Strike { target, reason } => {
                let Some(target) = self.resolve_target(ctx, guild_id, target).await? else {
                    return Ok(vec!["I couldn't find that member in this server.".to_string()]);
                };
                let issuer = Issuer::new(msg.author.id.get(), msg.author.name.clone());
                let text = self
                    .commands
                    .handle_strike(
                        &target,
                        reason.as_deref(),
                        &issuer,
                        ChannelId(msg.channel_id.get()),
                    )
                    .await?;
                Ok(vec![text])
            }
            Command::Strikes => Ok(self.commands.handle_strikes().await),
            Command::StrikeDelete { target, amount } => {
                Ok(vec![self.commands.handle_delete(target, amount).await?])
            }
            Command::ClearStrikes => Ok(vec![self.commands.handle_clear().await?]),
            Command::Help => Ok(vec![self
                .commands
                .handle_help(self.adapter.command_prefix())]),
        }
    }

    async fn caller_roles(
        &self,
        ctx: &Context,
        msg: &Message,
        guild_id: GuildId,
    ) -> Result<Vec<RoleId>> {
        if let Some(member) = &msg.member {
            return Ok(member.roles.iter().map(|r| RoleId(r.get())).collect());
        }
        let member = guild_id
            .member(&ctx.http, msg.author.id)
            .await
            .map_err(|e| Error::Discord(format!("Failed to fetch invoking member: {}", e)))?;
        Ok(member.roles.iter().map(|r| RoleId(r.get())).collect())
    }

    async fn resolve_target(
        &self,
        ctx: &Context,
        guild_id: GuildId,
        target: MemberRef,
    ) -> Result<Option<Target>> {
        if target.0 == 0 {
            return Ok(None);
        }
        match guild_id.member(&ctx.http, UserId::new(target.0)).await {
            Ok(member) => Ok(Some(self.to_target(&member))),
            Err(serenity::Error::Http(e)) if e.status_code().map(|s| s.as_u16()) == Some(404) => {
                Ok(None)
            }
            Err(e) => Err(Error::Discord(format!("Failed to fetch member: {}", e))),
        }
    }

    fn to_target(&self, member: &Member) -> Target {
        let kind = if member.user.id.get() == self.adapter.bot_user_id() {
            TargetKind::SelfBot
        } else if member.user.bot {
            TargetKind::Application
        } else {
            TargetKind::Member
        };
        Target::member(
            member.user.id.get(),
            member.display_name().to_string(),
            member.roles.iter().map(|r| RoleId(r.get())).collect(),
        )
        .with_kind(kind)
    }

    /// Command boundary: detail goes to the log and the invoker's DMs, the
    /// channel only sees a sanitized message.
    async fn report_failure(&self, ctx: &Context, msg: &Message, command: &str, err: &Error) {
        error!(command, user_id = %msg.author.id, error = %err, "Strike command failed");

        let public = sanitize_error_for_user(&err.user_message());
        reply(ctx, msg, &format!("Sorry, `{}` failed: {}", command, public)).await;

        let detail = format!("An error occurred while processing `{}`: {}", command, err);
        if let Err(e) = msg
            .author
            .direct_message(&ctx.http, outgoing(&detail))
            .await
        {
            warn!(error = %e, "Failed to send error details to invoker");
        }
    }
}

async fn reply(ctx: &Context, msg: &Message, text: &str) {
    let builder =
        outgoing(text).reference_message(MessageReference::from((msg.channel_id, msg.id)));
    if let Err(e) = msg.channel_id.send_message(&ctx.http, builder).await {
        error!(error = %e, "Failed to send Discord response");
    }
}
