use crate::command::{help_text, Command, MemberRef, ParseError};
use crate::error::Result;
use crate::util::{split_message, DISCORD_MESSAGE_LIMIT};
use std::sync::Arc;
use strikebot_core::{
    AccessDecision, AddStrikeOutcome, ChannelId, DeleteAmount, EscalationReport, Issuer, Ledger,
    Removal, RoleId, StrikeListing, StrikeService, Target, TargetKind,
};

/// Discord command handlers
///
/// Each handler runs one strike operation and renders the public reply.
pub struct DiscordCommands {
    service: Arc<StrikeService>,
}

impl DiscordCommands {
    pub fn new(service: Arc<StrikeService>) -> Self {
        Self { service }
    }

    pub fn authorize(&self, channel: ChannelId, caller_roles: &[RoleId]) -> AccessDecision {
        self.service.authorize(channel, caller_roles)
    }

    pub async fn handle_strike(
        &self,
        target: &Target,
        reason: Option<&str>,
        issuer: &Issuer,
        origin: ChannelId,
    ) -> Result<String> {
        let outcome = self
            .service
            .add_strike(target, reason, issuer, origin)
            .await?;
        Ok(render_add(&outcome, target))
    }

    pub async fn handle_strikes(&self) -> Vec<String> {
        match self.service.list_strikes().await {
            StrikeListing::Empty => vec!["No strikes have been given yet.".to_string()],
            StrikeListing::Entries(ledger) => {
                split_message(&render_listing(&ledger), DISCORD_MESSAGE_LIMIT)
            }
        }
    }

    pub async fn handle_delete(&self, target: MemberRef, amount: Option<usize>) -> Result<String> {
        let removal = self
            .service
            .delete_strikes(&target.member_id(), DeleteAmount::from(amount))
            .await?;
        Ok(render_removal(&removal, &target.mention()))
    }

    pub async fn handle_clear(&self) -> Result<String> {
        self.service.clear_all().await?;
        Ok("All strikes have been cleared.".to_string())
    }

    pub fn handle_help(&self, prefix: &str) -> String {
        help_text(prefix, self.service.escalation_policy().threshold)
    }
}

/// What the handler does with a prefixed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// Say nothing
    Ignore,
    /// Reply with this text and stop
    Reply(String),
    /// Run the command
    Dispatch(Command),
}

/// Whether the caller's roles must be checked before [`admit`] can decide
///
/// Only a well-formed `help` skips the access policy; malformed input is gated
/// like the privileged command it was meant to be.
#[must_use]
pub fn needs_access_check(parsed: &std::result::Result<Command, ParseError>) -> bool {
    match parsed {
        Ok(command) => command.is_privileged(),
        Err(_) => true,
    }
}

/// Apply the access policy to a parsed message
///
/// `decision` is `None` when no check was made. Usage errors are only shown to
/// callers the policy admits, and unknown commands from anyone else are
/// ignored so other bots sharing the prefix are not answered.
#[must_use]
pub fn admit(
    parsed: std::result::Result<Command, ParseError>,
    decision: Option<AccessDecision>,
    prefix: &str,
) -> Admission {
    match (parsed, decision) {
        (Ok(command), _) if !command.is_privileged() => Admission::Dispatch(command),
        (Ok(command), Some(AccessDecision::Granted)) => Admission::Dispatch(command),
        (Err(e), Some(AccessDecision::Granted)) => Admission::Reply(e.reply(prefix)),
        (Err(ParseError::Unknown(_)), _) | (_, None) => Admission::Ignore,
        (_, Some(denied)) => render_denial(denied)
            .map_or(Admission::Ignore, |text| Admission::Reply(text.to_string())),
    }
}

/// Reply for a denied command
pub fn render_denial(decision: AccessDecision) -> Option<&'static str> {
    match decision {
        AccessDecision::Granted => None,
        AccessDecision::WrongChannel => {
            Some("Strike commands can only be used in the moderation channel.")
        }
        AccessDecision::MissingRole => Some("You do not have permission to use this command."),
    }
}

/// Reply for an add-strike outcome
pub fn render_add(outcome: &AddStrikeOutcome, target: &Target) -> String {
    let mention = target.id.mention();
    match outcome {
        AddStrikeOutcome::TargetRejected(TargetKind::SelfBot) => {
            "I can't give myself a strike.".to_string()
        }
        AddStrikeOutcome::TargetRejected(_) => "Bots and applications can't receive strikes.".to_string(),
        AddStrikeOutcome::LimitReached { total } => format!(
            "{} already has {} strikes. Delete some with `strikedelete` before adding more.",
            mention, total
        ),
        AddStrikeOutcome::Added(receipt) => {
            let mut reply = format!(
                "Striked {} for: **{}**. Total strikes: {}",
                mention,
                receipt.record.reason(),
                receipt.total
            );
            match &receipt.escalation {
                EscalationReport::NotTriggered | EscalationReport::NothingToRemove => {}
                EscalationReport::Demoted { roles, .. } => reply.push_str(&format!(
                    "\n{} reached the strike limit and lost {} leadership role{}.",
                    mention,
                    roles.len(),
                    if roles.len() == 1 { "" } else { "s" }
                )),
                EscalationReport::RoleRemovalFailed { .. } => reply.push_str(&format!(
                    "\n{} reached the strike limit, but I couldn't remove their leadership roles. Please remove them manually.",
                    mention
                )),
            }
            reply
        }
    }
}

/// Full strike listing
pub fn render_listing(ledger: &Ledger) -> String {
    let mut message = String::from("**Strike list:**\n");
    for (member, history) in ledger {
        message.push_str(&format!(
            "{} ({} strike{}):\n",
            member.mention(),
            history.len(),
            if history.len() > 1 { "s" } else { "" }
        ));
        for strike in history {
            message.push_str(&format!(
                " - **{}**\n   By: {}\n",
                strike.reason(),
                strike.striked_by()
            ));
        }
    }
    message
}

/// Reply for a delete outcome
pub fn render_removal(removal: &Removal, mention: &str) -> String {
    match removal {
        Removal::NoStrikes => format!("{} has no strikes.", mention),
        Removal::Nothing { remaining } => format!(
            "No strikes were deleted from {}. Remaining strikes: {}",
            mention, remaining
        ),
        Removal::All { .. } => format!("All strikes for {} have been deleted.", mention),
        Removal::Partial { removed, remaining } => {
            let removed_text: Vec<String> = removed
                .iter()
                .map(|s| format!("- {} (Striked by: {})", s.reason(), s.striked_by()))
                .collect();
            format!(
                "Deleted {} strike(s) from {}. Remaining strikes: {}\nRemoved strikes:\n{}",
                removed.len(),
                mention,
                remaining,
                removed_text.join("\n")
            )
        }
    }
}
