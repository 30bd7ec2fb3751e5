//! Command - prefix command parsing
//!
//! Turns `!strike <@123> spamming links` style messages into [`Command`]s.
//! Parsing is platform-neutral apart from the mention syntax.

use strikebot_core::MemberId;

/// Usage line for the strike command
pub const STRIKE_USAGE: &str = "strike <member> [reason]";
/// Usage line for the strike delete command
pub const DELETE_USAGE: &str = "strikedelete <member> [amount]";

/// A parsed moderation command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Give a member a strike
    Strike {
        /// Member to strike
        target: MemberRef,
        /// Free-text reason
        reason: Option<String>,
    },
    /// List all strikes
    Strikes,
    /// Delete a member's strikes
    StrikeDelete {
        /// Member whose strikes are deleted
        target: MemberRef,
        /// Number of oldest strikes to delete; `None` deletes all
        amount: Option<usize>,
    },
    /// Delete every strike
    ClearStrikes,
    /// Show help
    Help,
}

impl Command {
    /// Command name as typed after the prefix
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Strike { .. } => "strike",
            Self::Strikes => "strikes",
            Self::StrikeDelete { .. } => "strikedelete",
            Self::ClearStrikes => "clearstrikes",
            Self::Help => "help",
        }
    }

    /// Whether the command needs the access policy to pass
    #[must_use]
    pub fn is_privileged(&self) -> bool {
        !matches!(self, Self::Help)
    }
}

/// Member given by mention or raw id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberRef(pub u64);

impl MemberRef {
    /// Parse `<@123>`, `<@!123>` or `123`
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let inner = token
            .strip_prefix("<@")
            .and_then(|rest| rest.strip_suffix('>'))
            .map(|rest| rest.strip_prefix('!').unwrap_or(rest))
            .unwrap_or(token);

        if inner.is_empty() || !inner.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        inner.parse().ok().map(Self)
    }

    /// Ledger key for this member
    #[must_use]
    pub fn member_id(&self) -> MemberId {
        MemberId::from(self.0)
    }

    /// Mention text
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

/// Why a command could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Member argument missing
    MissingMember {
        /// Usage line to show
        usage: &'static str,
    },
    /// Member argument is not a mention or id
    InvalidMember(String),
    /// Amount is not a non-negative whole number
    InvalidAmount(String),
    /// Unknown command name
    Unknown(String),
}

impl ParseError {
    /// Reply text for the invoker
    #[must_use]
    pub fn reply(&self, prefix: &str) -> String {
        match self {
            Self::MissingMember { usage } => format!("Usage: `{}{}`", prefix, usage),
            Self::InvalidMember(token) => format!(
                "`{}` is not a member. Mention them or use their user ID.",
                token
            ),
            Self::InvalidAmount(token) => format!(
                "`{}` is not a valid amount. Use a whole number, or leave it out to delete all strikes.",
                token
            ),
            Self::Unknown(name) => format!(
                "Unknown command `{}{}`. Try `{}help`.",
                prefix, name, prefix
            ),
        }
    }
}

/// Parse a message
///
/// Returns `None` when the message does not start with `prefix`, so ordinary
/// chat is ignored. Command names are case-insensitive.
#[must_use]
pub fn parse(text: &str, prefix: &str) -> Option<Result<Command, ParseError>> {
    let body = text.trim_start().strip_prefix(prefix)?;
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    let (name, rest) = split_word(body);
    let name = name.to_lowercase();

    let result = match name.as_str() {
        "strike" => parse_target(rest, STRIKE_USAGE).map(|(target, rest)| Command::Strike {
            target,
            reason: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "strikes" => Ok(Command::Strikes),
        "strikedelete" => parse_target(rest, DELETE_USAGE).and_then(|(target, rest)| {
            let (amount, _) = split_word(rest);
            let amount = if amount.is_empty() {
                None
            } else {
                Some(
                    amount
                        .parse::<usize>()
                        .map_err(|_| ParseError::InvalidAmount(amount.to_string()))?,
                )
            };
            Ok(Command::StrikeDelete { target, amount })
        }),
        "clearstrikes" => Ok(Command::ClearStrikes),
        "help" => Ok(Command::Help),
        _ => Err(ParseError::Unknown(name)),
    };
    Some(result)
}

fn parse_target<'a>(
    rest: &'a str,
    usage: &'static str,
) -> Result<(MemberRef, &'a str), ParseError> {
    let (token, rest) = split_word(rest);
    if token.is_empty() {
        return Err(ParseError::MissingMember { usage });
    }
    let target =
        MemberRef::parse(token).ok_or_else(|| ParseError::InvalidMember(token.to_string()))?;
    Ok((target, rest))
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(idx) => (&text[..idx], text[idx..].trim()),
        None => (text, ""),
    }
}

/// Help text listing the commands
#[must_use]
pub fn help_text(prefix: &str, threshold: usize) -> String {
    format!(
        "**Strike commands**\n\
         `{p}strike <member> [reason]` - give a member a strike\n\
         `{p}strikes` - list every member's strikes\n\
         `{p}strikedelete <member> [amount]` - delete the oldest strikes (all if no amount)\n\
         `{p}clearstrikes` - delete every strike\n\
         `{p}help` - show this message\n\
         Members reaching {t} strikes lose their leadership roles.",
        p = prefix,
        t = threshold
    )
}
