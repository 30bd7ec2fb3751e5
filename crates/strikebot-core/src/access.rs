//! Access - channel and role gate for moderation commands
//!
//! A command is authorized only when it is issued in an allowed channel *and*
//! the caller holds at least one privileged role. The decision says which
//! check failed so the dispatcher can answer differently.

use crate::record::{ChannelId, RoleId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Outcome of an authorization check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Caller may run the command
    Granted,
    /// Command was issued outside the allowed channels
    WrongChannel,
    /// Caller holds none of the privileged roles
    MissingRole,
}

impl AccessDecision {
    /// Check if the command may run
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Channel and role allow-lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    /// Channels where moderation commands are accepted
    #[serde(default)]
    pub allowed_channels: HashSet<ChannelId>,
    /// Roles allowed to run moderation commands
    #[serde(default)]
    pub privileged_roles: HashSet<RoleId>,
}

impl AccessPolicy {
    /// Build a policy from id lists
    #[must_use]
    pub fn new(
        channels: impl IntoIterator<Item = u64>,
        roles: impl IntoIterator<Item = u64>,
    ) -> Self {
        Self {
            allowed_channels: channels.into_iter().map(ChannelId).collect(),
            privileged_roles: roles.into_iter().map(RoleId).collect(),
        }
    }

    /// Decide whether a caller holding `caller_roles` may act in `channel`
    ///
    /// The channel is checked first; empty allow-lists deny everything.
    #[must_use]
    pub fn authorize(&self, channel: ChannelId, caller_roles: &[RoleId]) -> AccessDecision {
        if !self.allowed_channels.contains(&channel) {
            return AccessDecision::WrongChannel;
        }
        if !caller_roles
            .iter()
            .any(|role| self.privileged_roles.contains(role))
        {
            return AccessDecision::MissingRole;
        }
        AccessDecision::Granted
    }

    /// Whether the policy can ever grant access
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.allowed_channels.is_empty() && !self.privileged_roles.is_empty()
    }
}
