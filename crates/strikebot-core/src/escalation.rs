//! Escalation - strike threshold and demotion policy
//!
//! Members move through `0 -> 1 -> 2 -> escalated` as strikes are added. On
//! reaching the threshold the leadership roles they hold are removed. Further
//! strikes are refused while escalated; deleting strikes moves the member
//! back below the threshold and re-arms escalation. Removed roles are never
//! restored automatically.

use crate::error::{Error, Result};
use crate::record::RoleId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Strike count at which a member is demoted
pub const DEFAULT_STRIKE_THRESHOLD: usize = 3;

/// Where a member stands relative to the threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeLevel {
    /// No strikes
    Clear,
    /// Some strikes, below the threshold
    Warned(usize),
    /// At or above the threshold
    Escalated,
}

/// What to do after a strike was recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Escalation {
    /// Still below the threshold
    None,
    /// Threshold reached; remove these roles
    Demote(Vec<RoleId>),
    /// Threshold reached but the member holds no leadership role
    NothingToRemove,
}

/// Threshold and leadership role configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    /// Strikes needed to trigger demotion
    #[serde(default = "default_threshold")]
    pub threshold: usize,
    /// Roles stripped on demotion
    #[serde(default)]
    pub leadership_roles: HashSet<RoleId>,
}

fn default_threshold() -> usize {
    DEFAULT_STRIKE_THRESHOLD
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_STRIKE_THRESHOLD,
            leadership_roles: HashSet::new(),
        }
    }
}

impl EscalationPolicy {
    /// Policy with the default threshold and the given leadership roles
    #[must_use]
    pub fn new(leadership_roles: impl IntoIterator<Item = u64>) -> Self {
        Self {
            leadership_roles: leadership_roles.into_iter().map(RoleId).collect(),
            ..Self::default()
        }
    }

    /// Override the threshold
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    /// Reject a zero threshold
    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(Error::InvalidConfig {
                field: "escalation.threshold".to_string(),
                message: "threshold must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Level for a strike count
    #[must_use]
    pub fn level(&self, count: usize) -> StrikeLevel {
        match count {
            0 => StrikeLevel::Clear,
            n if n >= self.threshold => StrikeLevel::Escalated,
            n => StrikeLevel::Warned(n),
        }
    }

    /// Whether a member with `count` strikes may receive another
    #[must_use]
    pub fn accepts_strike(&self, count: usize) -> bool {
        count < self.threshold
    }

    /// Decide the escalation for a member who now has `count` strikes
    ///
    /// Role order follows `held_roles`; duplicates are dropped.
    #[must_use]
    pub fn evaluate(&self, count: usize, held_roles: &[RoleId]) -> Escalation {
        if self.level(count) != StrikeLevel::Escalated {
            return Escalation::None;
        }

        let mut seen = HashSet::new();
        let to_remove: Vec<RoleId> = held_roles
            .iter()
            .copied()
            .filter(|role| self.leadership_roles.contains(role) && seen.insert(*role))
            .collect();

        if to_remove.is_empty() {
            Escalation::NothingToRemove
        } else {
            Escalation::Demote(to_remove)
        }
    }
}

/// Private notice sent to a member for every strike
#[must_use]
pub fn strike_notice(reason: &str, total: usize, threshold: usize) -> String {
    format!(
        "You have received a strike.\nReason: **{}**\nTotal strikes: {}/{}",
        reason, total, threshold
    )
}

/// Public fallback when the member does not accept private messages
#[must_use]
pub fn public_strike_notice(mention: &str, reason: &str, total: usize, threshold: usize) -> String {
    format!(
        "{} you have received a strike for: **{}**. Total strikes: {}/{} (I could not message you privately.)",
        mention, reason, total, threshold
    )
}

/// Private notice sent when leadership roles were removed
#[must_use]
pub fn demotion_notice(threshold: usize, removed: usize) -> String {
    format!(
        "You have reached {} strikes. {} leadership role{} {} been removed. Contact staff if you believe this is a mistake.",
        threshold,
        removed,
        if removed == 1 { "" } else { "s" },
        if removed == 1 { "has" } else { "have" }
    )
}

/// Public fallback for the demotion notice
#[must_use]
pub fn public_demotion_notice(mention: &str, threshold: usize) -> String {
    format!(
        "{} has reached {} strikes and has been removed from leadership roles.",
        mention, threshold
    )
}

/// Informational message when the member holds no leadership role
#[must_use]
pub fn threshold_reached_notice(mention: &str, threshold: usize) -> String {
    format!(
        "{} has reached {} strikes. They hold no leadership roles, so none were removed.",
        mention, threshold
    )
}
