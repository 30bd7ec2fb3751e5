//! Service - strike operations over the ledger
//!
//! `StrikeService` owns the in-memory ledger and writes it through to the
//! store after every mutation. The ledger sits behind a single async mutex so
//! the threshold check, append and flush of an added strike happen as one
//! step even when the platform delivers commands concurrently.
//!
//! Mutations are staged on a copy of the ledger and only replace it once the
//! store accepts the copy, so a failed flush leaves memory and disk agreeing
//! and the operator can simply retry the command.

use crate::access::{AccessDecision, AccessPolicy};
use crate::error::Result;
use crate::escalation::{self, Escalation, EscalationPolicy};
use crate::gateway::ModerationGateway;
use crate::ledger::{DeleteAmount, Ledger, Removal};
use crate::record::{ChannelId, Issuer, MemberId, RoleId, StrikeRecord, Target, TargetKind};
use crate::store::StrikeStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

/// Reason recorded when none is given
pub const DEFAULT_REASON: &str = "No reason provided";

/// How a notice reached the member
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeDelivery {
    /// Delivered as a private message
    Private,
    /// Private messages closed; posted in the originating channel instead
    PublicFallback,
    /// Could not be delivered at all
    Failed,
}

/// What escalation did after a strike
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscalationReport {
    /// Member is still below the threshold
    NotTriggered,
    /// Leadership roles were removed
    Demoted {
        /// Roles removed
        roles: Vec<RoleId>,
        /// Delivery of the demotion notice
        notice: NoticeDelivery,
    },
    /// Threshold reached, but the member held no leadership role
    NothingToRemove,
    /// Threshold reached, but the platform refused the role removal
    RoleRemovalFailed {
        /// Roles that should have been removed
        roles: Vec<RoleId>,
        /// Gateway error text
        error: String,
    },
}

/// A successfully recorded strike
#[derive(Debug, Clone)]
pub struct StrikeReceipt {
    /// Member struck
    pub member: MemberId,
    /// Record appended
    pub record: StrikeRecord,
    /// Member's strike count after the append
    pub total: usize,
    /// Delivery of the per-strike notice
    pub notice: NoticeDelivery,
    /// Escalation result
    pub escalation: EscalationReport,
}

/// Result of an add-strike request
#[derive(Debug, Clone)]
pub enum AddStrikeOutcome {
    /// Strike recorded
    Added(StrikeReceipt),
    /// Member is already at the threshold; nothing recorded
    LimitReached {
        /// Current strike count
        total: usize,
    },
    /// Target cannot receive strikes (the bot itself or an application)
    TargetRejected(TargetKind),
}

/// Result of a list request
#[derive(Debug, Clone)]
pub enum StrikeListing {
    /// Nobody has strikes
    Empty,
    /// Snapshot of the ledger; iterate it as often as needed
    Entries(Ledger),
}

/// Strike ledger operations with write-through persistence and escalation
pub struct StrikeService {
    ledger: Mutex<Ledger>,
    store: Arc<dyn StrikeStore>,
    gateway: Arc<dyn ModerationGateway>,
    access: AccessPolicy,
    escalation: EscalationPolicy,
}

impl StrikeService {
    /// Create a service over an already loaded ledger
    pub fn new(
        ledger: Ledger,
        store: Arc<dyn StrikeStore>,
        gateway: Arc<dyn ModerationGateway>,
        access: AccessPolicy,
        escalation: EscalationPolicy,
    ) -> Result<Self> {
        escalation.validate()?;
        Ok(Self {
            ledger: Mutex::new(ledger),
            store,
            gateway,
            access,
            escalation,
        })
    }

    /// Load the ledger from `store` and create the service
    pub async fn load(
        store: Arc<dyn StrikeStore>,
        gateway: Arc<dyn ModerationGateway>,
        access: AccessPolicy,
        escalation: EscalationPolicy,
    ) -> Result<Self> {
        let ledger = store.load().await?;
        Self::new(ledger, store, gateway, access, escalation)
    }

    /// Access policy in force
    #[must_use]
    pub fn access_policy(&self) -> &AccessPolicy {
        &self.access
    }

    /// Escalation policy in force
    #[must_use]
    pub fn escalation_policy(&self) -> &EscalationPolicy {
        &self.escalation
    }

    /// Check whether a caller may run a moderation command
    #[must_use]
    pub fn authorize(&self, channel: ChannelId, caller_roles: &[RoleId]) -> AccessDecision {
        self.access.authorize(channel, caller_roles)
    }

    /// Current strike count of a member
    pub async fn count(&self, member: &MemberId) -> usize {
        self.ledger.lock().await.count(member)
    }

    /// Record a strike against `target`
    ///
    /// Refuses the bot itself, application accounts, and members already at
    /// the threshold. After the flush the member is notified privately (or
    /// publicly in `origin` when private messages are closed) and escalation
    /// runs if the threshold was reached.
    #[instrument(skip_all, fields(member_id = %target.id, issuer = %issuer.name))]
    pub async fn add_strike(
        &self,
        target: &Target,
        reason: Option<&str>,
        issuer: &Issuer,
        origin: ChannelId,
    ) -> Result<AddStrikeOutcome> {
        if target.kind != TargetKind::Member {
            info!(kind = ?target.kind, "Strike target rejected");
            return Ok(AddStrikeOutcome::TargetRejected(target.kind));
        }

        let reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(DEFAULT_REASON);

        let (record, total) = {
            let mut ledger = self.ledger.lock().await;
            let count = ledger.count(&target.id);
            if !self.escalation.accepts_strike(count) {
                info!(count, "Strike refused, member already at threshold");
                return Ok(AddStrikeOutcome::LimitReached { total: count });
            }

            let record = StrikeRecord::new(reason, issuer);
            let mut next = ledger.clone();
            let total = next.append(target.id.clone(), record.clone());
            if let Err(e) = self.commit(&mut *ledger, next).await {
                error!(error = %e, total, "Failed to persist strike");
                return Err(e);
            }
            (record, total)
        };

        info!(total, "Strike recorded");

        let threshold = self.escalation.threshold;
        let notice = self
            .deliver(
                &target.id,
                origin,
                &escalation::strike_notice(reason, total, threshold),
                &escalation::public_strike_notice(&target.id.mention(), reason, total, threshold),
            )
            .await;

        let report = self.escalate(target, total, origin).await;

        Ok(AddStrikeOutcome::Added(StrikeReceipt {
            member: target.id.clone(),
            record,
            total,
            notice,
            escalation: report,
        }))
    }

    /// Snapshot of every member's strikes
    pub async fn list_strikes(&self) -> StrikeListing {
        let ledger = self.ledger.lock().await;
        if ledger.is_empty() {
            StrikeListing::Empty
        } else {
            StrikeListing::Entries(ledger.clone())
        }
    }

    /// Remove the oldest strikes of a member
    #[instrument(skip(self), fields(member_id = %member))]
    pub async fn delete_strikes(&self, member: &MemberId, amount: DeleteAmount) -> Result<Removal> {
        let mut ledger = self.ledger.lock().await;
        let mut next = ledger.clone();
        let removal = next.remove(member, amount);
        if removal.is_mutation() {
            if let Err(e) = self.commit(&mut *ledger, next).await {
                error!(error = %e, "Failed to persist strike deletion");
                return Err(e);
            }
            info!(
                removed = removal.removed_count(),
                remaining = ledger.count(member),
                "Strikes deleted"
            );
        }
        Ok(removal)
    }

    /// Remove every strike of every member and return how many members were cleared
    #[instrument(skip(self))]
    pub async fn clear_all(&self) -> Result<usize> {
        let mut ledger = self.ledger.lock().await;
        let cleared = ledger.member_count();
        if let Err(e) = self.commit(&mut *ledger, Ledger::new()).await {
            error!(error = %e, "Failed to persist cleared ledger");
            return Err(e);
        }
        warn!(members = cleared, "All strikes cleared");
        Ok(cleared)
    }

    /// Persist `next` and make it the live ledger; on failure `current` is untouched
    async fn commit(&self, current: &mut Ledger, next: Ledger) -> Result<()> {
        self.store.save(&next).await?;
        *current = next;
        Ok(())
    }

    async fn escalate(&self, target: &Target, total: usize, origin: ChannelId) -> EscalationReport {
        let threshold = self.escalation.threshold;
        match self.escalation.evaluate(total, &target.roles) {
            Escalation::None => EscalationReport::NotTriggered,
            Escalation::NothingToRemove => {
                let text = escalation::threshold_reached_notice(&target.id.mention(), threshold);
                if let Err(e) = self.gateway.send_public(origin, &text).await {
                    warn!(error = %e, "Failed to post threshold notice");
                }
                info!("Threshold reached, no leadership roles held");
                EscalationReport::NothingToRemove
            }
            Escalation::Demote(roles) => {
                let audit_reason = format!("Reached {} strikes", threshold);
                if let Err(e) = self
                    .gateway
                    .remove_roles(&target.id, &roles, &audit_reason)
                    .await
                {
                    error!(error = %e, roles = ?roles, "Failed to remove leadership roles");
                    return EscalationReport::RoleRemovalFailed {
                        roles,
                        error: e.to_string(),
                    };
                }
                warn!(roles = ?roles, "Member demoted");

                let notice = self
                    .deliver(
                        &target.id,
                        origin,
                        &escalation::demotion_notice(threshold, roles.len()),
                        &escalation::public_demotion_notice(&target.id.mention(), threshold),
                    )
                    .await;
                EscalationReport::Demoted { roles, notice }
            }
        }
    }

    async fn deliver(
        &self,
        member: &MemberId,
        origin: ChannelId,
        private_text: &str,
        public_text: &str,
    ) -> NoticeDelivery {
        match self.gateway.send_private(member, private_text).await {
            Ok(()) => NoticeDelivery::Private,
            Err(e) if e.is_private_message_unavailable() => {
                info!(member_id = %member, "Private messages closed, falling back to channel");
                match self.gateway.send_public(origin, public_text).await {
                    Ok(()) => NoticeDelivery::PublicFallback,
                    Err(e) => {
                        warn!(error = %e, "Failed to post fallback notice");
                        NoticeDelivery::Failed
                    }
                }
            }
            Err(e) => {
                warn!(member_id = %member, error = %e, "Failed to send private notice");
                NoticeDelivery::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests;
