//! Strikebot Core - strike ledger and escalation engine
//!
//! This crate holds the moderation state and policy of strikebot:
//! - Record: member, role and channel ids and strike records
//! - Ledger: per-member strike histories
//! - Store: durable JSON copy of the ledger
//! - Access: channel + role gate for moderation commands
//! - Escalation: strike threshold and leadership demotion
//! - Service: the operations, sequenced with write-through persistence
//!
//! Platform specifics stay behind [`ModerationGateway`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod access;
pub mod error;
pub mod escalation;
pub mod gateway;
pub mod ledger;
pub mod record;
pub mod service;
pub mod store;

pub use access::{AccessDecision, AccessPolicy};
pub use error::{Error, Result, UserFriendlyError};
pub use escalation::{Escalation, EscalationPolicy, StrikeLevel, DEFAULT_STRIKE_THRESHOLD};
pub use gateway::ModerationGateway;
pub use ledger::{DeleteAmount, Ledger, Removal};
pub use record::{ChannelId, Issuer, MemberId, RoleId, StrikeRecord, Target, TargetKind};
pub use service::{
    AddStrikeOutcome, EscalationReport, NoticeDelivery, StrikeListing, StrikeReceipt,
    StrikeService, DEFAULT_REASON,
};
pub use store::{JsonFileStore, MemoryStore, StrikeStore, DEFAULT_STRIKES_FILE};
