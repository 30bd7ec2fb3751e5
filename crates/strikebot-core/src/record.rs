//! Record - identifiers and strike records
//!
//! Member identifiers are opaque strings (the platform's stable user id
//! rendered as text). Roles and channels use the platform's numeric ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable member identifier used as the ledger key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Wrap a platform id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string representation
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render as a platform mention (`<@id>`)
    #[must_use]
    pub fn mention(&self) -> String {
        format!("<@{}>", self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for MemberId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Role identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleId(pub u64);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub u64);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Staff member issuing a strike
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issuer {
    /// Stable id, when the platform provides one
    pub id: Option<MemberId>,
    /// Display name at time of issuance
    pub name: String,
}

impl Issuer {
    /// Issuer with a stable id and display name
    #[must_use]
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }

    /// Issuer known only by name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// A single strike. Immutable once created.
///
/// The JSON shape is `{"reason": .., "striked_by": ..}`; `issuer_id` and
/// `issued_at` are omitted when absent so older strike files still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikeRecord {
    reason: String,
    striked_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issuer_id: Option<MemberId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issued_at: Option<DateTime<Utc>>,
}

impl StrikeRecord {
    /// Create a record issued now
    #[must_use]
    pub fn new(reason: impl Into<String>, issuer: &Issuer) -> Self {
        Self {
            reason: reason.into(),
            striked_by: issuer.name.clone(),
            issuer_id: issuer.id.clone(),
            issued_at: Some(Utc::now()),
        }
    }

    /// Create a record without a timestamp
    #[must_use]
    pub fn unstamped(reason: impl Into<String>, issuer: &Issuer) -> Self {
        Self {
            issued_at: None,
            ..Self::new(reason, issuer)
        }
    }

    /// Reason text
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Issuer display name
    #[must_use]
    pub fn striked_by(&self) -> &str {
        &self.striked_by
    }

    /// Issuer stable id
    #[must_use]
    pub fn issuer_id(&self) -> Option<&MemberId> {
        self.issuer_id.as_ref()
    }

    /// Issuance time
    #[must_use]
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
    }
}

/// What kind of account a strike target is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Regular human member
    Member,
    /// Automated or application account
    Application,
    /// The bot itself
    SelfBot,
}

/// Resolved strike target
#[derive(Debug, Clone)]
pub struct Target {
    /// Ledger key
    pub id: MemberId,
    /// Display name for messages
    pub display_name: String,
    /// Account kind
    pub kind: TargetKind,
    /// Roles currently held
    pub roles: Vec<RoleId>,
}

impl Target {
    /// Human member holding `roles`
    #[must_use]
    pub fn member(id: impl Into<MemberId>, display_name: impl Into<String>, roles: Vec<RoleId>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind: TargetKind::Member,
            roles,
        }
    }

    /// Set the account kind
    #[must_use]
    pub fn with_kind(mut self, kind: TargetKind) -> Self {
        self.kind = kind;
        self
    }
}
