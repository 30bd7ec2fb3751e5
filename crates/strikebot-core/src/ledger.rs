//! Ledger - in-memory strike histories
//!
//! Maps each member to the ordered list of strikes issued against them.
//! A member is present only while their history is non-empty; histories are
//! append-only except for [`Ledger::remove`] and [`Ledger::clear`].

use crate::record::{MemberId, StrikeRecord};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

/// How many strikes a delete should remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteAmount {
    /// No amount given: remove the whole history
    All,
    /// Remove up to this many of the oldest strikes (0 removes nothing)
    Oldest(usize),
}

impl From<Option<usize>> for DeleteAmount {
    fn from(amount: Option<usize>) -> Self {
        match amount {
            Some(n) => Self::Oldest(n),
            None => Self::All,
        }
    }
}

/// Result of removing strikes from a member
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal {
    /// Member has no strikes; nothing changed
    NoStrikes,
    /// Amount was zero; nothing changed
    Nothing {
        /// Strikes the member still has
        remaining: usize,
    },
    /// Oldest strikes removed, some remain
    Partial {
        /// Removed records, oldest first
        removed: Vec<StrikeRecord>,
        /// Strikes the member still has
        remaining: usize,
    },
    /// Whole history removed and the member dropped from the ledger
    All {
        /// Removed records, oldest first
        removed: Vec<StrikeRecord>,
    },
}

impl Removal {
    /// Whether the ledger was changed
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Partial { .. } | Self::All { .. })
    }

    /// Number of records removed
    #[must_use]
    pub fn removed_count(&self) -> usize {
        match self {
            Self::Partial { removed, .. } | Self::All { removed } => removed.len(),
            Self::NoStrikes | Self::Nothing { .. } => 0,
        }
    }
}

/// Strike histories keyed by member
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<MemberId, Vec<StrikeRecord>>")]
pub struct Ledger {
    histories: BTreeMap<MemberId, Vec<StrikeRecord>>,
}

impl From<BTreeMap<MemberId, Vec<StrikeRecord>>> for Ledger {
    fn from(mut histories: BTreeMap<MemberId, Vec<StrikeRecord>>) -> Self {
        histories.retain(|_, history| !history.is_empty());
        Self { histories }
    }
}

impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.histories.serialize(serializer)
    }
}

impl Ledger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no member has strikes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    /// Number of members with at least one strike
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.histories.len()
    }

    /// Total strikes across all members
    #[must_use]
    pub fn total_strikes(&self) -> usize {
        self.histories.values().map(Vec::len).sum()
    }

    /// Strike count for a member (0 when absent)
    #[must_use]
    pub fn count(&self, member: &MemberId) -> usize {
        self.histories.get(member).map_or(0, Vec::len)
    }

    /// History for a member, oldest first
    #[must_use]
    pub fn history(&self, member: &MemberId) -> Option<&[StrikeRecord]> {
        self.histories.get(member).map(Vec::as_slice)
    }

    /// Append a strike and return the member's new count
    pub fn append(&mut self, member: MemberId, record: StrikeRecord) -> usize {
        let history = self.histories.entry(member).or_default();
        history.push(record);
        history.len()
    }

    /// Remove the oldest strikes of a member
    ///
    /// [`DeleteAmount::All`] and any amount at or above the current count drop
    /// the member entirely. `Oldest(0)` is a no-op.
    pub fn remove(&mut self, member: &MemberId, amount: DeleteAmount) -> Removal {
        let Some(history) = self.histories.get_mut(member) else {
            return Removal::NoStrikes;
        };

        match amount {
            DeleteAmount::Oldest(0) => Removal::Nothing {
                remaining: history.len(),
            },
            DeleteAmount::Oldest(n) if n < history.len() => {
                let removed: Vec<_> = history.drain(..n).collect();
                Removal::Partial {
                    removed,
                    remaining: history.len(),
                }
            }
            DeleteAmount::Oldest(_) | DeleteAmount::All => {
                let removed = self.histories.remove(member).unwrap_or_default();
                Removal::All { removed }
            }
        }
    }

    /// Drop every history and return how many members were cleared
    pub fn clear(&mut self) -> usize {
        let cleared = self.histories.len();
        self.histories.clear();
        cleared
    }

    /// Iterate members and their histories in ledger order
    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &[StrikeRecord])> + '_ {
        self.histories
            .iter()
            .map(|(member, history)| (member, history.as_slice()))
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = (&'a MemberId, &'a [StrikeRecord]);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
