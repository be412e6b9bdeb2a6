//! Normalized (unordered) entry pairs

use serde::{Deserialize, Serialize};

use super::entry::EntryId;
use crate::error::DomainError;

/// An unordered pair of distinct entries, stored smaller id first.
///
/// Every lookup, exclusion check and ledger key goes through this type so that
/// (X, Y) and (Y, X) are always the same pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "(EntryId, EntryId)", into = "(EntryId, EntryId)")]
pub struct NormalizedPair {
    first: EntryId,
    second: EntryId,
}

impl NormalizedPair {
    pub fn new(a: EntryId, b: EntryId) -> Result<Self, DomainError> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Self {
                first: a,
                second: b,
            }),
            std::cmp::Ordering::Greater => Ok(Self {
                first: b,
                second: a,
            }),
            std::cmp::Ordering::Equal => Err(DomainError::Validation(format!(
                "An entry cannot be paired with itself: {}",
                a
            ))),
        }
    }

    /// The lexicographically smaller id
    pub fn first(&self) -> &EntryId {
        &self.first
    }

    /// The lexicographically larger id
    pub fn second(&self) -> &EntryId {
        &self.second
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        &self.first == id || &self.second == id
    }
}

impl TryFrom<(EntryId, EntryId)> for NormalizedPair {
    type Error = DomainError;

    fn try_from((a, b): (EntryId, EntryId)) -> Result<Self, Self::Error> {
        Self::new(a, b)
    }
}

impl From<NormalizedPair> for (EntryId, EntryId) {
    fn from(pair: NormalizedPair) -> Self {
        (pair.first, pair.second)
    }
}

impl std::fmt::Display for NormalizedPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.first, self.second)
    }
}
