//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::entities::{
    Bucket, Category, Entry, EntryId, NewUser, NormalizedPair, Subcategory, User, VoteCommand,
    VotePlan, VoteReceipt, VoteSnapshot,
};
use crate::error::DomainError;

/// Decision step run by the store inside the vote transaction.
///
/// Returning an error rolls the transaction back.
pub type VotePlanner = dyn Fn(VoteSnapshot) -> Result<VotePlan, DomainError> + Send + Sync;

/// Repository for Entry entities
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Entries of a category, optionally restricted to one class year, ordered by id
    async fn find_pool(
        &self,
        category: &Category,
        class_year: Option<i32>,
    ) -> Result<Vec<Entry>, DomainError>;

    /// Entries of a category whose ids are in `ids`; unknown ids are skipped
    async fn find_many(
        &self,
        category: &Category,
        ids: &[EntryId],
    ) -> Result<Vec<Entry>, DomainError>;

    /// Highest-scored entries, optionally restricted to one class year
    async fn find_top_by_score(
        &self,
        category: &Category,
        class_year: Option<i32>,
        limit: u64,
    ) -> Result<Vec<Entry>, DomainError>;
}

/// Repository for User entities and their daily vote records
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by uid, with daily vote records ordered by date
    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user. Fails with `AlreadyExists` if the uid is taken.
    async fn create(&self, user: &NewUser) -> Result<User, DomainError>;

    /// Fill in the class year once the roster lookup succeeds
    async fn set_class_year(&self, uid: &str, class_year: i32) -> Result<(), DomainError>;

    /// Append an empty record for `date` unless one already exists
    async fn ensure_daily_record(&self, uid: &str, date: NaiveDate) -> Result<(), DomainError>;

    /// Ban the user and delete their own entry from every category, atomically.
    /// Returns the number of entries deleted.
    async fn opt_out(&self, uid: &str, own_entry: &EntryId) -> Result<u64, DomainError>;
}

/// Repository for the append-only vote ledger
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// All pairs a voter has already ranked in a category
    async fn find_voted_pairs(
        &self,
        voter_id: &str,
        category: &Category,
    ) -> Result<HashSet<NormalizedPair>, DomainError>;

    /// Run one vote submission as a single atomic transaction.
    ///
    /// The store locks and loads the user, today's daily record, both entries and the
    /// ledger key, hands the snapshot to `planner`, then writes both scores, today's
    /// record and the vote. Nothing is written if any step fails. A concurrent insert of
    /// the same ledger key surfaces as `AlreadyExists`.
    async fn commit_vote(
        &self,
        command: &VoteCommand,
        planner: &VotePlanner,
    ) -> Result<VoteReceipt, DomainError>;
}

/// Repository for precomputed pair buckets
#[async_trait]
pub trait BucketRepository: Send + Sync {
    /// Replace every bucket of a category in one all-or-nothing write
    async fn replace_for_category(
        &self,
        category: &Category,
        buckets: &[Bucket],
    ) -> Result<(), DomainError>;

    async fn find(
        &self,
        category: &Category,
        subcategory: Subcategory,
        index: u32,
    ) -> Result<Option<Bucket>, DomainError>;
}
