//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod bucket;
pub mod entry;
pub mod pair;
pub mod subcategory;
pub mod user;
pub mod vote;

pub use bucket::{Bucket, BUCKETS_PER_SUBCATEGORY, PAIRS_PER_BUCKET};
pub use entry::{Category, Entry, EntryId, DEFAULT_SCORE};
pub use pair::NormalizedPair;
pub use subcategory::Subcategory;
pub use user::{DailyVoteRecord, Identity, NewUser, User};
pub use vote::{NewVote, Outcome, Vote, VoteCommand, VotePlan, VoteReceipt, VoteSnapshot};
