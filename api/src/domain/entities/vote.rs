//! Vote domain entity
//!
//! The vote ledger is append-only: one record per (voter, category, normalized pair),
//! written in the same transaction as the score update and the quota increment.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::entry::{Category, Entry, EntryId};
use super::pair::NormalizedPair;
use super::subcategory::Subcategory;
use super::user::{DailyVoteRecord, User};

/// Which side of a submitted matchup won
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// `mode == 0`: the first submitted entry won
    AWins,
    /// `mode == 1`: the second submitted entry won
    BWins,
}

impl Outcome {
    /// Map the wire-level `mode`. Any other value yields `None` (no winner).
    pub fn from_mode(mode: i64) -> Option<Self> {
        match mode {
            0 => Some(Outcome::AWins),
            1 => Some(Outcome::BWins),
            _ => None,
        }
    }
}

/// A recorded vote
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vote {
    pub voter_id: String,
    pub category: Category,
    pub pair: NormalizedPair,
    pub winner: Option<EntryId>,
    pub created_at: DateTime<Utc>,
}

/// Data needed to append a vote to the ledger
#[derive(Debug, Clone, PartialEq)]
pub struct NewVote {
    pub voter_id: String,
    pub category: Category,
    pub pair: NormalizedPair,
    pub winner: Option<EntryId>,
}

/// Everything the store must lock and load for one vote submission
#[derive(Debug, Clone)]
pub struct VoteCommand {
    pub voter_id: String,
    pub category: Category,
    pub pair: NormalizedPair,
    pub subcategory: Subcategory,
    /// Calendar day in the reference timezone
    pub today: NaiveDate,
}

/// State read inside the vote transaction.
///
/// `first`/`second` follow the pair's normalized order.
#[derive(Debug, Clone)]
pub struct VoteSnapshot {
    pub user: User,
    pub first: Entry,
    pub second: Entry,
    pub already_voted: bool,
    /// Today's record; a fresh empty one when the user has not voted today
    pub today: DailyVoteRecord,
}

/// Writes decided for one vote transaction
#[derive(Debug, Clone)]
pub struct VotePlan {
    pub first_score: f64,
    pub second_score: f64,
    pub today: DailyVoteRecord,
    pub vote: NewVote,
}

/// What a committed vote transaction wrote
#[derive(Debug, Clone)]
pub struct VoteReceipt {
    pub vote: Vote,
    pub first_score: f64,
    pub second_score: f64,
}
