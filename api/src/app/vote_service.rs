//! Vote submission service
//!
//! A submission checks the ban flag, the ledger and the daily quota, applies the Elo
//! update to both entries, appends the vote and bumps the quota counter. All of it is
//! decided inside one store transaction via `VoteRepository::commit_vote`.

use std::sync::Arc;

use serde::Serialize;

use crate::app::elo;
use crate::app::quota::QuotaPolicy;
use crate::domain::entities::{
    Category, EntryId, NewVote, NormalizedPair, Outcome, Subcategory, VoteCommand, VotePlan,
    VoteSnapshot,
};
use crate::domain::ports::{Clock, VoteRepository};
use crate::error::{AppError, DomainError};

/// A validated vote submission, in the order the voter saw the entries
#[derive(Debug, Clone)]
pub struct SubmitVote {
    pub category: Category,
    pub entry_a: EntryId,
    pub entry_b: EntryId,
    pub mode: i64,
    pub subcategory: Subcategory,
}

/// Result of a successful submission, in submission order
#[derive(Debug, Clone, Serialize)]
pub struct VoteResult {
    pub entry_a: EntryId,
    pub new_score_a: f64,
    pub entry_b: EntryId,
    pub new_score_b: f64,
    pub voter: String,
}

/// Service for rating submissions
pub struct VoteService<VR, C>
where
    VR: VoteRepository,
    C: Clock,
{
    votes: Arc<VR>,
    clock: Arc<C>,
    quota: QuotaPolicy,
    current_class_year: i32,
    jitter: bool,
}

impl<VR, C> VoteService<VR, C>
where
    VR: VoteRepository,
    C: Clock,
{
    pub fn new(
        votes: Arc<VR>,
        clock: Arc<C>,
        quota: QuotaPolicy,
        current_class_year: i32,
        jitter: bool,
    ) -> Self {
        Self {
            votes,
            clock,
            quota,
            current_class_year,
            jitter,
        }
    }

    /// Submit one preference between two entries
    pub async fn submit(&self, voter_id: &str, request: SubmitVote) -> Result<VoteResult, AppError> {
        let pair = NormalizedPair::new(request.entry_a.clone(), request.entry_b.clone())?;
        let today = self.quota.today(self.clock.now());

        let outcome = Outcome::from_mode(request.mode);
        if outcome.is_none() {
            tracing::warn!(
                voter = voter_id,
                mode = request.mode,
                "Unknown vote mode, recording vote without a winner"
            );
        }
        let winner = outcome.map(|o| match o {
            Outcome::AWins => request.entry_a.clone(),
            Outcome::BWins => request.entry_b.clone(),
        });

        let jitter = if self.jitter {
            elo::sample_jitter(&mut rand::thread_rng())
        } else {
            0.0
        };

        let command = VoteCommand {
            voter_id: voter_id.to_string(),
            category: request.category.clone(),
            pair,
            subcategory: request.subcategory,
            today,
        };

        let quota = self.quota;
        let current_class_year = self.current_class_year;
        let subcategory = request.subcategory;
        let planner = move |snapshot: VoteSnapshot| {
            plan_vote(
                snapshot,
                &winner,
                subcategory,
                &quota,
                current_class_year,
                jitter,
            )
        };

        let receipt = self.votes.commit_vote(&command, &planner).await?;

        let (new_score_a, new_score_b) = if receipt.vote.pair.first() == &request.entry_a {
            (receipt.first_score, receipt.second_score)
        } else {
            (receipt.second_score, receipt.first_score)
        };

        tracing::info!(
            voter = voter_id,
            category = %request.category,
            subcategory = %request.subcategory,
            pair = %receipt.vote.pair,
            winner = ?receipt.vote.winner,
            new_score_a = new_score_a,
            new_score_b = new_score_b,
            "Vote recorded"
        );

        Ok(VoteResult {
            entry_a: request.entry_a,
            new_score_a,
            entry_b: request.entry_b,
            new_score_b,
            voter: voter_id.to_string(),
        })
    }
}

/// Decide the writes of one vote transaction.
///
/// Check order: ban flag, duplicate vote, cohort membership, quota. Scores are only
/// computed once every check has passed.
pub fn plan_vote(
    snapshot: VoteSnapshot,
    winner: &Option<EntryId>,
    subcategory: Subcategory,
    quota: &QuotaPolicy,
    current_class_year: i32,
    jitter: f64,
) -> Result<VotePlan, DomainError> {
    let VoteSnapshot {
        user,
        first,
        second,
        already_voted,
        mut today,
    } = snapshot;

    if user.banned {
        return Err(DomainError::Forbidden(
            "Opted-out users cannot vote".to_string(),
        ));
    }

    let pair = NormalizedPair::new(first.id.clone(), second.id.clone())?;

    if already_voted {
        return Err(DomainError::AlreadyExists(format!(
            "{}_{}_{}",
            user.uid, first.category, pair
        )));
    }

    for entry in [&first, &second] {
        if !subcategory.contains(entry.class_year, current_class_year) {
            return Err(DomainError::Validation(format!(
                "Entry {} is not part of {}",
                entry.id, subcategory
            )));
        }
    }

    quota.consume(&mut today, subcategory)?;

    let first_outcome = winner.as_ref().map(|w| {
        if w == &first.id {
            Outcome::AWins
        } else {
            Outcome::BWins
        }
    });
    let (first_score, second_score) = elo::rate(first.score, second.score, first_outcome, jitter);

    Ok(VotePlan {
        first_score,
        second_score,
        today,
        vote: NewVote {
            voter_id: user.uid,
            category: first.category,
            pair,
            winner: winner.clone(),
        },
    })
}
