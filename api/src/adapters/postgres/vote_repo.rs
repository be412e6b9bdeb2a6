//! PostgreSQL adapter for VoteRepository
//!
//! `commit_vote` takes row locks in a fixed order (user, today's record, then both
//! entries in normalized pair order) so concurrent submissions cannot deadlock.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, SqlErr, TransactionTrait,
};

use crate::domain::entities::{
    Category, DailyVoteRecord, Entry, EntryId, NormalizedPair, Vote, VoteCommand, VoteReceipt,
    VoteSnapshot,
};
use crate::domain::ports::{VotePlanner, VoteRepository};
use crate::entity::{entries, user_daily_votes, users, votes};
use crate::error::DomainError;

use super::user_repo::{counts_to_json, insert_empty_record, load_daily_records, user_from_parts};

/// PostgreSQL implementation of VoteRepository
pub struct PostgresVoteRepository {
    db: DatabaseConnection,
}

impl PostgresVoteRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

async fn lock_entry(
    txn: &DatabaseTransaction,
    category: &Category,
    id: &EntryId,
) -> Result<Entry, DomainError> {
    entries::Entity::find_by_id((category.0.clone(), id.0.clone()))
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .map(Entry::from)
        .ok_or_else(|| DomainError::NotFound(format!("Entry {} not found in {}", id, category)))
}

async fn write_score(
    txn: &DatabaseTransaction,
    category: &Category,
    id: &EntryId,
    score: f64,
) -> Result<(), DomainError> {
    entries::ActiveModel {
        category: Set(category.0.clone()),
        id: Set(id.0.clone()),
        score: Set(score),
        ..Default::default()
    }
    .update(txn)
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Everything up to the commit. Returning early drops `txn`, which rolls it back.
async fn run_vote(
    txn: &DatabaseTransaction,
    command: &VoteCommand,
    planner: &VotePlanner,
) -> Result<VoteReceipt, DomainError> {
    let user = users::Entity::find_by_id(command.voter_id.clone())
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::NotFound(format!("User {} not found", command.voter_id)))?;

    insert_empty_record(txn, &command.voter_id, command.today)
        .await
        .map_err(db_err)?;
    let today: DailyVoteRecord =
        user_daily_votes::Entity::find_by_id((command.voter_id.clone(), command.today))
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| {
                DomainError::Internal(format!(
                    "Daily record for {} on {} missing after insert",
                    command.voter_id, command.today
                ))
            })?
            .try_into()?;

    let first = lock_entry(txn, &command.category, command.pair.first()).await?;
    let second = lock_entry(txn, &command.category, command.pair.second()).await?;

    let already_voted = votes::Entity::find_by_id((
        command.voter_id.clone(),
        command.category.0.clone(),
        command.pair.first().0.clone(),
        command.pair.second().0.clone(),
    ))
    .one(txn)
    .await
    .map_err(db_err)?
    .is_some();

    let history = load_daily_records(txn, &command.voter_id).await?;
    let snapshot = VoteSnapshot {
        user: user_from_parts(user, history),
        first,
        second,
        already_voted,
        today,
    };

    let plan = planner(snapshot)?;

    write_score(txn, &command.category, command.pair.first(), plan.first_score).await?;
    write_score(txn, &command.category, command.pair.second(), plan.second_score).await?;

    user_daily_votes::ActiveModel {
        uid: Set(command.voter_id.clone()),
        vote_date: Set(plan.today.date),
        counts: Set(counts_to_json(&plan.today.counts)),
    }
    .update(txn)
    .await
    .map_err(db_err)?;

    let now = Utc::now();
    votes::ActiveModel {
        voter_id: Set(plan.vote.voter_id.clone()),
        category: Set(plan.vote.category.0.clone()),
        entry_a: Set(plan.vote.pair.first().0.clone()),
        entry_b: Set(plan.vote.pair.second().0.clone()),
        winner: Set(plan.vote.winner.as_ref().map(|w| w.0.clone())),
        created_at: Set(now.fixed_offset()),
    }
    .insert(txn)
    .await
    .map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::AlreadyExists(format!(
            "{} already ranked {}",
            command.voter_id, command.pair
        )),
        _ => db_err(e),
    })?;

    Ok(VoteReceipt {
        vote: Vote {
            voter_id: plan.vote.voter_id,
            category: plan.vote.category,
            pair: plan.vote.pair,
            winner: plan.vote.winner,
            created_at: now,
        },
        first_score: plan.first_score,
        second_score: plan.second_score,
    })
}

#[async_trait]
impl VoteRepository for PostgresVoteRepository {
    async fn find_voted_pairs(
        &self,
        voter_id: &str,
        category: &Category,
    ) -> Result<HashSet<NormalizedPair>, DomainError> {
        let rows = votes::Entity::find()
            .filter(votes::Column::VoterId.eq(voter_id))
            .filter(votes::Column::Category.eq(category.as_str()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        rows.into_iter()
            .map(|row| {
                NormalizedPair::new(EntryId(row.entry_a), EntryId(row.entry_b))
                    .map_err(|e| DomainError::Database(format!("Corrupt vote key: {}", e)))
            })
            .collect()
    }

    async fn commit_vote(
        &self,
        command: &VoteCommand,
        planner: &VotePlanner,
    ) -> Result<VoteReceipt, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let receipt = run_vote(&txn, command, planner).await?;

        txn.commit().await.map_err(db_err)?;

        tracing::debug!(
            voter = %command.voter_id,
            category = %command.category,
            pair = %command.pair,
            "Vote transaction committed"
        );

        Ok(receipt)
    }
}
