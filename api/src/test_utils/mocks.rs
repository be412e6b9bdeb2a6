//! Mock implementations of port traits
//!
//! These are in-memory implementations that can be configured for testing.
//! They store data in memory and allow tests to verify behavior.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::domain::entities::{
    Bucket, Category, DailyVoteRecord, Entry, EntryId, Identity, NewUser, NormalizedPair,
    Subcategory, User, Vote, VoteCommand, VoteReceipt, VoteSnapshot,
};
use crate::domain::ports::{
    BucketRepository, Clock, EntryRepository, IdentityVerifier, RosterClient, UserRepository,
    VotePlanner, VoteRepository,
};
use crate::error::{DomainError, IdentityError, RosterError};

// ============================================================================
// In-Memory Store
// ============================================================================

type EntryKey = (String, String);
type VoteKey = (String, String, NormalizedPair);
type BucketKey = (String, Subcategory, u32);

#[derive(Default)]
struct StoreState {
    entries: BTreeMap<EntryKey, Entry>,
    users: HashMap<String, User>,
    votes: Vec<Vote>,
    vote_keys: HashSet<VoteKey>,
    buckets: BTreeMap<BucketKey, Bucket>,
}

/// One in-memory store backing every repository port.
///
/// A single lock covers all collections, so `commit_vote` and the other multi-record
/// writes are atomic the same way a database transaction is.
#[derive(Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
    fail_bucket_writes: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with an entry for testing
    pub fn with_entry(self, entry: Entry) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state
                .entries
                .insert((entry.category.0.clone(), entry.id.0.clone()), entry);
        }
        self
    }

    /// Pre-populate with a user for testing
    pub fn with_user(self, user: User) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state.users.insert(user.uid.clone(), user);
        }
        self
    }

    /// Pre-populate the ledger for testing
    pub fn with_vote(self, vote: Vote) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state.vote_keys.insert((
                vote.voter_id.clone(),
                vote.category.0.clone(),
                vote.pair.clone(),
            ));
            state.votes.push(vote);
        }
        self
    }

    /// Pre-populate with a bucket for testing
    pub fn with_bucket(self, bucket: Bucket) -> Self {
        {
            let mut state = self.state.write().unwrap();
            state.buckets.insert(
                (bucket.category.0.clone(), bucket.subcategory, bucket.index),
                bucket,
            );
        }
        self
    }

    /// Make every bucket write fail, to check nothing is half-written
    pub fn failing_bucket_writes(mut self) -> Self {
        self.fail_bucket_writes = true;
        self
    }

    pub fn entry(&self, category: &str, id: &str) -> Option<Entry> {
        let state = self.state.read().unwrap();
        state
            .entries
            .get(&(category.to_string(), id.to_string()))
            .cloned()
    }

    pub fn user(&self, uid: &str) -> Option<User> {
        let state = self.state.read().unwrap();
        state.users.get(uid).cloned()
    }

    pub fn votes(&self) -> Vec<Vote> {
        let state = self.state.read().unwrap();
        state.votes.clone()
    }

    pub fn buckets(&self) -> Vec<Bucket> {
        let state = self.state.read().unwrap();
        state.buckets.values().cloned().collect()
    }
}

fn upsert_record(user: &mut User, record: DailyVoteRecord) {
    match user.votes.iter_mut().find(|r| r.date == record.date) {
        Some(existing) => *existing = record,
        None => {
            user.votes.push(record);
            user.votes.sort_by_key(|r| r.date);
        }
    }
}

#[async_trait]
impl EntryRepository for InMemoryStore {
    async fn find_pool(
        &self,
        category: &Category,
        class_year: Option<i32>,
    ) -> Result<Vec<Entry>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .entries
            .values()
            .filter(|e| e.category == *category)
            .filter(|e| class_year.map_or(true, |year| e.class_year == year))
            .cloned()
            .collect())
    }

    async fn find_many(
        &self,
        category: &Category,
        ids: &[EntryId],
    ) -> Result<Vec<Entry>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| state.entries.get(&(category.0.clone(), id.0.clone())))
            .cloned()
            .collect())
    }

    async fn find_top_by_score(
        &self,
        category: &Category,
        class_year: Option<i32>,
        limit: u64,
    ) -> Result<Vec<Entry>, DomainError> {
        let mut pool = self.find_pool(category, class_year).await?;
        pool.sort_by(|a, b| b.score.total_cmp(&a.score));
        pool.truncate(limit as usize);
        Ok(pool)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_uid(&self, uid: &str) -> Result<Option<User>, DomainError> {
        Ok(self.user(uid))
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, DomainError> {
        let mut state = self.state.write().unwrap();
        if state.users.contains_key(&new_user.uid) {
            return Err(DomainError::AlreadyExists(format!(
                "User {} already exists",
                new_user.uid
            )));
        }

        let user = User {
            uid: new_user.uid.clone(),
            email: new_user.email.clone(),
            class_year: new_user.class_year,
            banned: false,
            votes: vec![],
            created_at: Utc::now(),
        };
        state.users.insert(user.uid.clone(), user.clone());
        Ok(user)
    }

    async fn set_class_year(&self, uid: &str, class_year: i32) -> Result<(), DomainError> {
        let mut state = self.state.write().unwrap();
        if let Some(user) = state.users.get_mut(uid) {
            user.class_year = Some(class_year);
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("User {} not found", uid)))
        }
    }

    async fn ensure_daily_record(&self, uid: &str, date: NaiveDate) -> Result<(), DomainError> {
        let mut state = self.state.write().unwrap();
        let user = state
            .users
            .get_mut(uid)
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", uid)))?;
        if user.record_for(date).is_none() {
            upsert_record(user, DailyVoteRecord::new(date));
        }
        Ok(())
    }

    async fn opt_out(&self, uid: &str, own_entry: &EntryId) -> Result<u64, DomainError> {
        let mut state = self.state.write().unwrap();
        let user = state
            .users
            .get_mut(uid)
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", uid)))?;
        user.banned = true;

        let before = state.entries.len();
        state.entries.retain(|(_, id), _| id != own_entry.as_str());
        Ok((before - state.entries.len()) as u64)
    }
}

#[async_trait]
impl VoteRepository for InMemoryStore {
    async fn find_voted_pairs(
        &self,
        voter_id: &str,
        category: &Category,
    ) -> Result<HashSet<NormalizedPair>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .votes
            .iter()
            .filter(|v| v.voter_id == voter_id && v.category == *category)
            .map(|v| v.pair.clone())
            .collect())
    }

    async fn commit_vote(
        &self,
        command: &VoteCommand,
        planner: &VotePlanner,
    ) -> Result<VoteReceipt, DomainError> {
        let mut state = self.state.write().unwrap();
        let category = command.category.0.clone();

        let user = state
            .users
            .get(&command.voter_id)
            .cloned()
            .ok_or_else(|| DomainError::NotFound(format!("User {} not found", command.voter_id)))?;

        let load = |id: &EntryId| {
            state
                .entries
                .get(&(category.clone(), id.0.clone()))
                .cloned()
                .ok_or_else(|| DomainError::NotFound(format!("Entry {} not found", id)))
        };
        let first = load(command.pair.first())?;
        let second = load(command.pair.second())?;

        let key = (command.voter_id.clone(), category.clone(), command.pair.clone());
        let snapshot = VoteSnapshot {
            today: user.record_or_empty(command.today),
            already_voted: state.vote_keys.contains(&key),
            user,
            first,
            second,
        };

        let plan = planner(snapshot)?;

        for (id, score) in [
            (command.pair.first(), plan.first_score),
            (command.pair.second(), plan.second_score),
        ] {
            if let Some(entry) = state.entries.get_mut(&(category.clone(), id.0.clone())) {
                entry.score = score;
            }
        }

        if let Some(user) = state.users.get_mut(&command.voter_id) {
            upsert_record(user, plan.today);
        }

        let vote = Vote {
            voter_id: plan.vote.voter_id,
            category: plan.vote.category,
            pair: plan.vote.pair,
            winner: plan.vote.winner,
            created_at: Utc::now(),
        };
        state.vote_keys.insert(key);
        state.votes.push(vote.clone());

        Ok(VoteReceipt {
            vote,
            first_score: plan.first_score,
            second_score: plan.second_score,
        })
    }
}

#[async_trait]
impl BucketRepository for InMemoryStore {
    async fn replace_for_category(
        &self,
        category: &Category,
        buckets: &[Bucket],
    ) -> Result<(), DomainError> {
        if self.fail_bucket_writes {
            return Err(DomainError::Database("bucket write failed".to_string()));
        }

        let mut state = self.state.write().unwrap();
        state.buckets.retain(|(c, _, _), _| c != category.as_str());
        for bucket in buckets {
            state.buckets.insert(
                (bucket.category.0.clone(), bucket.subcategory, bucket.index),
                bucket.clone(),
            );
        }
        Ok(())
    }

    async fn find(
        &self,
        category: &Category,
        subcategory: Subcategory,
        index: u32,
    ) -> Result<Option<Bucket>, DomainError> {
        let state = self.state.read().unwrap();
        Ok(state
            .buckets
            .get(&(category.0.clone(), subcategory, index))
            .cloned())
    }
}

// ============================================================================
// Mock Roster Client
// ============================================================================

#[derive(Default)]
pub struct MockRosterClient {
    years: HashMap<String, i32>,
    fail: bool,
    calls: AtomicUsize,
}

impl MockRosterClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year(mut self, email: &str, class_year: i32) -> Self {
        self.years.insert(email.to_string(), class_year);
        self
    }

    /// Every lookup fails as if the upstream service were down
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RosterClient for MockRosterClient {
    async fn class_year_for(&self, email: &str) -> Result<Option<i32>, RosterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(RosterError::Api {
                status: 503,
                message: "roster down".to_string(),
            });
        }
        Ok(self.years.get(email).copied())
    }
}

// ============================================================================
// Mock Identity Verifier
// ============================================================================

#[derive(Default)]
pub struct MockIdentityVerifier {
    tokens: HashMap<String, Identity>,
}

impl MockIdentityVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, uid: &str, email: &str) -> Self {
        self.tokens.insert(
            token.to_string(),
            Identity {
                uid: uid.to_string(),
                email: email.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl IdentityVerifier for MockIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(IdentityError::InvalidToken)
    }
}

// ============================================================================
// Fixed Clock
// ============================================================================

pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write().unwrap();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.read().unwrap()
    }
}
