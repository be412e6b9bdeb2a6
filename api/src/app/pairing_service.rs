//! Pairing service
//!
//! Builds a fresh batch of pairs for one voter: the subcategory's pool, minus every
//! pair the voter already ranked, capped by what is left of today's quota.

use std::sync::Arc;

use crate::app::quota::QuotaPolicy;
use crate::app::sampler::{sample_pairs, DEFAULT_MAX_ATTEMPTS};
use crate::domain::entities::{Category, EntryId, NormalizedPair, Subcategory};
use crate::domain::ports::{Clock, EntryRepository, UserRepository, VoteRepository};
use crate::error::{AppError, DomainError};

/// Service for on-demand pair sampling
pub struct PairingService<ER, UR, VR, C>
where
    ER: EntryRepository,
    UR: UserRepository,
    VR: VoteRepository,
    C: Clock,
{
    entries: Arc<ER>,
    users: Arc<UR>,
    votes: Arc<VR>,
    clock: Arc<C>,
    quota: QuotaPolicy,
    current_class_year: i32,
}

impl<ER, UR, VR, C> PairingService<ER, UR, VR, C>
where
    ER: EntryRepository,
    UR: UserRepository,
    VR: VoteRepository,
    C: Clock,
{
    pub fn new(
        entries: Arc<ER>,
        users: Arc<UR>,
        votes: Arc<VR>,
        clock: Arc<C>,
        quota: QuotaPolicy,
        current_class_year: i32,
    ) -> Self {
        Self {
            entries,
            users,
            votes,
            clock,
            quota,
            current_class_year,
        }
    }

    /// Votes `uid` may still cast today in `subcategory`
    pub async fn remaining_votes(
        &self,
        uid: &str,
        subcategory: Subcategory,
    ) -> Result<u32, AppError> {
        let user = self
            .users
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User not found: {}", uid)))?;
        let today = self.quota.today(self.clock.now());
        Ok(self.quota.remaining(&user, subcategory, today))
    }

    /// Sample unseen pairs for a voter. May return fewer pairs than the remaining quota.
    pub async fn sample_for_user(
        &self,
        uid: &str,
        category: &Category,
        subcategory: Subcategory,
    ) -> Result<Vec<NormalizedPair>, AppError> {
        let remaining = self.remaining_votes(uid, subcategory).await?;
        if remaining == 0 {
            tracing::debug!(voter = uid, subcategory = %subcategory, "No votes left today");
            return Ok(Vec::new());
        }

        let pool: Vec<EntryId> = self
            .entries
            .find_pool(category, subcategory.class_year(self.current_class_year))
            .await?
            .into_iter()
            .map(|e| e.id)
            .collect();

        let excluded = self.votes.find_voted_pairs(uid, category).await?;

        let pairs = sample_pairs(
            &pool,
            &excluded,
            remaining as usize,
            DEFAULT_MAX_ATTEMPTS,
            &mut rand::thread_rng(),
        );

        tracing::debug!(
            voter = uid,
            category = %category,
            subcategory = %subcategory,
            pool_size = pool.len(),
            excluded = excluded.len(),
            returned = pairs.len(),
            "Sampled pairs"
        );

        Ok(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    use crate::test_utils::{
        test_entry, test_user, test_vote, FixedClock, InMemoryStore,
    };

    const CLASS_OF: i32 = 2029;

    fn create_service(
        store: Arc<InMemoryStore>,
        daily_limit: u32,
    ) -> PairingService<InMemoryStore, InMemoryStore, InMemoryStore, FixedClock> {
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 10, 16, 16, 0, 0).unwrap(),
        ));
        PairingService::new(
            store.clone(),
            store.clone(),
            store,
            clock,
            QuotaPolicy::new(daily_limit, chrono_tz::America::New_York),
            CLASS_OF,
        )
    }

    fn store_with_entries(n: usize, class_year: i32) -> InMemoryStore {
        let mut store = InMemoryStore::new().with_user(test_user("voter"));
        for i in 0..n {
            store = store.with_entry(test_entry("students", &format!("e{:02}", i), class_year));
        }
        store
    }

    fn students() -> Category {
        Category::from("students")
    }

    #[tokio::test]
    async fn empty_pool_returns_no_pairs() {
        let service = create_service(Arc::new(store_with_entries(0, 2027)), 100);

        let pairs = service
            .sample_for_user("voter", &students(), Subcategory::All)
            .await
            .unwrap();

        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn single_entry_pool_returns_no_pairs() {
        let service = create_service(Arc::new(store_with_entries(1, 2027)), 100);

        let pairs = service
            .sample_for_user("voter", &students(), Subcategory::All)
            .await
            .unwrap();

        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn pool_of_two_returns_the_only_pair() {
        let service = create_service(Arc::new(store_with_entries(2, 2027)), 100);

        let pairs = service
            .sample_for_user("voter", &students(), Subcategory::All)
            .await
            .unwrap();

        assert_eq!(pairs.len(), 1);
    }

    #[tokio::test]
    async fn batch_is_capped_by_remaining_quota() {
        let service = create_service(Arc::new(store_with_entries(30, 2027)), 12);

        let pairs = service
            .sample_for_user("voter", &students(), Subcategory::All)
            .await
            .unwrap();

        assert_eq!(pairs.len(), 12);
    }

    #[tokio::test]
    async fn already_ranked_pairs_are_excluded() {
        let mut store = store_with_entries(4, 2027);
        // Rank five of the six possible pairs; only e00-e01 stays open
        for (a, b) in [
            ("e00", "e02"),
            ("e00", "e03"),
            ("e01", "e02"),
            ("e03", "e01"),
            ("e02", "e03"),
        ] {
            store = store.with_vote(test_vote("voter", "students", a, b));
        }
        // Someone else's vote does not affect this voter
        store = store.with_vote(test_vote("other", "students", "e00", "e01"));
        let store = Arc::new(store);
        let service = create_service(store.clone(), 100);

        let pairs = service
            .sample_for_user("voter", &students(), Subcategory::All)
            .await
            .unwrap();

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].first().as_str(), "e00");
        assert_eq!(pairs[0].second().as_str(), "e01");

        let voted = store
            .find_voted_pairs("voter", &students())
            .await
            .unwrap();
        assert!(pairs.iter().all(|p| !voted.contains(p)));
    }

    #[tokio::test]
    async fn subcategory_filters_pool_by_class_year() {
        let mut store = store_with_entries(10, 2027);
        store = store
            .with_entry(test_entry("students", "senior-a", 2026))
            .with_entry(test_entry("students", "senior-b", 2026));
        let service = create_service(Arc::new(store), 100);

        let pairs = service
            .sample_for_user("voter", &students(), Subcategory::Seniors)
            .await
            .unwrap();

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].first().as_str(), "senior-a");
        assert_eq!(pairs[0].second().as_str(), "senior-b");
    }

    #[tokio::test]
    async fn banned_user_gets_nothing() {
        let mut banned = test_user("voter");
        banned.banned = true;
        let mut store = InMemoryStore::new().with_user(banned);
        for i in 0..5 {
            store = store.with_entry(test_entry("students", &format!("e{}", i), 2027));
        }
        let service = create_service(Arc::new(store), 100);

        let pairs = service
            .sample_for_user("voter", &students(), Subcategory::All)
            .await
            .unwrap();

        assert!(pairs.is_empty());
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let service = create_service(Arc::new(store_with_entries(5, 2027)), 100);

        let result = service
            .sample_for_user("nobody", &students(), Subcategory::All)
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn pairs_in_a_batch_are_unique() {
        let service = create_service(Arc::new(store_with_entries(15, 2027)), 100);

        let pairs = service
            .sample_for_user("voter", &students(), Subcategory::All)
            .await
            .unwrap();

        let unique: HashSet<_> = pairs.iter().collect();
        assert_eq!(unique.len(), pairs.len());
    }
}
