//! Leaderboards and pair resolution

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::domain::entities::{Category, Entry, EntryId, NormalizedPair, Subcategory};
use crate::domain::ports::EntryRepository;
use crate::error::{AppError, DomainError};

/// Entries listed per subcategory on the leaderboard
pub const LEADERBOARD_SIZE: u64 = 100;

/// Most pairs a single resolve request may carry
pub const MAX_RESOLVE_PAIRS: usize = 100;

pub struct LeaderboardService<ER>
where
    ER: EntryRepository,
{
    entries: Arc<ER>,
    current_class_year: i32,
}

impl<ER> LeaderboardService<ER>
where
    ER: EntryRepository,
{
    pub fn new(entries: Arc<ER>, current_class_year: i32) -> Self {
        Self {
            entries,
            current_class_year,
        }
    }

    /// Top entries by score for every subcategory
    pub async fn leaderboard(
        &self,
        category: &Category,
    ) -> Result<BTreeMap<Subcategory, Vec<Entry>>, AppError> {
        let mut boards = BTreeMap::new();
        for subcategory in Subcategory::ALL {
            let top = self
                .entries
                .find_top_by_score(
                    category,
                    subcategory.class_year(self.current_class_year),
                    LEADERBOARD_SIZE,
                )
                .await?;
            boards.insert(subcategory, top);
        }
        Ok(boards)
    }

    /// Look up the entries referenced by `pairs`. Ids with no entry are left out.
    pub async fn resolve(
        &self,
        category: &Category,
        pairs: &[NormalizedPair],
    ) -> Result<HashMap<EntryId, Entry>, AppError> {
        if pairs.is_empty() || pairs.len() > MAX_RESOLVE_PAIRS {
            return Err(DomainError::Validation(format!(
                "Expected between 1 and {} pairs, got {}",
                MAX_RESOLVE_PAIRS,
                pairs.len()
            ))
            .into());
        }

        let mut ids: Vec<EntryId> = pairs
            .iter()
            .flat_map(|p| [p.first().clone(), p.second().clone()])
            .collect();
        ids.sort();
        ids.dedup();

        let found = self.entries.find_many(category, &ids).await?;
        if found.len() < ids.len() {
            tracing::debug!(
                category = %category,
                requested = ids.len(),
                found = found.len(),
                "Some entries no longer exist"
            );
        }

        Ok(found.into_iter().map(|e| (e.id.clone(), e)).collect())
    }
}
