//! Bucket service
//!
//! Regenerates the precomputed pair buckets of a category and serves one random
//! bucket per subcategory. Buckets ignore what any individual voter has seen.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::app::sampler::sample_pairs;
use crate::domain::entities::{
    Bucket, Category, EntryId, NormalizedPair, Subcategory, BUCKETS_PER_SUBCATEGORY,
    PAIRS_PER_BUCKET,
};
use crate::domain::ports::{BucketRepository, Clock, EntryRepository};
use crate::error::{AppError, DomainError};

/// Rejection-sampling attempts allowed per bucket
const ATTEMPTS_PER_BUCKET: usize = PAIRS_PER_BUCKET * 10;

/// Result of a regeneration run
#[derive(Debug, Clone, Serialize)]
pub struct BucketSummary {
    pub category: Category,
    pub buckets_written: usize,
    /// Pool size per subcategory at generation time
    pub pool_sizes: BTreeMap<Subcategory, usize>,
}

/// Build every bucket of a category from its per-subcategory pools.
///
/// Each subcategory gets `BUCKETS_PER_SUBCATEGORY` buckets of up to `PAIRS_PER_BUCKET`
/// distinct pairs. Pairs may repeat across buckets.
pub fn build_buckets<R: Rng + ?Sized>(
    category: &Category,
    pools: &BTreeMap<Subcategory, Vec<EntryId>>,
    created_at: DateTime<Utc>,
    rng: &mut R,
) -> Vec<Bucket> {
    let none = HashSet::new();
    let mut buckets = Vec::with_capacity(pools.len() * BUCKETS_PER_SUBCATEGORY as usize);

    for (subcategory, pool) in pools {
        for index in 0..BUCKETS_PER_SUBCATEGORY {
            let pairs = sample_pairs(pool, &none, PAIRS_PER_BUCKET, ATTEMPTS_PER_BUCKET, rng);
            buckets.push(Bucket {
                category: category.clone(),
                subcategory: *subcategory,
                index,
                pairs,
                created_at,
            });
        }
    }

    buckets
}

pub struct BucketService<ER, BR, C>
where
    ER: EntryRepository,
    BR: BucketRepository,
    C: Clock,
{
    entries: Arc<ER>,
    buckets: Arc<BR>,
    clock: Arc<C>,
    current_class_year: i32,
}

impl<ER, BR, C> BucketService<ER, BR, C>
where
    ER: EntryRepository,
    BR: BucketRepository,
    C: Clock,
{
    pub fn new(entries: Arc<ER>, buckets: Arc<BR>, clock: Arc<C>, current_class_year: i32) -> Self {
        Self {
            entries,
            buckets,
            clock,
            current_class_year,
        }
    }

    /// Replace all buckets of `category` with freshly sampled ones
    pub async fn regenerate(&self, category: &Category) -> Result<BucketSummary, AppError> {
        let mut pools = BTreeMap::new();
        for subcategory in Subcategory::ALL {
            let pool: Vec<EntryId> = self
                .entries
                .find_pool(category, subcategory.class_year(self.current_class_year))
                .await?
                .into_iter()
                .map(|e| e.id)
                .collect();
            pools.insert(subcategory, pool);
        }

        let buckets = build_buckets(category, &pools, self.clock.now(), &mut rand::thread_rng());

        self.buckets.replace_for_category(category, &buckets).await?;

        let summary = BucketSummary {
            category: category.clone(),
            buckets_written: buckets.len(),
            pool_sizes: pools.iter().map(|(s, p)| (*s, p.len())).collect(),
        };

        tracing::info!(
            category = %category,
            buckets = summary.buckets_written,
            "Regenerated pair buckets"
        );

        Ok(summary)
    }

    /// One randomly chosen bucket per subcategory
    pub async fn fetch_random(
        &self,
        category: &Category,
    ) -> Result<BTreeMap<Subcategory, Vec<NormalizedPair>>, AppError> {
        let picks: Vec<(Subcategory, u32)> = {
            let mut rng = rand::thread_rng();
            Subcategory::ALL
                .iter()
                .map(|s| (*s, rng.gen_range(0..BUCKETS_PER_SUBCATEGORY)))
                .collect()
        };

        let mut result = BTreeMap::new();
        for (subcategory, index) in picks {
            let bucket = self
                .buckets
                .find(category, subcategory, index)
                .await?
                .ok_or_else(|| {
                    DomainError::NotFound(format!(
                        "No bucket {} for {}/{}",
                        index, category, subcategory
                    ))
                })?;
            result.insert(subcategory, bucket.pairs);
        }

        Ok(result)
    }
}
