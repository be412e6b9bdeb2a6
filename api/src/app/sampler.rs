//! Random pair sampler
//!
//! Draws distinct unordered pairs from a candidate pool by rejection sampling.
//! The number of draws is capped by `max_attempts`: when the pool is nearly covered by
//! exclusions most draws get rejected, and the cap sheds that load by returning a short
//! batch instead of looping. A short batch is a valid result, not an error.

use std::collections::HashSet;

use rand::Rng;

use crate::domain::entities::{EntryId, NormalizedPair};

/// Default cap on random draws per batch
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Sample up to `count` distinct pairs from `pool`, skipping `excluded` ones.
///
/// Stops after `count` accepted pairs or `max_attempts` draws, whichever comes first.
/// Pairs are returned in the order they were accepted.
pub fn sample_pairs<R: Rng + ?Sized>(
    pool: &[EntryId],
    excluded: &HashSet<NormalizedPair>,
    count: usize,
    max_attempts: usize,
    rng: &mut R,
) -> Vec<NormalizedPair> {
    if pool.len() < 2 || count == 0 {
        return Vec::new();
    }

    let mut selected = Vec::with_capacity(count.min(max_attempts));
    let mut seen = HashSet::with_capacity(count.min(max_attempts));
    let mut attempts = 0;

    while selected.len() < count && attempts < max_attempts {
        attempts += 1;

        let i = rng.gen_range(0..pool.len());
        let j = rng.gen_range(0..pool.len());
        if i == j {
            continue;
        }

        // Duplicate ids in the pool would make a self-pair
        let Ok(pair) = NormalizedPair::new(pool[i].clone(), pool[j].clone()) else {
            continue;
        };

        if excluded.contains(&pair) || seen.contains(&pair) {
            continue;
        }

        seen.insert(pair.clone());
        selected.push(pair);
    }

    if selected.len() < count {
        tracing::debug!(
            requested = count,
            returned = selected.len(),
            attempts = attempts,
            pool_size = pool.len(),
            "Pair sampling stopped short"
        );
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pool(n: usize) -> Vec<EntryId> {
        (0..n).map(|i| EntryId(format!("e{:03}", i))).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn empty_and_singleton_pools_yield_nothing() {
        let none = HashSet::new();
        assert!(sample_pairs(&pool(0), &none, 10, DEFAULT_MAX_ATTEMPTS, &mut rng()).is_empty());
        assert!(sample_pairs(&pool(1), &none, 10, DEFAULT_MAX_ATTEMPTS, &mut rng()).is_empty());
    }

    #[test]
    fn zero_count_yields_nothing() {
        assert!(sample_pairs(&pool(10), &HashSet::new(), 0, 1000, &mut rng()).is_empty());
    }

    #[test]
    fn pool_of_two_yields_exactly_one_pair() {
        let pairs = sample_pairs(&pool(2), &HashSet::new(), 50, DEFAULT_MAX_ATTEMPTS, &mut rng());
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].first().as_str(), "e000");
        assert_eq!(pairs[0].second().as_str(), "e001");
    }

    #[test]
    fn pairs_are_distinct_within_a_batch() {
        let pairs = sample_pairs(&pool(20), &HashSet::new(), 100, DEFAULT_MAX_ATTEMPTS, &mut rng());
        assert_eq!(pairs.len(), 100);
        let unique: HashSet<_> = pairs.iter().cloned().collect();
        assert_eq!(unique.len(), pairs.len());
    }

    #[test]
    fn excluded_pairs_are_never_returned() {
        let candidates = pool(6);
        let mut excluded = HashSet::new();
        for (i, a) in candidates.iter().enumerate() {
            for b in candidates.iter().skip(i + 1) {
                if a.as_str() == "e000" || b.as_str() == "e000" {
                    continue;
                }
                excluded.insert(NormalizedPair::new(a.clone(), b.clone()).unwrap());
            }
        }

        let pairs = sample_pairs(&candidates, &excluded, 100, DEFAULT_MAX_ATTEMPTS, &mut rng());

        // Only the five pairs involving e000 remain
        assert_eq!(pairs.len(), 5);
        for pair in &pairs {
            assert!(!excluded.contains(pair));
            assert!(pair.contains(&EntryId::from("e000")));
        }
    }

    #[test]
    fn fully_excluded_pool_terminates_empty() {
        let candidates = pool(3);
        let excluded: HashSet<_> = [("e000", "e001"), ("e000", "e002"), ("e001", "e002")]
            .into_iter()
            .map(|(a, b)| NormalizedPair::new(a.into(), b.into()).unwrap())
            .collect();

        assert!(sample_pairs(&candidates, &excluded, 10, DEFAULT_MAX_ATTEMPTS, &mut rng()).is_empty());
    }

    #[test]
    fn attempt_cap_bounds_the_batch() {
        let pairs = sample_pairs(&pool(100), &HashSet::new(), 100, 10, &mut rng());
        assert!(pairs.len() <= 10);
    }
}
