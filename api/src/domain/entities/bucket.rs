//! Bucket domain entity
//!
//! A precomputed batch of random pairs shared by every voter. Buckets are written in
//! bulk by the regeneration job and never edited afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entry::Category;
use super::pair::NormalizedPair;
use super::subcategory::Subcategory;

/// Buckets generated per (category, subcategory)
pub const BUCKETS_PER_SUBCATEGORY: u32 = 100;

/// Pairs per bucket
pub const PAIRS_PER_BUCKET: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bucket {
    pub category: Category,
    pub subcategory: Subcategory,
    /// In `0..BUCKETS_PER_SUBCATEGORY`
    pub index: u32,
    pub pairs: Vec<NormalizedPair>,
    pub created_at: DateTime<Utc>,
}
