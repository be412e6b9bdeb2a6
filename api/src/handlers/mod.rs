//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod buckets;
pub mod leaderboard;
pub mod pairs;
pub mod users;
pub mod votes;

pub use buckets::{generate_buckets, get_random_buckets};
pub use leaderboard::{get_leaderboard, resolve_entries};
pub use pairs::get_pairs;
pub use users::{get_me, opt_out};
pub use votes::submit_vote;

use crate::domain::entities::Subcategory;
use crate::error::AppError;

/// Subcategory named by a request, case-insensitive. Absent means `All`.
pub(crate) fn parse_subcategory(name: Option<&str>) -> Result<Subcategory, AppError> {
    match name {
        Some(name) => name.parse().map_err(AppError::BadRequest),
        None => Ok(Subcategory::All),
    }
}
