//! SeaORM table definitions
//!
//! Row-level models mapped onto the domain types by the postgres adapters.

pub mod buckets;
pub mod entries;
pub mod user_daily_votes;
pub mod users;
pub mod votes;
