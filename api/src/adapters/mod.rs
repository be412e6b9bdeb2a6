//! Adapters layer
//!
//! Implementations of port traits for external systems.

pub mod clock;
pub mod identity;
pub mod postgres;
pub mod roster;

pub use clock::SystemClock;
pub use identity::IdentityToolkitVerifier;
pub use postgres::{
    PostgresBucketRepository, PostgresEntryRepository, PostgresUserRepository,
    PostgresVoteRepository,
};
pub use roster::RosterHttpClient;
