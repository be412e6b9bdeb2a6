//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod identity;
pub mod repositories;
pub mod roster;

pub use identity::{Clock, IdentityVerifier};
pub use repositories::{
    BucketRepository, EntryRepository, UserRepository, VotePlanner, VoteRepository,
};
pub use roster::RosterClient;
