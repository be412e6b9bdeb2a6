//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities, ports, and external systems.

pub mod bucket_service;
pub mod elo;
pub mod leaderboard_service;
pub mod pairing_service;
pub mod quota;
pub mod sampler;
pub mod user_service;
pub mod vote_service;

pub use bucket_service::{BucketService, BucketSummary};
pub use leaderboard_service::LeaderboardService;
pub use pairing_service::PairingService;
pub use quota::QuotaPolicy;
pub use user_service::{OptOutResult, UserProfile, UserService};
pub use vote_service::{SubmitVote, VoteService};
