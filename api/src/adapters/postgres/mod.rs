//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod bucket_repo;
pub mod entry_repo;
pub mod user_repo;
pub mod vote_repo;


pub use bucket_repo::PostgresBucketRepository;
pub use entry_repo::PostgresEntryRepository;
pub use user_repo::PostgresUserRepository;
pub use vote_repo::PostgresVoteRepository;
