//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! The in-memory store implements every repository port behind one lock, so service
//! tests exercise the same atomicity contract the PostgreSQL adapters provide.

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
