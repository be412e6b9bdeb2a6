//! Domain layer
//!
//! Entries, voters, votes and buckets, plus the ports the services reach the
//! outside world through. Nothing in here knows about HTTP or SQL.

pub mod entities;
pub mod ports;
