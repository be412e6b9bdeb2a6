//! Roster directory adapter

mod client;

pub use client::RosterHttpClient;
