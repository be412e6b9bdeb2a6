//! User domain entity
//!
//! A voter, identified by the uid of the identity provider. Daily vote counts are
//! kept per calendar day (in the reference timezone) and per subcategory.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::subcategory::Subcategory;

/// Verified caller identity supplied by the auth layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

impl Identity {
    /// Local part of the email, which is also the id of the caller's own entry
    pub fn netid(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

/// Vote counts for one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyVoteRecord {
    pub date: NaiveDate,
    pub counts: BTreeMap<Subcategory, u32>,
}

impl DailyVoteRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            counts: BTreeMap::new(),
        }
    }

    pub fn count(&self, subcategory: Subcategory) -> u32 {
        self.counts.get(&subcategory).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, subcategory: Subcategory) {
        *self.counts.entry(subcategory).or_insert(0) += 1;
    }
}

/// A registered voter
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub uid: String,
    pub email: String,
    pub class_year: Option<i32>,
    pub banned: bool,
    /// Ordered by date, at most one record per date
    pub votes: Vec<DailyVoteRecord>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn record_for(&self, date: NaiveDate) -> Option<&DailyVoteRecord> {
        self.votes.iter().find(|r| r.date == date)
    }

    /// Today's record, or an empty one if the user has not been seen today
    pub fn record_or_empty(&self, date: NaiveDate) -> DailyVoteRecord {
        self.record_for(date)
            .cloned()
            .unwrap_or_else(|| DailyVoteRecord::new(date))
    }
}

/// Data needed to create a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub uid: String,
    pub email: String,
    pub class_year: Option<i32>,
}
