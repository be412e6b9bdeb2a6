//! Daily vote quota
//!
//! Each voter may rate `daily_limit` pairs per subcategory per calendar day. Days are
//! counted in a fixed reference timezone so every voter's day rolls over at the same
//! local midnight.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::domain::entities::{DailyVoteRecord, Subcategory, User};
use crate::error::DomainError;

/// Default number of votes per user, subcategory and day
pub const DEFAULT_DAILY_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy)]
pub struct QuotaPolicy {
    daily_limit: u32,
    timezone: Tz,
}

impl QuotaPolicy {
    pub fn new(daily_limit: u32, timezone: Tz) -> Self {
        Self {
            daily_limit,
            timezone,
        }
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Calendar day of `now` in the reference timezone
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.timezone).date_naive()
    }

    /// Votes the user may still cast today in `subcategory`. Banned users have none.
    pub fn remaining(&self, user: &User, subcategory: Subcategory, today: NaiveDate) -> u32 {
        if user.banned {
            return 0;
        }
        let used = user.record_for(today).map_or(0, |r| r.count(subcategory));
        self.daily_limit.saturating_sub(used)
    }

    /// Charge one vote against today's record
    pub fn consume(
        &self,
        record: &mut DailyVoteRecord,
        subcategory: Subcategory,
    ) -> Result<(), DomainError> {
        if record.count(subcategory) >= self.daily_limit {
            return Err(DomainError::QuotaExceeded(format!(
                "You have used all {} {} votes for {}",
                self.daily_limit, subcategory, record.date
            )));
        }
        record.increment(subcategory);
        Ok(())
    }
}

impl Default for QuotaPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DAILY_LIMIT, chrono_tz::America::New_York)
    }
}
