//! Roster lookup port
//!
//! The roster service knows the class year of every enrolled student.

use async_trait::async_trait;

use crate::error::RosterError;

#[async_trait]
pub trait RosterClient: Send + Sync {
    /// Class year for the person with this email, `None` if the roster has no match
    async fn class_year_for(&self, email: &str) -> Result<Option<i32>, RosterError>;
}
