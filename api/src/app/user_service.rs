//! User service
//!
//! Registers voters on first contact, fills in their class year from the roster and
//! handles opting out of the ranking.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::app::quota::QuotaPolicy;
use crate::domain::entities::{EntryId, Identity, NewUser, Subcategory, User};
use crate::domain::ports::{Clock, RosterClient, UserRepository};
use crate::error::{AppError, DomainError};

/// What a caller sees about themselves
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub uid: String,
    pub email: String,
    pub class_year: Option<i32>,
    pub banned: bool,
    pub todays_vote_counts: BTreeMap<Subcategory, u32>,
    pub daily_limit: u32,
}

/// Outcome of an opt-out request
#[derive(Debug, Clone, Serialize)]
pub struct OptOutResult {
    pub uid: String,
    pub entries_removed: u64,
}

pub struct UserService<UR, RC, C>
where
    UR: UserRepository,
    RC: RosterClient,
    C: Clock,
{
    users: Arc<UR>,
    roster: Arc<RC>,
    clock: Arc<C>,
    quota: QuotaPolicy,
}

impl<UR, RC, C> UserService<UR, RC, C>
where
    UR: UserRepository,
    RC: RosterClient,
    C: Clock,
{
    pub fn new(users: Arc<UR>, roster: Arc<RC>, clock: Arc<C>, quota: QuotaPolicy) -> Self {
        Self {
            users,
            roster,
            clock,
            quota,
        }
    }

    /// Load the caller, creating them on first contact.
    ///
    /// The roster is only consulted while the class year is still unknown, and today's
    /// daily record is created if missing.
    pub async fn get_or_create(&self, identity: &Identity) -> Result<UserProfile, AppError> {
        let user = match self.users.find_by_uid(&identity.uid).await? {
            Some(user) => user,
            None => self.register(identity).await?,
        };

        if user.class_year.is_none() {
            self.fill_class_year(&user).await?;
        }

        let today = self.quota.today(self.clock.now());
        self.users.ensure_daily_record(&user.uid, today).await?;

        let user = self
            .users
            .find_by_uid(&identity.uid)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("User not found: {}", identity.uid)))?;

        Ok(UserProfile {
            todays_vote_counts: user.record_or_empty(today).counts,
            uid: user.uid,
            email: user.email,
            class_year: user.class_year,
            banned: user.banned,
            daily_limit: self.quota.daily_limit(),
        })
    }

    async fn register(&self, identity: &Identity) -> Result<User, AppError> {
        let new_user = NewUser {
            uid: identity.uid.clone(),
            email: identity.email.clone(),
            class_year: None,
        };

        match self.users.create(&new_user).await {
            Ok(user) => {
                tracing::info!(uid = %user.uid, "Registered new voter");
                Ok(user)
            }
            // Lost a race with a concurrent first request from the same caller
            Err(DomainError::AlreadyExists(_)) => self
                .users
                .find_by_uid(&identity.uid)
                .await?
                .ok_or_else(|| {
                    DomainError::Internal(format!("User {} vanished after create", identity.uid))
                        .into()
                }),
            Err(e) => Err(e.into()),
        }
    }

    async fn fill_class_year(&self, user: &User) -> Result<(), AppError> {
        let year = self
            .roster
            .class_year_for(&user.email)
            .await
            .map_err(DomainError::from)?;

        match year {
            Some(year) => {
                self.users.set_class_year(&user.uid, year).await?;
                tracing::debug!(uid = %user.uid, class_year = year, "Stored class year");
            }
            None => {
                tracing::warn!(uid = %user.uid, "Roster has no class year for voter");
            }
        }
        Ok(())
    }

    /// Ban the caller and remove their own entry from every category
    pub async fn opt_out(&self, identity: &Identity) -> Result<OptOutResult, AppError> {
        let own_entry = EntryId::from(identity.netid());
        let removed = self.users.opt_out(&identity.uid, &own_entry).await?;

        tracing::info!(uid = %identity.uid, entries_removed = removed, "Voter opted out");

        Ok(OptOutResult {
            uid: identity.uid.clone(),
            entries_removed: removed,
        })
    }
}
