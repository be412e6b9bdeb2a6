//! Identity verification and clock ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::Identity;
use crate::error::IdentityError;

/// Verifies bearer ID tokens issued by the identity provider
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, IdentityError>;
}

/// Source of the current time, injected so quota days can be tested
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
