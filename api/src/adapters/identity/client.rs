//! ID token verification against the identity provider's account lookup endpoint
//!
//! `POST {base}/v1/accounts:lookup?key={api_key}` with `{"idToken": ...}` returns the
//! account the token belongs to, or 400 when the token is invalid or expired.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use urlencoding::encode;

use crate::domain::entities::Identity;
use crate::domain::ports::IdentityVerifier;
use crate::error::IdentityError;

pub struct IdentityToolkitVerifier {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl IdentityToolkitVerifier {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn lookup_url(&self, api_key: &str) -> String {
        format!("{}/v1/accounts:lookup?key={}", self.base_url, encode(api_key))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<Account>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Account {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
}

fn identity_from(response: LookupResponse) -> Result<Identity, IdentityError> {
    let account = response
        .users
        .into_iter()
        .next()
        .ok_or(IdentityError::InvalidToken)?;
    let email = account.email.ok_or(IdentityError::MissingEmail)?;

    Ok(Identity {
        uid: account.local_id,
        email,
    })
}

#[async_trait]
impl IdentityVerifier for IdentityToolkitVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, IdentityError> {
        let api_key = self.api_key.as_deref().ok_or(IdentityError::NotConfigured)?;

        let response = self
            .http
            .post(self.lookup_url(api_key))
            .json(&LookupRequest { id_token: token })
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 400 {
            return Err(IdentityError::InvalidToken);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(IdentityError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let body: LookupResponse = response.json().await?;
        identity_from(body)
    }
}
