//! Roster directory API client
//!
//! Looks people up by email with `POST {base}` and a bearer API key. The response is a
//! JSON array of people; only the first match is used.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::ports::RosterClient;
use crate::error::RosterError;

pub struct RosterHttpClient {
    http: Client,
    url: String,
    api_key: Option<String>,
}

impl RosterHttpClient {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            url,
            api_key,
        }
    }
}

#[derive(Serialize)]
struct PeopleQuery<'a> {
    filters: PeopleFilters<'a>,
}

#[derive(Serialize)]
struct PeopleFilters<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
struct Person {
    #[serde(default)]
    year: Option<i32>,
}

/// Class year of the first person in a roster response
fn first_year(people: &[Person]) -> Option<i32> {
    people.first().and_then(|p| p.year)
}

#[async_trait]
impl RosterClient for RosterHttpClient {
    async fn class_year_for(&self, email: &str) -> Result<Option<i32>, RosterError> {
        let api_key = self.api_key.as_deref().ok_or(RosterError::NotConfigured)?;

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&PeopleQuery {
                filters: PeopleFilters { email },
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %message, "Roster API error");
            return Err(RosterError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let people: Vec<Person> = response
            .json()
            .await
            .map_err(|e| RosterError::Deserialization(e.to_string()))?;

        Ok(first_year(&people))
    }
}
