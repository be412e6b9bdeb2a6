use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context};
use chrono_tz::Tz;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Email suffix every voter must have, e.g. `@yale.edu`
    pub allowed_email_domain: String,
    /// Class year of the current freshmen
    pub current_class_year: i32,
    /// Timezone whose midnight starts a new quota day
    pub reference_timezone: Tz,
    pub daily_vote_limit: u32,
    /// Add a small random perturbation to the Elo expected score
    pub elo_jitter: bool,
    pub roster_api_url: String,
    pub roster_api_key: Option<String>,
    pub identity_api_url: String,
    pub identity_api_key: Option<String>,
    /// Shared token for maintenance routes; none disables them
    pub operator_token: Option<String>,
}

fn var_or<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{} has an invalid value {:?}: {}", name, raw, e)),
        Err(_) => Ok(default),
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let timezone: String = var_or("REFERENCE_TIMEZONE", "America/New_York".to_string())?;

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: var_or("PORT", 8080)?,
            allowed_email_domain: var_or("ALLOWED_EMAIL_DOMAIN", "@yale.edu".to_string())?,
            current_class_year: var_or("CURRENT_CLASS_YEAR", 2029)?,
            reference_timezone: timezone
                .parse()
                .map_err(|e| anyhow!("REFERENCE_TIMEZONE is not an IANA zone: {}", e))?,
            daily_vote_limit: var_or("DAILY_VOTE_LIMIT", 100)?,
            elo_jitter: var_or("ELO_JITTER", true)?,
            roster_api_url: var_or(
                "ROSTER_API_URL",
                "https://api.yalies.io/v2/people".to_string(),
            )?,
            roster_api_key: optional("ROSTER_API_KEY"),
            identity_api_url: var_or(
                "IDENTITY_API_URL",
                "https://identitytoolkit.googleapis.com".to_string(),
            )?,
            identity_api_key: optional("IDENTITY_API_KEY"),
            operator_token: optional("OPERATOR_TOKEN"),
        })
    }
}
