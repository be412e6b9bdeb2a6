//! Entry domain entity
//!
//! A rankable item inside a category. Its score is owned by the rating engine;
//! its class year is fixed when the roster import creates it.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Starting score for freshly imported entries
pub const DEFAULT_SCORE: f64 = 1000.0;

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]{1,128}$").expect("valid regex"))
}

fn validate_identifier(kind: &str, value: &str) -> Result<(), DomainError> {
    if identifier_pattern().is_match(value) {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "Invalid {}: {:?}",
            kind, value
        )))
    }
}

/// Identifier of an entry, unique within its category
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    /// Parse an identifier received at the API boundary
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        validate_identifier("entry id", value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a category (e.g. "students")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    /// Parse a category name received at the API boundary
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        validate_identifier("category", value)?;
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A rankable entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub id: EntryId,
    pub category: Category,
    pub score: f64,
    pub class_year: i32,
}
