//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use chrono::Utc;

use crate::domain::entities::{
    Category, Entry, EntryId, Identity, NormalizedPair, User, Vote, DEFAULT_SCORE,
};

/// Create a test user who has not voted yet
pub fn test_user(uid: &str) -> User {
    User {
        uid: uid.to_string(),
        email: format!("{}@yale.edu", uid),
        class_year: Some(2027),
        banned: false,
        votes: vec![],
        created_at: Utc::now(),
    }
}

/// Create a verified identity for a test user
pub fn test_identity(uid: &str) -> Identity {
    Identity {
        uid: uid.to_string(),
        email: format!("{}@yale.edu", uid),
    }
}

/// Create a test entry with the default score
pub fn test_entry(category: &str, id: &str, class_year: i32) -> Entry {
    test_entry_with_score(category, id, class_year, DEFAULT_SCORE)
}

/// Create a test entry with a specific score
pub fn test_entry_with_score(category: &str, id: &str, class_year: i32, score: f64) -> Entry {
    Entry {
        id: EntryId::from(id),
        category: Category::from(category),
        score,
        class_year,
    }
}

/// Create a recorded vote for `voter` on the pair (a, b)
pub fn test_vote(voter: &str, category: &str, a: &str, b: &str) -> Vote {
    let pair = NormalizedPair::new(EntryId::from(a), EntryId::from(b)).unwrap();
    Vote {
        voter_id: voter.to_string(),
        category: Category::from(category),
        winner: Some(pair.first().clone()),
        pair,
        created_at: Utc::now(),
    }
}
