//! Leaderboard and entry lookup handlers

use std::collections::{BTreeMap, HashMap};

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Category, Entry, EntryId, NormalizedPair, Subcategory};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct EntryResponse {
    pub id: EntryId,
    pub score: f64,
    pub class_year: i32,
}

impl From<Entry> for EntryResponse {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            score: entry.score,
            class_year: entry.class_year,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponse {
    pub category: Category,
    pub subcategories: BTreeMap<Subcategory, Vec<EntryResponse>>,
}

/// GET /categories/:category/leaderboard
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let category = Category::parse(&category)?;

    let boards = state.leaderboard_service.leaderboard(&category).await?;

    Ok(Json(LeaderboardResponse {
        category,
        subcategories: boards
            .into_iter()
            .map(|(sub, entries)| (sub, entries.into_iter().map(Into::into).collect()))
            .collect(),
    }))
}

/// Pairs whose entries should be looked up
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveRequest {
    pub pairs: Vec<(String, String)>,
}

impl ResolveRequest {
    fn validate(self) -> Result<Vec<NormalizedPair>, AppError> {
        self.pairs
            .iter()
            .map(|(a, b)| -> Result<NormalizedPair, AppError> {
                Ok(NormalizedPair::new(EntryId::parse(a)?, EntryId::parse(b)?)?)
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub entries: HashMap<EntryId, EntryResponse>,
}

/// POST /categories/:category/entries/resolve
///
/// Entries that no longer exist are left out of the response.
pub async fn resolve_entries(
    State(state): State<AppState>,
    Path(category): Path<String>,
    Json(req): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, AppError> {
    let category = Category::parse(&category)?;
    let pairs = req.validate()?;

    let entries = state.leaderboard_service.resolve(&category, &pairs).await?;

    Ok(Json(ResolveResponse {
        entries: entries.into_iter().map(|(id, e)| (id, e.into())).collect(),
    }))
}
