//! Vote handlers

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::app::SubmitVote;
use crate::domain::entities::{Category, EntryId, Identity};
use crate::error::AppError;
use crate::handlers::parse_subcategory;
use crate::AppState;

/// Request to rank one pair
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitVoteRequest {
    pub category: String,
    pub entry_a: String,
    pub entry_b: String,
    /// 0: `entry_a` won, 1: `entry_b` won
    pub mode: i64,
    #[serde(default)]
    pub subcategory: Option<String>,
}

impl SubmitVoteRequest {
    fn validate(self) -> Result<SubmitVote, AppError> {
        Ok(SubmitVote {
            category: Category::parse(&self.category)?,
            entry_a: EntryId::parse(&self.entry_a)?,
            entry_b: EntryId::parse(&self.entry_b)?,
            mode: self.mode,
            subcategory: parse_subcategory(self.subcategory.as_deref())?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitVoteResponse {
    pub entry_a: EntryId,
    pub new_score_a: f64,
    pub entry_b: EntryId,
    pub new_score_b: f64,
    pub voter: String,
}

/// POST /votes
pub async fn submit_vote(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<SubmitVoteRequest>,
) -> Result<Json<SubmitVoteResponse>, AppError> {
    let submission = req.validate()?;

    let result = state
        .vote_service
        .submit(&identity.uid, submission)
        .await?;

    Ok(Json(SubmitVoteResponse {
        entry_a: result.entry_a,
        new_score_a: result.new_score_a,
        entry_b: result.entry_b,
        new_score_b: result.new_score_b,
        voter: result.voter,
    }))
}
