//! Pair sampling handler

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Category, Identity, NormalizedPair, Subcategory};
use crate::error::AppError;
use crate::handlers::parse_subcategory;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PairsQuery {
    pub subcategory: Option<String>,
}

impl PairsQuery {
    fn subcategory(&self) -> Result<Subcategory, AppError> {
        parse_subcategory(self.subcategory.as_deref())
    }
}

#[derive(Debug, Serialize)]
pub struct PairsResponse {
    pub category: Category,
    pub subcategory: Subcategory,
    pub pairs: Vec<NormalizedPair>,
}

/// GET /categories/:category/pairs?subcategory=
///
/// Pairs the caller has not ranked yet, at most as many as they can still vote on today.
pub async fn get_pairs(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(category): Path<String>,
    Query(query): Query<PairsQuery>,
) -> Result<Json<PairsResponse>, AppError> {
    let category = Category::parse(&category)?;
    let subcategory = query.subcategory()?;

    let pairs = state
        .pairing_service
        .sample_for_user(&identity.uid, &category, subcategory)
        .await?;

    Ok(Json(PairsResponse {
        category,
        subcategory,
        pairs,
    }))
}
