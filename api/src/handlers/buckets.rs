//! Precomputed bucket handlers

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::app::BucketSummary;
use crate::domain::entities::{Category, NormalizedPair, Subcategory};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RandomBucketsResponse {
    pub category: Category,
    pub buckets: BTreeMap<Subcategory, Vec<NormalizedPair>>,
}

/// GET /categories/:category/buckets/random
///
/// One randomly chosen bucket per subcategory.
pub async fn get_random_buckets(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<RandomBucketsResponse>, AppError> {
    let category = Category::parse(&category)?;

    let buckets = state.bucket_service.fetch_random(&category).await?;

    Ok(Json(RandomBucketsResponse { category, buckets }))
}

#[derive(Debug, Serialize)]
pub struct GenerateBucketsResponse {
    pub message: String,
    #[serde(flatten)]
    pub summary: BucketSummary,
}

/// POST /categories/:category/buckets
///
/// Operator only. Replaces every bucket of the category.
pub async fn generate_buckets(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<GenerateBucketsResponse>, AppError> {
    let category = Category::parse(&category)?;

    let summary = state.bucket_service.regenerate(&category).await?;

    Ok(Json(GenerateBucketsResponse {
        message: format!("Buckets generated for {}", category),
        summary,
    }))
}
