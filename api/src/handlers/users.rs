//! Handlers for the calling user

use axum::{extract::State, Extension, Json};

use crate::app::{OptOutResult, UserProfile};
use crate::domain::entities::Identity;
use crate::error::AppError;
use crate::AppState;

/// GET /me
///
/// Registers the caller on first contact.
pub async fn get_me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.user_service.get_or_create(&identity).await?;
    Ok(Json(profile))
}

/// POST /me/opt-out
pub async fn opt_out(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<OptOutResult>, AppError> {
    let result = state.user_service.opt_out(&identity).await?;
    Ok(Json(result))
}
