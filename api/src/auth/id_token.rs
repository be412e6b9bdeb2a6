//! Voter authentication middleware

use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use super::bearer_token;
use crate::domain::ports::IdentityVerifier;
use crate::error::AppError;

/// What voter authentication needs from the application state
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn IdentityVerifier>,
    /// Required email suffix, e.g. `@yale.edu`
    pub allowed_domain: String,
}

impl AuthState {
    fn email_allowed(&self, email: &str) -> bool {
        email
            .to_ascii_lowercase()
            .ends_with(&self.allowed_domain.to_ascii_lowercase())
    }
}

/// Authentication middleware
///
/// Verifies the ID token, checks the institutional email domain and injects the
/// verified `Identity` into request extensions.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;

    let identity = state.verifier.verify(token).await?;

    if !state.email_allowed(&identity.email) {
        tracing::info!(uid = %identity.uid, "Rejected caller outside the allowed domain");
        return Err(AppError::Forbidden(format!(
            "Only {} accounts can take part",
            state.allowed_domain
        )));
    }

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
