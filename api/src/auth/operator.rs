//! Operator token middleware for maintenance routes

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use sha2::{Digest, Sha256};

use super::bearer_token;
use crate::error::AppError;

/// Hash a token for comparison
fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Digest of the configured operator token. Without one every caller is rejected.
#[derive(Clone)]
pub struct OperatorToken {
    digest: Option<String>,
}

impl OperatorToken {
    pub fn new(token: Option<&str>) -> Self {
        Self {
            digest: token.filter(|t| !t.is_empty()).map(hash_token),
        }
    }

    fn accepts(&self, presented: &str) -> bool {
        self.digest
            .as_deref()
            .is_some_and(|expected| expected == hash_token(presented))
    }
}

pub async fn operator_middleware(
    State(operator): State<OperatorToken>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request).ok_or(AppError::Unauthorized)?;

    if !operator.accepts(token) {
        tracing::warn!(path = %request.uri().path(), "Rejected operator request");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
