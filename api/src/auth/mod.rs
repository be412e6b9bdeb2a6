//! Authentication middleware
//!
//! - `id_token`: voters, identified by an ID token from the identity provider
//! - `operator`: privileged maintenance routes, guarded by a shared token

mod id_token;
mod operator;

pub use id_token::{auth_middleware, AuthState};
pub use operator::{operator_middleware, OperatorToken};

use axum::{body::Body, http::Request};

/// Extract the bearer token from the Authorization header
fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}
