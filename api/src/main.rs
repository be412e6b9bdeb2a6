//! Pairwise API Server
//!
//! Crowd-sourced pairwise ranking: voters pick the better of two entries, and each
//! vote moves both entries' Elo scores. Uses hexagonal (ports & adapters) architecture
//! for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    IdentityToolkitVerifier, PostgresBucketRepository, PostgresEntryRepository,
    PostgresUserRepository, PostgresVoteRepository, RosterHttpClient, SystemClock,
};
use app::{
    BucketService, LeaderboardService, PairingService, QuotaPolicy, UserService, VoteService,
};
use auth::{AuthState, OperatorToken};
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub vote_service: Arc<VoteService<PostgresVoteRepository, SystemClock>>,
    pub pairing_service: Arc<
        PairingService<
            PostgresEntryRepository,
            PostgresUserRepository,
            PostgresVoteRepository,
            SystemClock,
        >,
    >,
    pub bucket_service:
        Arc<BucketService<PostgresEntryRepository, PostgresBucketRepository, SystemClock>>,
    pub leaderboard_service: Arc<LeaderboardService<PostgresEntryRepository>>,
    pub user_service: Arc<UserService<PostgresUserRepository, RosterHttpClient, SystemClock>>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pairwise_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Pairwise API...");

    let config = Config::from_env().context("Invalid configuration")?;

    if config.roster_api_key.is_none() {
        tracing::warn!("ROSTER_API_KEY not set, class year lookups will fail");
    }
    if config.operator_token.is_none() {
        tracing::warn!("OPERATOR_TOKEN not set, bucket generation is disabled");
    }

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    // Create adapters
    let entry_repo = Arc::new(PostgresEntryRepository::new(db.clone()));
    let user_repo = Arc::new(PostgresUserRepository::new(db.clone()));
    let vote_repo = Arc::new(PostgresVoteRepository::new(db.clone()));
    let bucket_repo = Arc::new(PostgresBucketRepository::new(db.clone()));
    let clock = Arc::new(SystemClock);

    let roster = Arc::new(RosterHttpClient::new(
        config.roster_api_url.clone(),
        config.roster_api_key.clone(),
    ));
    let verifier = Arc::new(IdentityToolkitVerifier::new(
        config.identity_api_url.clone(),
        config.identity_api_key.clone(),
    ));

    let quota = QuotaPolicy::new(config.daily_vote_limit, config.reference_timezone);

    // Create application services
    let vote_service = Arc::new(VoteService::new(
        vote_repo.clone(),
        clock.clone(),
        quota,
        config.current_class_year,
        config.elo_jitter,
    ));

    let pairing_service = Arc::new(PairingService::new(
        entry_repo.clone(),
        user_repo.clone(),
        vote_repo.clone(),
        clock.clone(),
        quota,
        config.current_class_year,
    ));

    let bucket_service = Arc::new(BucketService::new(
        entry_repo.clone(),
        bucket_repo,
        clock.clone(),
        config.current_class_year,
    ));

    let leaderboard_service = Arc::new(LeaderboardService::new(
        entry_repo,
        config.current_class_year,
    ));

    let user_service = Arc::new(UserService::new(user_repo, roster, clock, quota));

    let state = AppState {
        vote_service,
        pairing_service,
        bucket_service,
        leaderboard_service,
        user_service,
    };

    let auth_state = AuthState {
        verifier,
        allowed_domain: config.allowed_email_domain.clone(),
    };

    // Rate limiting for votes: 1 req/sec sustained per peer IP, burst of 10
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(1)
            .burst_size(10)
            .finish()
            .context("Failed to build governor config")?,
    );

    let vote_routes = Router::new()
        .route("/votes", post(handlers::submit_vote))
        .layer(GovernorLayer {
            config: governor_config,
        });

    // Voter routes (ID token required)
    let voter_routes = Router::new()
        .route("/me", get(handlers::get_me))
        .route("/me/opt-out", post(handlers::opt_out))
        .route("/categories/:category/pairs", get(handlers::get_pairs))
        .route(
            "/categories/:category/leaderboard",
            get(handlers::get_leaderboard),
        )
        .route(
            "/categories/:category/buckets/random",
            get(handlers::get_random_buckets),
        )
        .route(
            "/categories/:category/entries/resolve",
            post(handlers::resolve_entries),
        )
        .merge(vote_routes)
        .layer(middleware::from_fn_with_state(
            auth_state,
            auth::auth_middleware,
        ));

    // Operator routes
    let operator_routes = Router::new()
        .route(
            "/categories/:category/buckets",
            post(handlers::generate_buckets),
        )
        .layer(middleware::from_fn_with_state(
            OperatorToken::new(config.operator_token.as_deref()),
            auth::operator_middleware,
        ));

    // Build router
    let app = Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        .merge(voter_routes)
        .merge(operator_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
