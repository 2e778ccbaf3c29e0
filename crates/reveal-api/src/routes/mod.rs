//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{feedback, health, reservations, tokens, votes};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        // API v1 endpoints
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes (unversioned, for orchestration probes)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/reservations", post(reservations::create_reservation))
        .route("/tokens/verify", post(tokens::verify_token))
        .route("/votes", get(votes::vote_status).post(votes::submit_vote))
        .route("/feedback", post(feedback::submit_feedback))
}
