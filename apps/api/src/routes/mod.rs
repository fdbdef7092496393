pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::auth::handlers::handle_login;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/login", post(handle_login))
        // Protected: bearer token required
        .route("/api/analyze-job-ad", post(handlers::handle_analyze_text))
        .route("/api/analyze-job-url", post(handlers::handle_analyze_url))
        .with_state(state)
}
