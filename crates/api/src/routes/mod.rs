//! HTTP routes

pub mod google;
pub mod health;
pub mod lessons;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::AppContext;

/// Build the full router over a shared context.
pub fn router(ctx: Arc<AppContext>) -> Router {
    let api = Router::new()
        .route("/google/connect", get(google::connect))
        .route("/google/callback", get(google::callback))
        .route("/google/status", get(google::status))
        .route("/google/disconnect", post(google::disconnect))
        .route("/lessons/{id}/create-google-meet", post(lessons::create_google_meet))
        .route("/lessons/{id}/google-meet", delete(lessons::delete_google_meet));

    Router::new().route("/health", get(health::health)).nest("/api", api).with_state(ctx)
}
