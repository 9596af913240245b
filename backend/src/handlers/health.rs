//! Health check handlers

use axum::{extract::State, Json};
use shared::HealthStatus;

use crate::services::DonorService;
use crate::AppState;

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(DonorService::new(state.store.clone()).health().await)
}
