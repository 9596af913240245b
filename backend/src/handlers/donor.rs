//! Donor HTTP handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use shared::{DonorPatch, DonorQuery, NewDonor};

use crate::error::AppError;
use crate::services::DonorService;
use crate::AppState;

/// List donors, optionally narrowed by blood group, availability or city
pub async fn list_donors(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<DonorQuery>, AppError>,
) -> impl IntoResponse {
    let service = DonorService::new(state.store.clone());

    match service.list_donors(&query).await {
        Ok(donors) => (StatusCode::OK, Json(donors)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a new donor
pub async fn create_donor(
    State(state): State<AppState>,
    WithRejection(Json(input), _): WithRejection<Json<NewDonor>, AppError>,
) -> impl IntoResponse {
    let service = DonorService::new(state.store.clone());

    match service.create_donor(input).await {
        Ok(inserted) => (StatusCode::CREATED, Json(inserted)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Get a specific donor
pub async fn get_donor(
    State(state): State<AppState>,
    Path(donor_id): Path<String>,
) -> impl IntoResponse {
    let service = DonorService::new(state.store.clone());

    match service.get_donor(&donor_id).await {
        Ok(donor) => (StatusCode::OK, Json(donor)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Partially update a donor
pub async fn update_donor(
    State(state): State<AppState>,
    Path(donor_id): Path<String>,
    WithRejection(Json(patch), _): WithRejection<Json<DonorPatch>, AppError>,
) -> impl IntoResponse {
    let service = DonorService::new(state.store.clone());

    match service.update_donor(&donor_id, patch).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a donor
pub async fn delete_donor(
    State(state): State<AppState>,
    Path(donor_id): Path<String>,
) -> impl IntoResponse {
    let service = DonorService::new(state.store.clone());

    match service.delete_donor(&donor_id).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => e.into_response(),
    }
}
