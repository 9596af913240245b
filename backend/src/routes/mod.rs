//! Route definitions for the Blood Donor Registry

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Donor management
        .nest("/donors", donor_routes())
}

/// Donor management routes
fn donor_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_donors).post(handlers::create_donor))
        .route(
            "/:donor_id",
            get(handlers::get_donor)
                .put(handlers::update_donor)
                .delete(handlers::delete_donor),
        )
}
