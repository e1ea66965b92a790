use axum::{Router, routing::get};

use crate::state::AppState;

pub mod appointments;
pub mod auth;
pub mod catalog;
pub mod deductions;
pub mod doc;
pub mod health;
pub mod params;
pub mod professionals;
pub mod profile;
pub mod schedule;
pub mod stats;
pub mod uploads;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/auth", auth::router())
        .merge(profile::router())
        .nest("/services", catalog::router())
        .nest("/deductions", deductions::router())
        .nest("/appointments", appointments::router())
        .nest("/professionals", professionals::router())
        .nest("/schedule", schedule::router())
        .nest("/uploads", uploads::router())
        .nest("/stats", stats::router())
}
