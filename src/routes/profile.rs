use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch, post},
};

use crate::{
    dto::{
        auth::Account,
        profile::{AvailabilityRequest, UpsertProfileRequest},
    },
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    models::Profile,
    response::ApiResponse,
    services::profile_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/profile", post(upsert_profile))
        .route("/professional/availability", patch(set_availability))
}

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current account", body = ApiResponse<Account>),
        (status = 401, description = "No session")
    ),
    tag = "Profile"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Account>>> {
    let resp = profile_service::me(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/profile",
    request_body = UpsertProfileRequest,
    responses(
        (status = 200, description = "Profile saved", body = ApiResponse<Profile>),
        (status = 400, description = "Invalid field")
    ),
    tag = "Profile"
)]
pub async fn upsert_profile(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<UpsertProfileRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let resp = profile_service::upsert(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/professional/availability",
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Availability updated", body = ApiResponse<Profile>),
        (status = 403, description = "Not a professional")
    ),
    tag = "Profile"
)]
pub async fn set_availability(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<AvailabilityRequest>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let resp = profile_service::set_availability(&state, &user, payload).await?;
    Ok(Json(resp))
}
