use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::uploads::{UploadRequest, UploadResponse},
    error::AppResult,
    extract::AppJson,
    middleware::auth::AuthUser,
    response::{ApiResponse, Created},
    services::upload_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upload))
}

#[utoipa::path(
    post,
    path = "/api/uploads",
    request_body = UploadRequest,
    responses(
        (status = 201, description = "Image stored", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Invalid or oversized payload"),
        (status = 502, description = "Media host failed"),
        (status = 503, description = "Uploads not configured")
    ),
    tag = "Uploads"
)]
pub async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<UploadRequest>,
) -> AppResult<Created<UploadResponse>> {
    let resp = upload_service::upload(&state, &user, payload).await?;
    Ok(resp.into_created())
}
