use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::professionals::{DecisionRequest, DecisionResponse, ProfessionalList},
    error::AppResult,
    extract::{AppJson, AppPath},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::approval_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_professionals))
        .route("/pending", get(list_pending))
        .route("/{id}/decision", post(decide))
}

#[utoipa::path(
    get,
    path = "/api/professionals",
    responses(
        (status = 200, description = "Professionals of the shop", body = ApiResponse<ProfessionalList>),
        (status = 403, description = "Managers only")
    ),
    tag = "Professionals"
)]
pub async fn list_professionals(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProfessionalList>>> {
    let resp = approval_service::list_professionals(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/professionals/pending",
    responses(
        (status = 200, description = "Professionals waiting for approval", body = ApiResponse<ProfessionalList>),
        (status = 403, description = "Managers only")
    ),
    tag = "Professionals"
)]
pub async fn list_pending(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProfessionalList>>> {
    let resp = approval_service::list_pending(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/professionals/{id}/decision",
    params(("id" = Uuid, Path, description = "Professional user ID")),
    request_body = DecisionRequest,
    responses(
        (status = 200, description = "Decision recorded", body = ApiResponse<DecisionResponse>),
        (status = 403, description = "Professional belongs to another shop"),
        (status = 404, description = "Professional not found"),
        (status = 409, description = "Professional already decided")
    ),
    tag = "Professionals"
)]
pub async fn decide(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<DecisionRequest>,
) -> AppResult<Json<ApiResponse<DecisionResponse>>> {
    let resp = approval_service::decide(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
