use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, patch},
};
use uuid::Uuid;

use crate::{
    dto::deductions::{
        CreateIndividualDeductionRequest, CreateStandardDeductionRequest,
        IndividualDeductionList, IndividualDeductionQuery, StandardDeductionList,
        UpdateStandardDeductionRequest,
    },
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::{IndividualDeduction, StandardDeduction},
    response::{ApiResponse, Created},
    services::deduction_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/standard", get(list_standard).post(create_standard))
        .route(
            "/standard/{id}",
            patch(update_standard).delete(delete_standard),
        )
        .route("/individual", get(list_individual).post(create_individual))
        .route("/individual/{id}", delete(delete_individual))
}

#[utoipa::path(
    get,
    path = "/api/deductions/standard",
    responses(
        (status = 200, description = "Shop-wide deductions", body = ApiResponse<StandardDeductionList>)
    ),
    tag = "Deductions"
)]
pub async fn list_standard(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<StandardDeductionList>>> {
    let resp = deduction_service::list_standard(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/deductions/standard",
    request_body = CreateStandardDeductionRequest,
    responses(
        (status = 201, description = "Deduction created", body = ApiResponse<StandardDeduction>),
        (status = 403, description = "Managers only")
    ),
    tag = "Deductions"
)]
pub async fn create_standard(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateStandardDeductionRequest>,
) -> AppResult<Created<StandardDeduction>> {
    let resp = deduction_service::create_standard(&state, &user, payload).await?;
    Ok(resp.into_created())
}

#[utoipa::path(
    patch,
    path = "/api/deductions/standard/{id}",
    params(("id" = Uuid, Path, description = "Deduction ID")),
    request_body = UpdateStandardDeductionRequest,
    responses(
        (status = 200, description = "Deduction updated", body = ApiResponse<StandardDeduction>),
        (status = 404, description = "Deduction not found")
    ),
    tag = "Deductions"
)]
pub async fn update_standard(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateStandardDeductionRequest>,
) -> AppResult<Json<ApiResponse<StandardDeduction>>> {
    let resp = deduction_service::update_standard(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/deductions/standard/{id}",
    params(("id" = Uuid, Path, description = "Deduction ID")),
    responses(
        (status = 200, description = "Deduction deleted", body = ApiResponse<StandardDeduction>),
        (status = 404, description = "Deduction not found")
    ),
    tag = "Deductions"
)]
pub async fn delete_standard(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<StandardDeduction>>> {
    let resp = deduction_service::delete_standard(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/deductions/individual",
    params(IndividualDeductionQuery),
    responses(
        (status = 200, description = "Per-professional deductions", body = ApiResponse<IndividualDeductionList>)
    ),
    tag = "Deductions"
)]
pub async fn list_individual(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<IndividualDeductionQuery>,
) -> AppResult<Json<ApiResponse<IndividualDeductionList>>> {
    let resp = deduction_service::list_individual(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/deductions/individual",
    request_body = CreateIndividualDeductionRequest,
    responses(
        (status = 201, description = "Deduction created", body = ApiResponse<IndividualDeduction>),
        (status = 404, description = "Professional not in this shop")
    ),
    tag = "Deductions"
)]
pub async fn create_individual(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateIndividualDeductionRequest>,
) -> AppResult<Created<IndividualDeduction>> {
    let resp = deduction_service::create_individual(&state, &user, payload).await?;
    Ok(resp.into_created())
}

#[utoipa::path(
    delete,
    path = "/api/deductions/individual/{id}",
    params(("id" = Uuid, Path, description = "Deduction ID")),
    responses(
        (status = 200, description = "Deduction deleted", body = ApiResponse<IndividualDeduction>),
        (status = 404, description = "Deduction not found")
    ),
    tag = "Deductions"
)]
pub async fn delete_individual(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<IndividualDeduction>>> {
    let resp = deduction_service::delete_individual(&state, &user, id).await?;
    Ok(Json(resp))
}
