use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::schedule::{
        AppointmentRequestList, AvailabilityList, BlockList, CreateAvailabilityRequest,
        CreateBlockRequest, NewAppointmentRequest, ScheduleQuery, UpdateRequestStatus,
    },
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::{AppointmentRequest, AvailabilityWindow, ScheduleBlock},
    response::{ApiResponse, Created},
    services::schedule_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/availability", get(list_availability).post(create_availability))
        .route("/blocks", get(list_blocks).post(create_block))
        .route("/requests", get(list_requests).post(create_request))
        .route("/requests/{id}/status", patch(update_request_status))
}

#[utoipa::path(
    get,
    path = "/api/schedule/availability",
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Weekly availability windows", body = ApiResponse<AvailabilityList>),
        (status = 403, description = "Professional not approved")
    ),
    tag = "Schedule"
)]
pub async fn list_availability(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<ScheduleQuery>,
) -> AppResult<Json<ApiResponse<AvailabilityList>>> {
    let resp = schedule_service::list_availability(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/schedule/availability",
    request_body = CreateAvailabilityRequest,
    responses(
        (status = 201, description = "Window added", body = ApiResponse<AvailabilityWindow>),
        (status = 400, description = "Invalid weekday or time range"),
        (status = 403, description = "Only approved professionals")
    ),
    tag = "Schedule"
)]
pub async fn create_availability(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateAvailabilityRequest>,
) -> AppResult<Created<AvailabilityWindow>> {
    let resp = schedule_service::create_availability(&state, &user, payload).await?;
    Ok(resp.into_created())
}

#[utoipa::path(
    get,
    path = "/api/schedule/blocks",
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Blocked periods", body = ApiResponse<BlockList>)
    ),
    tag = "Schedule"
)]
pub async fn list_blocks(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<ScheduleQuery>,
) -> AppResult<Json<ApiResponse<BlockList>>> {
    let resp = schedule_service::list_blocks(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/schedule/blocks",
    request_body = CreateBlockRequest,
    responses(
        (status = 201, description = "Period blocked", body = ApiResponse<ScheduleBlock>),
        (status = 400, description = "Block ends before it starts"),
        (status = 403, description = "Only approved professionals")
    ),
    tag = "Schedule"
)]
pub async fn create_block(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateBlockRequest>,
) -> AppResult<Created<ScheduleBlock>> {
    let resp = schedule_service::create_block(&state, &user, payload).await?;
    Ok(resp.into_created())
}

#[utoipa::path(
    get,
    path = "/api/schedule/requests",
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Appointment requests", body = ApiResponse<AppointmentRequestList>)
    ),
    tag = "Schedule"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<ScheduleQuery>,
) -> AppResult<Json<ApiResponse<AppointmentRequestList>>> {
    let resp = schedule_service::list_requests(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/schedule/requests",
    request_body = NewAppointmentRequest,
    responses(
        (status = 201, description = "Request filed", body = ApiResponse<AppointmentRequest>),
        (status = 403, description = "Professional filing for someone else"),
        (status = 404, description = "Professional or service not in this shop")
    ),
    tag = "Schedule"
)]
pub async fn create_request(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<NewAppointmentRequest>,
) -> AppResult<Created<AppointmentRequest>> {
    let resp = schedule_service::create_request(&state, &user, payload).await?;
    Ok(resp.into_created())
}

#[utoipa::path(
    patch,
    path = "/api/schedule/requests/{id}/status",
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateRequestStatus,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<AppointmentRequest>),
        (status = 404, description = "Request not found")
    ),
    tag = "Schedule"
)]
pub async fn update_request_status(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateRequestStatus>,
) -> AppResult<Json<ApiResponse<AppointmentRequest>>> {
    let resp = schedule_service::update_request_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
