use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::appointments::{
        AppointmentList, AppointmentQuery, CreateAppointmentRequest,
        UpdateAppointmentStatusRequest,
    },
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::Appointment,
    response::{ApiResponse, Created},
    services::appointment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_appointments).post(create_appointment))
        .route("/{id}/status", patch(update_status))
}

#[utoipa::path(
    get,
    path = "/api/appointments",
    params(AppointmentQuery),
    responses(
        (status = 200, description = "Appointments, newest first", body = ApiResponse<AppointmentList>),
        (status = 403, description = "Professional not approved")
    ),
    tag = "Appointments"
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<AppointmentQuery>,
) -> AppResult<Json<ApiResponse<AppointmentList>>> {
    let resp = appointment_service::list_appointments(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment logged", body = ApiResponse<Appointment>),
        (status = 400, description = "Missing payment proof"),
        (status = 404, description = "Service not found"),
        (status = 409, description = "Transaction id already used")
    ),
    tag = "Appointments"
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateAppointmentRequest>,
) -> AppResult<Created<Appointment>> {
    let resp = appointment_service::create_appointment(&state, &user, payload).await?;
    Ok(resp.into_created())
}

#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/status",
    params(("id" = Uuid, Path, description = "Appointment ID")),
    request_body = UpdateAppointmentStatusRequest,
    responses(
        (status = 200, description = "Appointment reviewed", body = ApiResponse<Appointment>),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Appointment already reviewed")
    ),
    tag = "Appointments"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateAppointmentStatusRequest>,
) -> AppResult<Json<ApiResponse<Appointment>>> {
    let resp = appointment_service::update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
