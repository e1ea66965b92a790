use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::catalog::{CreateServiceRequest, ServiceList, ServiceQuery, UpdateServiceRequest},
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    middleware::auth::AuthUser,
    models::Service,
    response::{ApiResponse, Created},
    services::catalog_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/{id}", patch(update_service).delete(delete_service))
}

#[utoipa::path(
    get,
    path = "/api/services",
    params(ServiceQuery),
    responses(
        (status = 200, description = "Services of the caller's shop", body = ApiResponse<ServiceList>)
    ),
    tag = "Services"
)]
pub async fn list_services(
    State(state): State<AppState>,
    user: AuthUser,
    AppQuery(query): AppQuery<ServiceQuery>,
) -> AppResult<Json<ApiResponse<ServiceList>>> {
    let resp = catalog_service::list_services(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = ApiResponse<Service>),
        (status = 403, description = "Managers only")
    ),
    tag = "Services"
)]
pub async fn create_service(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(payload): AppJson<CreateServiceRequest>,
) -> AppResult<Created<Service>> {
    let resp = catalog_service::create_service(&state, &user, payload).await?;
    Ok(resp.into_created())
}

#[utoipa::path(
    patch,
    path = "/api/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = ApiResponse<Service>),
        (status = 404, description = "Service not found")
    ),
    tag = "Services"
)]
pub async fn update_service(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateServiceRequest>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = catalog_service::update_service(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service deleted", body = ApiResponse<Service>),
        (status = 404, description = "Service not found"),
        (status = 409, description = "Service has appointments")
    ),
    tag = "Services"
)]
pub async fn delete_service(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<ApiResponse<Service>>> {
    let resp = catalog_service::delete_service(&state, &user, id).await?;
    Ok(Json(resp))
}
