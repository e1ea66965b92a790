use axum::{Json, Router, extract::State, routing::get};

use crate::{
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::stats_service,
    state::AppState,
    stats::StatsReport,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(shop_stats))
}

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Revenue, commission and payouts of the shop", body = ApiResponse<StatsReport>),
        (status = 403, description = "Managers only")
    ),
    tag = "Stats"
)]
pub async fn shop_stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<StatsReport>>> {
    let resp = stats_service::shop_stats(&state, &user).await?;
    Ok(Json(resp))
}
