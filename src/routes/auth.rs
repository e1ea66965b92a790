use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    dto::auth::{Account, LoginRequest, LoginResponse, LogoutResponse, RegisterRequest},
    error::AppResult,
    extract::{AppJson, ClientIp},
    middleware::auth::SESSION_COOKIE,
    response::ApiResponse,
    services::{auth_service, session_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = ApiResponse<Account>),
        (status = 400, description = "Invalid field or unknown shop code"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, CookieJar, Json<ApiResponse<Account>>)> {
    let (resp, session) = auth_service::register(&state, payload).await?;
    let jar = match session {
        Some(issued) => jar.add(session_service::session_cookie(
            &state.config,
            issued.token,
            issued.session.ttl_seconds,
        )),
        None => jar,
    };
    Ok((StatusCode::CREATED, jar, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials or account not active"),
        (status = 429, description = "Too many login attempts from this address")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<ApiResponse<LoginResponse>>)> {
    state.login_limiter.hit(&format!("login:{ip}"))?;
    let (resp, issued) = auth_service::login(&state, payload).await?;
    let jar = jar.add(session_service::session_cookie(
        &state.config,
        issued.token,
        issued.session.ttl_seconds,
    ));
    Ok((jar, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session cleared", body = ApiResponse<LogoutResponse>)
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<ApiResponse<LogoutResponse>>)> {
    let token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    let resp = auth_service::logout(&state, token.as_deref()).await?;
    Ok((jar.remove(session_service::removal_cookie()), Json(resp)))
}
