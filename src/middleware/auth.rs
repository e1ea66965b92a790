use axum::{extract::FromRequestParts, http::header};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::{
    entity::{
        profiles::Model as ProfileModel,
        sea_orm_active_enums::{ApprovalStatus, Role},
    },
    error::AppError,
    services::session_service,
    state::AppState,
};

pub const SESSION_COOKIE: &str = "luxe_session";

/// Identity resolved once per request from the session cookie (or a bearer
/// token carrying the same JWT) and handed to every handler explicitly.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub profile: Option<ProfileModel>,
}

/// Caller's tenant and role once a guard has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopScope {
    pub user_id: Uuid,
    pub shop_id: Uuid,
    pub role: Role,
}

impl ShopScope {
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }
}

pub fn ensure_shop_member(user: &AuthUser) -> Result<ShopScope, AppError> {
    let profile = user
        .profile
        .as_ref()
        .ok_or_else(|| AppError::Forbidden("Profile not found".into()))?;
    let shop_id = profile
        .shop_id
        .ok_or_else(|| AppError::Forbidden("Profile is not linked to a shop".into()))?;
    Ok(ShopScope {
        user_id: user.user_id,
        shop_id,
        role: profile.role,
    })
}

pub fn ensure_role(user: &AuthUser, role: Role) -> Result<ShopScope, AppError> {
    let scope = ensure_shop_member(user)?;
    if scope.role != role {
        return Err(AppError::forbidden());
    }
    Ok(scope)
}

pub fn ensure_manager(user: &AuthUser) -> Result<ShopScope, AppError> {
    ensure_role(user, Role::Manager)
}

pub fn ensure_professional(user: &AuthUser) -> Result<ShopScope, AppError> {
    ensure_role(user, Role::Professional)
}

pub fn ensure_active_professional(user: &AuthUser) -> Result<ShopScope, AppError> {
    let scope = ensure_professional(user)?;
    let approved = user
        .profile
        .as_ref()
        .is_some_and(|p| p.approval_status == ApprovalStatus::Active);
    if !approved {
        return Err(AppError::Forbidden("Waiting for manager approval".into()));
    }
    Ok(scope)
}

/// Session token from the cookie, falling back to `Authorization: Bearer`.
pub fn extract_token(headers: &axum::http::HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Log in to continue".into()))?;

        let session = session_service::resolve(state, &token).await?;
        let profile = session_service::load_profile(state, session.user_id).await?;

        Ok(AuthUser {
            user_id: session.user_id,
            session_id: session.id,
            profile,
        })
    }
}
