use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dto::auth::Claims,
    entity::{
        profiles::{Column as ProfileCol, Entity as Profiles, Model as ProfileModel},
        sessions::{
            ActiveModel as SessionActive, Column as SessionCol, Entity as Sessions,
            Model as SessionModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::SESSION_COOKIE,
    state::AppState,
};

pub struct IssuedSession {
    pub session: SessionModel,
    pub token: String,
}

pub async fn create(
    state: &AppState,
    user_id: Uuid,
    keep_connected: bool,
) -> AppResult<IssuedSession> {
    let ttl_seconds = state.config.session_ttl_seconds(keep_connected);
    let now = Utc::now();

    // Expired rows of this user are dropped on each new login.
    let pruned = Sessions::delete_many()
        .filter(SessionCol::UserId.eq(user_id))
        .filter(SessionCol::ExpiresAt.lt(now))
        .exec(&state.orm)
        .await?;
    if pruned.rows_affected > 0 {
        tracing::debug!(user_id = %user_id, pruned = pruned.rows_affected, "expired sessions removed");
    }

    let session = SessionActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        expires_at: Set((now + Duration::seconds(ttl_seconds)).into()),
        ttl_seconds: Set(ttl_seconds),
        created_at: NotSet,
        last_seen_at: Set(now.into()),
    }
    .insert(&state.orm)
    .await?;

    let token = issue_token(&state.config, &session, now)?;
    tracing::debug!(user_id = %user_id, session_id = %session.id, "session created");

    Ok(IssuedSession { session, token })
}

/// Sign the cookie value. Expiry is enforced by the `sessions` row; the token
/// stays decodable for the longest lifetime a session can have.
pub fn issue_token(
    config: &AppConfig,
    session: &SessionModel,
    now: DateTime<Utc>,
) -> AppResult<String> {
    let expiration = now
        .checked_add_signed(Duration::seconds(config.session_ttl_seconds(true)))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: session.user_id.to_string(),
        sid: session.id.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn decode_token(config: &AppConfig, token: &str) -> AppResult<(Uuid, Uuid)> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized("Invalid session".into()))?;

    let user_id = Uuid::parse_str(&data.claims.sub)
        .map_err(|_| AppError::Unauthorized("Invalid session".into()))?;
    let session_id = Uuid::parse_str(&data.claims.sid)
        .map_err(|_| AppError::Unauthorized("Invalid session".into()))?;
    Ok((user_id, session_id))
}

/// Load the live session behind a token, sliding its expiry when it is past
/// the half-way point.
pub async fn resolve(state: &AppState, token: &str) -> AppResult<SessionModel> {
    let (user_id, session_id) = decode_token(&state.config, token)?;

    let session = Sessions::find_by_id(session_id)
        .one(&state.orm)
        .await?
        .filter(|s| s.user_id == user_id)
        .ok_or_else(|| AppError::Unauthorized("Session expired".into()))?;

    let now = Utc::now();
    if session.expires_at.with_timezone(&Utc) <= now {
        Sessions::delete_by_id(session.id).exec(&state.orm).await?;
        return Err(AppError::Unauthorized("Session expired".into()));
    }

    if !needs_refresh(&session, now) {
        return Ok(session);
    }

    let ttl_seconds = session.ttl_seconds;
    let mut active: SessionActive = session.into();
    active.expires_at = Set((now + Duration::seconds(ttl_seconds)).into());
    active.last_seen_at = Set(now.into());
    Ok(active.update(&state.orm).await?)
}

/// True once less than half of the session lifetime remains.
pub fn needs_refresh(session: &SessionModel, now: DateTime<Utc>) -> bool {
    let remaining = session.expires_at.with_timezone(&Utc) - now;
    remaining < Duration::seconds(session.ttl_seconds / 2)
}

pub async fn destroy(state: &AppState, session_id: Uuid) -> AppResult<()> {
    Sessions::delete_by_id(session_id).exec(&state.orm).await?;
    Ok(())
}

pub async fn load_profile(state: &AppState, user_id: Uuid) -> AppResult<Option<ProfileModel>> {
    Ok(Profiles::find()
        .filter(ProfileCol::UserId.eq(user_id))
        .one(&state.orm)
        .await?)
}

pub fn session_cookie(config: &AppConfig, token: String, ttl_seconds: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(config.is_production());
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(cookie::time::Duration::seconds(ttl_seconds));
    cookie
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie
}
