use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::auth::{
        Account, LoginRequest, LoginResponse, LogoutResponse, ManagerRegistration,
        ProfessionalRegistration, RegisterRequest,
    },
    entity::{
        profiles::ActiveModel as ProfileActive,
        sea_orm_active_enums::{ApprovalStatus, Role},
        shops::{ActiveModel as ShopActive, Column as ShopCol, Entity as Shops},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::session_service::{self, IssuedSession},
    shop_code,
    state::AppState,
    validation,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

async fn ensure_email_free(state: &AppState, email: &str) -> AppResult<()> {
    let taken = Users::find()
        .filter(UserCol::Email.eq(email))
        .count(&state.orm)
        .await?;
    if taken > 0 {
        return Err(AppError::Conflict("Email is already registered".into()));
    }
    Ok(())
}

/// Registers a manager (with a new shop) or a professional (against a shop
/// code). Managers get a session right away; professionals wait for approval.
pub async fn register(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<(ApiResponse<Account>, Option<IssuedSession>)> {
    match payload {
        RegisterRequest::Manager(body) => register_manager(state, body).await,
        RegisterRequest::Professional(body) => register_professional(state, body)
            .await
            .map(|resp| (resp, None)),
    }
}

async fn register_manager(
    state: &AppState,
    payload: ManagerRegistration,
) -> AppResult<(ApiResponse<Account>, Option<IssuedSession>)> {
    let name = validation::require_name("managerName", &payload.manager_name)?;
    let shop_name = validation::require_name("shopName", &payload.shop_name)?;
    let phone = validation::require_phone(&payload.phone)?;
    let prefix = validation::require_email_prefix(&payload.email_prefix)?;
    validation::require_password(&payload.password, &payload.confirm_password)?;

    let email = validation::build_email(&prefix, &state.config.email_domain);
    ensure_email_free(state, &email).await?;
    let password_hash = hash_password(&payload.password)?;

    let txn = state.orm.begin().await?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        name: Set(name),
        password_hash: Set(password_hash),
        profile_image_url: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let code = shop_code::allocate(&txn).await?;
    let shop = ShopActive {
        id: Set(Uuid::new_v4()),
        name: Set(shop_name),
        code: Set(code),
        manager_user_id: Set(user.id),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let profile = ProfileActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        shop_id: Set(Some(shop.id)),
        role: Set(Role::Manager),
        phone: Set(Some(phone)),
        cpf: Set(None),
        approval_status: Set(ApprovalStatus::Active),
        approved_by_user_id: Set(None),
        approval_at: Set(None),
        rejection_at: Set(None),
        availability: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    let session = session_service::create(state, user.id, false).await?;
    tracing::info!(user_id = %user.id, shop_id = %shop.id, code = %shop.code, "manager registered");
    audit::record(
        state,
        user.id,
        Some(shop.id),
        "manager_register",
        "shops",
        serde_json::json!({ "shop_id": shop.id, "code": shop.code }),
    )
    .await;

    let account = Account {
        user: user.into(),
        profile: Some(profile.into()),
        shop: Some(shop.into()),
    };
    Ok((
        ApiResponse::success("Shop created", account, Some(Meta::empty())),
        Some(session),
    ))
}

async fn register_professional(
    state: &AppState,
    payload: ProfessionalRegistration,
) -> AppResult<ApiResponse<Account>> {
    let name = validation::require_name("name", &payload.name)?;
    let phone = validation::require_phone(&payload.phone)?;
    let prefix = validation::require_email_prefix(&payload.email_prefix)?;
    validation::require_password(&payload.password, &payload.confirm_password)?;
    let code = validation::require_shop_code(&payload.shop_code)?;

    let email = validation::build_email(&prefix, &state.config.email_domain);
    ensure_email_free(state, &email).await?;
    let password_hash = hash_password(&payload.password)?;

    let txn = state.orm.begin().await?;

    let shop = Shops::find()
        .filter(ShopCol::Code.eq(code.as_str()))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::validation("shopCode", "Shop code not found"))?;

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        name: Set(name),
        password_hash: Set(password_hash),
        profile_image_url: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let profile = ProfileActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.id),
        shop_id: Set(Some(shop.id)),
        role: Set(Role::Professional),
        phone: Set(Some(phone)),
        cpf: Set(None),
        approval_status: Set(ApprovalStatus::PendingApproval),
        approved_by_user_id: Set(None),
        approval_at: Set(None),
        rejection_at: Set(None),
        availability: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(user_id = %user.id, shop_id = %shop.id, "professional registered, pending approval");
    audit::record(
        state,
        user.id,
        Some(shop.id),
        "professional_register",
        "profiles",
        serde_json::json!({ "profile_id": profile.id }),
    )
    .await;

    let account = Account {
        user: user.into(),
        profile: Some(profile.into()),
        shop: Some(shop.into()),
    };
    Ok(ApiResponse::success(
        "Registration received, waiting for manager approval",
        account,
        Some(Meta::empty()),
    ))
}

pub async fn login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<(ApiResponse<LoginResponse>, IssuedSession)> {
    let LoginRequest {
        email,
        password,
        keep_connected,
    } = payload;
    let email = email.trim().to_ascii_lowercase();

    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".into()))?;

    if !verify_password(&password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid email or password".into()));
    }

    let profile = session_service::load_profile(state, user.id).await?;
    match profile.as_ref().map(|p| p.approval_status) {
        Some(ApprovalStatus::PendingApproval) => {
            return Err(AppError::Unauthorized(
                "Your account is pending manager approval".into(),
            ));
        }
        Some(ApprovalStatus::Rejected) => {
            return Err(AppError::Unauthorized(
                "Your registration was rejected by the manager".into(),
            ));
        }
        Some(ApprovalStatus::Active) | None => {}
    }

    let session = session_service::create(state, user.id, keep_connected).await?;
    audit::record(
        state,
        user.id,
        profile.as_ref().and_then(|p| p.shop_id),
        "user_login",
        "sessions",
        serde_json::json!({ "session_id": session.session.id, "keep_connected": keep_connected }),
    )
    .await;

    let resp = LoginResponse {
        ok: true,
        user: user.into(),
        profile: profile.map(Into::into),
    };
    Ok((
        ApiResponse::success("Logged in", resp, Some(Meta::empty())),
        session,
    ))
}

/// Drops the session behind `token` when there is one. Never fails on a
/// missing or stale token.
pub async fn logout(
    state: &AppState,
    token: Option<&str>,
) -> AppResult<ApiResponse<LogoutResponse>> {
    if let Some(token) = token {
        if let Ok((user_id, session_id)) = session_service::decode_token(&state.config, token) {
            session_service::destroy(state, session_id).await?;
            tracing::debug!(user_id = %user_id, session_id = %session_id, "session destroyed");
        }
    }

    Ok(ApiResponse::success(
        "Logged out",
        LogoutResponse { ok: true },
        Some(Meta::empty()),
    ))
}
