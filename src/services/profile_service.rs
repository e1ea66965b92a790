use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        auth::Account,
        profile::{AvailabilityRequest, UpsertProfileRequest},
    },
    entity::{
        profiles::{ActiveModel as ProfileActive, Model as ProfileModel},
        sea_orm_active_enums::{ApprovalStatus, Role},
        shops::{Column as ShopCol, Entity as Shops, Model as ShopModel},
        users::{ActiveModel as UserActive, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_professional},
    models::Profile,
    response::{ApiResponse, Meta},
    state::AppState,
    validation,
};

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Account>> {
    let account = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let shop = match user.profile.as_ref().and_then(|p| p.shop_id) {
        Some(shop_id) => Shops::find_by_id(shop_id).one(&state.orm).await?,
        None => None,
    };

    let data = Account {
        user: account.into(),
        profile: user.profile.clone().map(Into::into),
        shop: shop.map(Into::into),
    };
    Ok(ApiResponse::success("Ok", data, Some(Meta::empty())))
}

enum Target {
    Existing(ProfileModel),
    Join(ShopModel),
}

/// Updates the caller's name, phone and cpf. A caller without a profile joins
/// a shop as a pending professional, which requires `shopCode`. Nothing is
/// written unless every field and the shop code check out.
pub async fn upsert(
    state: &AppState,
    user: &AuthUser,
    payload: UpsertProfileRequest,
) -> AppResult<ApiResponse<Profile>> {
    let name = payload
        .name
        .as_deref()
        .map(|n| validation::require_name("name", n))
        .transpose()?;
    let phone = payload
        .phone
        .as_deref()
        .map(validation::require_phone)
        .transpose()?;
    let cpf = payload
        .cpf
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let target = match user.profile.clone() {
        Some(existing) => Target::Existing(existing),
        None => {
            let code = payload
                .shop_code
                .as_deref()
                .ok_or_else(|| AppError::validation("shopCode", "Shop code is required"))
                .and_then(validation::require_shop_code)?;
            let shop = Shops::find()
                .filter(ShopCol::Code.eq(code))
                .one(&state.orm)
                .await?
                .ok_or_else(|| AppError::validation("shopCode", "Shop code not found"))?;
            Target::Join(shop)
        }
    };

    let txn = state.orm.begin().await?;
    if let Some(name) = name {
        let mut active: UserActive = Users::find_by_id(user.user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?
            .into();
        active.name = Set(name);
        active.updated_at = Set(Utc::now().into());
        active.update(&txn).await?;
    }

    let profile = match target {
        Target::Existing(existing) => update_existing(&txn, existing, phone, cpf).await?,
        Target::Join(shop) => create_pending(&txn, user.user_id, &shop, phone, cpf).await?,
    };
    txn.commit().await?;

    if user.profile.is_none() {
        audit::record(
            state,
            user.user_id,
            profile.shop_id,
            "profile_join_shop",
            "profiles",
            serde_json::json!({ "profile_id": profile.id }),
        )
        .await;
    }

    Ok(ApiResponse::success(
        "Profile saved",
        profile.into(),
        Some(Meta::empty()),
    ))
}

async fn update_existing(
    txn: &DatabaseTransaction,
    existing: ProfileModel,
    phone: Option<String>,
    cpf: Option<String>,
) -> AppResult<ProfileModel> {
    if phone.is_none() && cpf.is_none() {
        return Ok(existing);
    }

    let mut active: ProfileActive = existing.into();
    if let Some(phone) = phone {
        active.phone = Set(Some(phone));
    }
    if let Some(cpf) = cpf {
        active.cpf = Set(Some(cpf));
    }
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(txn).await?)
}

async fn create_pending(
    txn: &DatabaseTransaction,
    user_id: Uuid,
    shop: &ShopModel,
    phone: Option<String>,
    cpf: Option<String>,
) -> AppResult<ProfileModel> {
    let profile = ProfileActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        shop_id: Set(Some(shop.id)),
        role: Set(Role::Professional),
        phone: Set(phone),
        cpf: Set(cpf),
        approval_status: Set(ApprovalStatus::PendingApproval),
        approved_by_user_id: Set(None),
        approval_at: Set(None),
        rejection_at: Set(None),
        availability: Set(true),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(txn)
    .await?;
    Ok(profile)
}

/// Any professional may toggle the flag; it grants no access.
pub async fn set_availability(
    state: &AppState,
    user: &AuthUser,
    payload: AvailabilityRequest,
) -> AppResult<ApiResponse<Profile>> {
    ensure_professional(user)?;
    let profile = user
        .profile
        .clone()
        .ok_or_else(|| AppError::not_found("Profile"))?;

    let mut active: ProfileActive = profile.into();
    active.availability = Set(payload.availability);
    active.updated_at = Set(Utc::now().into());
    let profile = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Availability updated",
        profile.into(),
        Some(Meta::empty()),
    ))
}
