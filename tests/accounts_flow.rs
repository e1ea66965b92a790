mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::FakeMediaHost;
use luxe_salon_api::{
    dto::profile::UpsertProfileRequest,
    entity::{
        sea_orm_active_enums::{ApprovalStatus, Role},
        sessions::{ActiveModel as SessionActive, Entity as Sessions},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::AppError,
    middleware::auth::AuthUser,
    services::{auth_service, profile_service, session_service},
    state::AppState,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

/// A user row with no profile, as left behind by an interrupted signup.
async fn bare_user(state: &AppState, name: &str) -> anyhow::Result<AuthUser> {
    let prefix = common::unique_prefix("bare");
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(common::email_for(&prefix)),
        name: Set(name.to_string()),
        password_hash: Set(auth_service::hash_password(common::PASSWORD)?),
        profile_image_url: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(AuthUser {
        user_id: user.id,
        session_id: Uuid::new_v4(),
        profile: None,
    })
}

async fn stored_name(state: &AppState, user_id: Uuid) -> anyhow::Result<String> {
    let user = Users::find_by_id(user_id)
        .one(&state.orm)
        .await?
        .expect("user row");
    Ok(user.name)
}

#[tokio::test]
async fn profile_upsert_writes_nothing_when_the_shop_code_is_wrong() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url, Arc::new(FakeMediaHost::default())).await?;
    let shop = common::new_shop(&state).await?;
    let user = bare_user(&state, "Iara").await?;

    let unknown = profile_service::upsert(
        &state,
        &user,
        UpsertProfileRequest {
            name: Some("Iara Souza".into()),
            shop_code: Some("LX-NOPE00".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(
        unknown,
        Err(AppError::Validation { field: "shopCode", .. })
    ));
    assert_eq!(stored_name(&state, user.user_id).await?, "Iara");

    let bad_phone = profile_service::upsert(
        &state,
        &user,
        UpsertProfileRequest {
            name: Some("Iara Souza".into()),
            phone: Some("123".into()),
            shop_code: Some(shop.shop_code.clone()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad_phone, Err(AppError::Validation { field: "phone", .. })));
    assert_eq!(stored_name(&state, user.user_id).await?, "Iara");

    let joined = profile_service::upsert(
        &state,
        &user,
        UpsertProfileRequest {
            name: Some("Iara Souza".into()),
            cpf: Some(" 123.456.789-00 ".into()),
            shop_code: Some(shop.shop_code.to_lowercase()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("profile");
    assert_eq!(joined.shop_id, Some(shop.shop_id));
    assert_eq!(joined.role, Role::Professional);
    assert_eq!(joined.approval_status, ApprovalStatus::PendingApproval);
    assert_eq!(joined.cpf.as_deref(), Some("123.456.789-00"));
    assert_eq!(stored_name(&state, user.user_id).await?, "Iara Souza");

    Ok(())
}

#[tokio::test]
async fn failed_professional_registration_leaves_no_user() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url, Arc::new(FakeMediaHost::default())).await?;

    let prefix = common::unique_prefix("orphan");
    let result = auth_service::register(
        &state,
        common::professional_registration(&prefix, "LX-NOPE00"),
    )
    .await;
    assert!(matches!(
        result,
        Err(AppError::Validation { field: "shopCode", .. })
    ));

    let users = Users::find()
        .filter(UserCol::Email.eq(common::email_for(&prefix)))
        .count(&state.orm)
        .await?;
    assert_eq!(users, 0);

    // The same prefix is still free once a real code is given.
    let shop = common::new_shop(&state).await?;
    auth_service::register(
        &state,
        common::professional_registration(&prefix, &shop.shop_code),
    )
    .await?;

    Ok(())
}

#[tokio::test]
async fn new_sessions_drop_the_users_expired_ones() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url, Arc::new(FakeMediaHost::default())).await?;
    let shop = common::new_shop(&state).await?;
    let user_id = shop.manager.user_id;
    let now = Utc::now();

    let stale = SessionActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        expires_at: Set((now - Duration::hours(1)).into()),
        ttl_seconds: Set(3600),
        created_at: NotSet,
        last_seen_at: Set((now - Duration::hours(2)).into()),
    }
    .insert(&state.orm)
    .await?;

    let issued = session_service::create(&state, user_id, false).await?;

    assert!(Sessions::find_by_id(stale.id).one(&state.orm).await?.is_none());
    // Live sessions, including the manager's current one, survive.
    assert!(Sessions::find_by_id(shop.manager.session_id)
        .one(&state.orm)
        .await?
        .is_some());
    assert!(Sessions::find_by_id(issued.session.id)
        .one(&state.orm)
        .await?
        .is_some());

    Ok(())
}
