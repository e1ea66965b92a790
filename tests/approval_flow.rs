mod common;

use std::sync::Arc;

use common::{FakeMediaHost, PASSWORD};
use luxe_salon_api::{
    dto::{auth::LoginRequest, professionals::DecisionRequest},
    entity::sea_orm_active_enums::{ApprovalAction, ApprovalStatus, Role},
    error::AppError,
    services::{approval_service, auth_service},
};
use uuid::Uuid;

// Registration -> pending -> manager decision -> login, plus the guard rails around it.
#[tokio::test]
async fn professional_signup_waits_for_manager_approval() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url, Arc::new(FakeMediaHost::default())).await?;

    let shop = common::new_shop(&state).await?;
    assert!(shop.shop_code.starts_with("LX-"));
    assert_eq!(shop.shop_code.len(), 9);
    let manager_profile = shop.manager.profile.clone().expect("manager profile");
    assert_eq!(manager_profile.role, Role::Manager);
    assert_eq!(manager_profile.approval_status, ApprovalStatus::Active);

    // Shop codes match case-insensitively.
    let (pro_id, pro_email) =
        common::register_professional(&state, &shop.shop_code.to_lowercase()).await?;

    let pending_login = auth_service::login(
        &state,
        LoginRequest {
            email: pro_email.clone(),
            password: PASSWORD.into(),
            keep_connected: false,
        },
    )
    .await;
    assert!(matches!(pending_login, Err(AppError::Unauthorized(_))));

    let pending = approval_service::list_pending(&state, &shop.manager).await?;
    let pending = pending.data.expect("pending list").items;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].user_id, pro_id);

    // A manager of another shop cannot decide.
    let other = common::new_shop(&state).await?;
    let foreign = approval_service::decide(
        &state,
        &other.manager,
        pro_id,
        DecisionRequest {
            action: ApprovalAction::Approve,
        },
    )
    .await;
    assert!(matches!(foreign, Err(AppError::Forbidden(_))));

    let approved = approval_service::decide(
        &state,
        &shop.manager,
        pro_id,
        DecisionRequest {
            action: ApprovalAction::Approve,
        },
    )
    .await?
    .data
    .expect("decision");
    assert_eq!(approved.profile.approval_status, ApprovalStatus::Active);
    assert_eq!(approved.profile.approved_by_user_id, Some(shop.manager.user_id));
    let approval_at = approved.profile.approval_at.expect("approval timestamp");

    // Replaying approve is accepted and leaves the profile untouched.
    let replay = approval_service::decide(
        &state,
        &shop.manager,
        pro_id,
        DecisionRequest {
            action: ApprovalAction::Approve,
        },
    )
    .await?
    .data
    .expect("decision");
    assert_eq!(replay.profile.approval_status, ApprovalStatus::Active);
    assert_eq!(replay.profile.approval_at, Some(approval_at));
    assert_ne!(replay.decision.id, approved.decision.id);

    let late_reject = approval_service::decide(
        &state,
        &shop.manager,
        pro_id,
        DecisionRequest {
            action: ApprovalAction::Reject,
        },
    )
    .await;
    assert!(matches!(late_reject, Err(AppError::Conflict(_))));

    let unknown = approval_service::decide(
        &state,
        &shop.manager,
        Uuid::new_v4(),
        DecisionRequest {
            action: ApprovalAction::Approve,
        },
    )
    .await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));

    let professional = common::authenticate(&state, &pro_email).await?;
    let pending_after = approval_service::list_pending(&state, &shop.manager).await?;
    assert!(pending_after.data.expect("pending list").items.is_empty());

    // Professionals cannot reach manager endpoints.
    let as_professional = approval_service::list_pending(&state, &professional).await;
    assert!(matches!(as_professional, Err(AppError::Forbidden(_))));

    Ok(())
}

#[tokio::test]
async fn rejected_professional_cannot_log_in() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url, Arc::new(FakeMediaHost::default())).await?;

    let shop = common::new_shop(&state).await?;
    let (pro_id, pro_email) = common::register_professional(&state, &shop.shop_code).await?;

    let rejected = approval_service::decide(
        &state,
        &shop.manager,
        pro_id,
        DecisionRequest {
            action: ApprovalAction::Reject,
        },
    )
    .await?
    .data
    .expect("decision");
    assert_eq!(rejected.profile.approval_status, ApprovalStatus::Rejected);
    assert!(rejected.profile.rejection_at.is_some());
    assert!(rejected.profile.approval_at.is_none());

    let login = common::authenticate(&state, &pro_email).await;
    assert!(matches!(login, Err(AppError::Unauthorized(_))));

    let again = approval_service::decide(
        &state,
        &shop.manager,
        pro_id,
        DecisionRequest {
            action: ApprovalAction::Approve,
        },
    )
    .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    Ok(())
}

#[tokio::test]
async fn registration_rejects_duplicates_and_unknown_codes() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url, Arc::new(FakeMediaHost::default())).await?;

    let shop = common::new_shop(&state).await?;

    let unknown_code = auth_service::register(
        &state,
        common::professional_registration(&common::unique_prefix("pro"), "LX-NOPE00"),
    )
    .await;
    assert!(matches!(
        unknown_code,
        Err(AppError::Validation { field: "shopCode", .. })
    ));

    let prefix = common::unique_prefix("dup");
    auth_service::register(&state, common::manager_registration(&prefix)).await?;

    let as_manager = auth_service::register(&state, common::manager_registration(&prefix)).await;
    assert!(matches!(as_manager, Err(AppError::Conflict(_))));

    let as_professional = auth_service::register(
        &state,
        common::professional_registration(&prefix, &shop.shop_code),
    )
    .await;
    assert!(matches!(as_professional, Err(AppError::Conflict(_))));

    Ok(())
}
