use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::LockType,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::professionals::{DecisionRequest, DecisionResponse, ProfessionalList, ProfessionalView},
    entity::{
        professional_approvals::ActiveModel as ApprovalActive,
        profiles::{ActiveModel as ProfileActive, Column as ProfileCol, Entity as Profiles},
        sea_orm_active_enums::{ApprovalAction, ApprovalStatus, Role},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_manager},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// What an accepted decision does to the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Approve,
    Reject,
    /// Approve replayed on an active professional: only the history grows.
    ReplayApprove,
}

pub fn transition(current: ApprovalStatus, action: ApprovalAction) -> AppResult<Transition> {
    match (current, action) {
        (ApprovalStatus::PendingApproval, ApprovalAction::Approve) => Ok(Transition::Approve),
        (ApprovalStatus::PendingApproval, ApprovalAction::Reject) => Ok(Transition::Reject),
        (ApprovalStatus::Active, ApprovalAction::Approve) => Ok(Transition::ReplayApprove),
        (ApprovalStatus::Active, ApprovalAction::Reject) => {
            Err(AppError::Conflict("Professional is already active".into()))
        }
        (ApprovalStatus::Rejected, _) => Err(AppError::Conflict(
            "Professional registration was already rejected".into(),
        )),
    }
}

pub async fn list_professionals(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ProfessionalList>> {
    let scope = ensure_manager(user)?;
    let items = load_professionals(state, scope.shop_id, None).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Ok", ProfessionalList { items }, Some(meta)))
}

pub async fn list_pending(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ProfessionalList>> {
    let scope = ensure_manager(user)?;
    let items =
        load_professionals(state, scope.shop_id, Some(ApprovalStatus::PendingApproval)).await?;
    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Ok", ProfessionalList { items }, Some(meta)))
}

async fn load_professionals(
    state: &AppState,
    shop_id: Uuid,
    status: Option<ApprovalStatus>,
) -> AppResult<Vec<ProfessionalView>> {
    let mut condition = Condition::all()
        .add(ProfileCol::ShopId.eq(shop_id))
        .add(ProfileCol::Role.eq(Role::Professional));
    if let Some(status) = status {
        condition = condition.add(ProfileCol::ApprovalStatus.eq(status));
    }

    let profiles = Profiles::find()
        .filter(condition)
        .order_by_asc(ProfileCol::CreatedAt)
        .all(&state.orm)
        .await?;
    if profiles.is_empty() {
        return Ok(Vec::new());
    }

    let user_ids: Vec<Uuid> = profiles.iter().map(|p| p.user_id).collect();
    let users: HashMap<Uuid, _> = Users::find()
        .filter(UserCol::Id.is_in(user_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    Ok(profiles
        .into_iter()
        .filter_map(|profile| {
            let user = users.get(&profile.user_id)?;
            Some(ProfessionalView {
                user_id: user.id,
                profile_id: profile.id,
                name: user.name.clone(),
                email: user.email.clone(),
                phone: profile.phone,
                profile_image_url: user.profile_image_url.clone(),
                approval_status: profile.approval_status,
                availability: profile.availability,
                created_at: profile.created_at.with_timezone(&Utc),
            })
        })
        .collect())
}

/// Approve or reject a professional of the manager's shop. The profile update
/// and the history row are written in one transaction.
pub async fn decide(
    state: &AppState,
    user: &AuthUser,
    professional_user_id: Uuid,
    payload: DecisionRequest,
) -> AppResult<ApiResponse<DecisionResponse>> {
    let scope = ensure_manager(user)?;
    let txn = state.orm.begin().await?;

    let profile = Profiles::find()
        .filter(
            Condition::all()
                .add(ProfileCol::UserId.eq(professional_user_id))
                .add(ProfileCol::Role.eq(Role::Professional)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Professional"))?;

    if profile.shop_id != Some(scope.shop_id) {
        return Err(AppError::Forbidden("Professional belongs to another shop".into()));
    }

    let step = transition(profile.approval_status, payload.action)?;
    let now = Utc::now();
    let profile = match step {
        Transition::ReplayApprove => profile,
        Transition::Approve => {
            let mut active: ProfileActive = profile.into();
            active.approval_status = Set(ApprovalStatus::Active);
            active.approved_by_user_id = Set(Some(user.user_id));
            active.approval_at = Set(Some(now.into()));
            active.rejection_at = Set(None);
            active.updated_at = Set(now.into());
            active.update(&txn).await?
        }
        Transition::Reject => {
            let mut active: ProfileActive = profile.into();
            active.approval_status = Set(ApprovalStatus::Rejected);
            active.rejection_at = Set(Some(now.into()));
            active.approval_at = Set(None);
            active.updated_at = Set(now.into());
            active.update(&txn).await?
        }
    };

    let decision = ApprovalActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(scope.shop_id),
        professional_user_id: Set(professional_user_id),
        manager_user_id: Set(user.user_id),
        action: Set(payload.action),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    tracing::info!(
        professional_id = %professional_user_id,
        manager_id = %user.user_id,
        action = ?payload.action,
        "professional decision recorded"
    );
    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "professional_decision",
        "professional_approvals",
        serde_json::json!({
            "professional_id": professional_user_id,
            "action": payload.action,
            "status": profile.approval_status,
        }),
    )
    .await;

    let message = match payload.action {
        ApprovalAction::Approve => "Professional approved",
        ApprovalAction::Reject => "Professional rejected",
    };
    Ok(ApiResponse::success(
        message,
        DecisionResponse {
            profile: profile.into(),
            decision: decision.into(),
        },
        Some(Meta::empty()),
    ))
}
