//! Weekly availability, blocked periods and customer appointment requests.
//!
//! Professionals manage their own rows; managers read the whole shop and may
//! file requests on behalf of any professional of it.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::LockType,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::schedule::{
        AppointmentRequestList, AvailabilityList, BlockList, CreateAvailabilityRequest,
        CreateBlockRequest, NewAppointmentRequest, ScheduleQuery, UpdateRequestStatus,
    },
    entity::{
        appointment_requests::{
            ActiveModel as RequestActive, Column as RequestCol, Entity as AppointmentRequests,
        },
        professional_availability::{
            ActiveModel as AvailabilityActive, Column as AvailabilityCol,
            Entity as ProfessionalAvailability,
        },
        profiles::{Column as ProfileCol, Entity as Profiles},
        schedule_blocks::{ActiveModel as BlockActive, Column as BlockCol, Entity as ScheduleBlocks},
        sea_orm_active_enums::{RequestStatus, Role},
        services::{Column as ServiceCol, Entity as Services},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ShopScope, ensure_active_professional, ensure_shop_member},
    models::{AppointmentRequest, AvailabilityWindow, ScheduleBlock},
    response::{ApiResponse, Meta},
    state::AppState,
    validation,
};

/// Managers, or professionals that were approved.
fn schedule_scope(user: &AuthUser) -> AppResult<ShopScope> {
    let scope = ensure_shop_member(user)?;
    match scope.role {
        Role::Manager => Ok(scope),
        Role::Professional => ensure_active_professional(user),
    }
}

/// Professional filter for a listing: a manager's optional pick, or the
/// caller themself.
fn listed_professional(scope: &ShopScope, query: &ScheduleQuery) -> Option<Uuid> {
    if scope.is_manager() {
        query.professional_id
    } else {
        Some(scope.user_id)
    }
}

pub fn validate_weekday(weekday: i16) -> AppResult<i16> {
    if !(0..=6).contains(&weekday) {
        return Err(AppError::validation(
            "weekday",
            "Weekday must be between 0 (Monday) and 6 (Sunday)",
        ));
    }
    Ok(weekday)
}

pub async fn list_availability(
    state: &AppState,
    user: &AuthUser,
    query: ScheduleQuery,
) -> AppResult<ApiResponse<AvailabilityList>> {
    let scope = schedule_scope(user)?;
    let mut condition = Condition::all().add(AvailabilityCol::ShopId.eq(scope.shop_id));
    if let Some(professional_id) = listed_professional(&scope, &query) {
        condition = condition.add(AvailabilityCol::ProfessionalId.eq(professional_id));
    }

    let items: Vec<AvailabilityWindow> = ProfessionalAvailability::find()
        .filter(condition)
        .order_by_asc(AvailabilityCol::Weekday)
        .order_by_asc(AvailabilityCol::StartTime)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Ok", AvailabilityList { items }, Some(meta)))
}

pub async fn create_availability(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAvailabilityRequest,
) -> AppResult<ApiResponse<AvailabilityWindow>> {
    let scope = ensure_active_professional(user)?;
    let weekday = validate_weekday(payload.weekday)?;
    if payload.start_time >= payload.end_time {
        return Err(AppError::validation("endTime", "End time must be after start time"));
    }

    let window = AvailabilityActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(scope.shop_id),
        professional_id: Set(scope.user_id),
        weekday: Set(weekday),
        start_time: Set(payload.start_time),
        end_time: Set(payload.end_time),
        active: Set(true),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "availability_create",
        "professional_availability",
        serde_json::json!({ "availability_id": window.id, "weekday": window.weekday }),
    )
    .await;

    Ok(ApiResponse::success(
        "Availability created",
        window.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_blocks(
    state: &AppState,
    user: &AuthUser,
    query: ScheduleQuery,
) -> AppResult<ApiResponse<BlockList>> {
    let scope = schedule_scope(user)?;
    let mut condition = Condition::all().add(BlockCol::ShopId.eq(scope.shop_id));
    if let Some(professional_id) = listed_professional(&scope, &query) {
        condition = condition.add(BlockCol::ProfessionalId.eq(professional_id));
    }

    let items: Vec<ScheduleBlock> = ScheduleBlocks::find()
        .filter(condition)
        .order_by_asc(BlockCol::StartAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Ok", BlockList { items }, Some(meta)))
}

pub async fn create_block(
    state: &AppState,
    user: &AuthUser,
    payload: CreateBlockRequest,
) -> AppResult<ApiResponse<ScheduleBlock>> {
    let scope = ensure_active_professional(user)?;
    if payload.start_at >= payload.end_at {
        return Err(AppError::validation("endAt", "Block must end after it starts"));
    }
    let reason = payload
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty());

    let block = BlockActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(scope.shop_id),
        professional_id: Set(scope.user_id),
        start_at: Set(payload.start_at.into()),
        end_at: Set(payload.end_at.into()),
        reason: Set(reason),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "block_create",
        "schedule_blocks",
        serde_json::json!({ "block_id": block.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Block created",
        block.into(),
        Some(Meta::empty()),
    ))
}

pub async fn list_requests(
    state: &AppState,
    user: &AuthUser,
    query: ScheduleQuery,
) -> AppResult<ApiResponse<AppointmentRequestList>> {
    let scope = schedule_scope(user)?;
    let mut condition = Condition::all().add(RequestCol::ShopId.eq(scope.shop_id));
    if let Some(professional_id) = listed_professional(&scope, &query) {
        condition = condition.add(RequestCol::ProfessionalId.eq(professional_id));
    }
    if let Some(status) = query.status {
        condition = condition.add(RequestCol::Status.eq(status));
    }

    let items: Vec<AppointmentRequest> = AppointmentRequests::find()
        .filter(condition)
        .order_by_asc(RequestCol::RequestedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Ok",
        AppointmentRequestList { items },
        Some(meta),
    ))
}

/// Files a request in `requested` state. A professional always files for
/// themself; a manager may assign any professional of the shop or none.
pub async fn create_request(
    state: &AppState,
    user: &AuthUser,
    payload: NewAppointmentRequest,
) -> AppResult<ApiResponse<AppointmentRequest>> {
    let scope = schedule_scope(user)?;
    let customer_name = validation::require_name("customerName", &payload.customer_name)?;
    let customer_phone = validation::require_phone(&payload.customer_phone)?;

    let professional_id = match scope.role {
        Role::Professional => match payload.professional_id {
            Some(id) if id != scope.user_id => return Err(AppError::forbidden()),
            _ => Some(scope.user_id),
        },
        Role::Manager => match payload.professional_id {
            Some(id) => {
                Profiles::find()
                    .filter(
                        Condition::all()
                            .add(ProfileCol::UserId.eq(id))
                            .add(ProfileCol::ShopId.eq(scope.shop_id))
                            .add(ProfileCol::Role.eq(Role::Professional)),
                    )
                    .one(&state.orm)
                    .await?
                    .ok_or_else(|| AppError::not_found("Professional"))?;
                Some(id)
            }
            None => None,
        },
    };

    if let Some(service_id) = payload.service_id {
        Services::find()
            .filter(
                Condition::all()
                    .add(ServiceCol::Id.eq(service_id))
                    .add(ServiceCol::ShopId.eq(scope.shop_id)),
            )
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::not_found("Service"))?;
    }

    let request = RequestActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(scope.shop_id),
        professional_id: Set(professional_id),
        service_id: Set(payload.service_id),
        customer_name: Set(customer_name),
        customer_phone: Set(customer_phone),
        requested_at: Set(payload.requested_at.into()),
        status: Set(RequestStatus::Requested),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "request_create",
        "appointment_requests",
        serde_json::json!({
            "request_id": request.id,
            "professional_id": request.professional_id,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Request created",
        request.into(),
        Some(Meta::empty()),
    ))
}

/// Moves a request to any status. Professionals only reach their own requests.
pub async fn update_request_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRequestStatus,
) -> AppResult<ApiResponse<AppointmentRequest>> {
    let scope = schedule_scope(user)?;
    let mut condition = Condition::all()
        .add(RequestCol::Id.eq(id))
        .add(RequestCol::ShopId.eq(scope.shop_id));
    if !scope.is_manager() {
        condition = condition.add(RequestCol::ProfessionalId.eq(scope.user_id));
    }

    let txn = state.orm.begin().await?;
    let request = AppointmentRequests::find()
        .filter(condition)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Request"))?;

    let previous = request.status;
    let mut active: RequestActive = request.into();
    active.status = Set(payload.status);
    active.updated_at = Set(Utc::now().into());
    let request = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "request_status",
        "appointment_requests",
        serde_json::json!({
            "request_id": request.id,
            "from": previous,
            "to": request.status,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Request updated",
        request.into(),
        Some(Meta::empty()),
    ))
}
