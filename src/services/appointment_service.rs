use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait, sea_query::LockType,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::appointments::{
        AppointmentList, AppointmentQuery, AppointmentView, CreateAppointmentRequest,
        UpdateAppointmentStatusRequest,
    },
    entity::{
        appointments::{
            ActiveModel as AppointmentActive, Column as AppointmentCol, Entity as Appointments,
            Model as AppointmentModel,
        },
        sea_orm_active_enums::{AppointmentStatus, Role},
        services::{Column as ServiceCol, Entity as Services},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_active_professional, ensure_manager, ensure_shop_member},
    models::Appointment,
    response::{ApiResponse, Meta},
    state::AppState,
    validation,
};

/// `[start, end)` of the UTC calendar day containing `at`.
pub fn utc_day_bounds(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = at.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Accepts `YYYY-MM-DD` or RFC 3339. A bare date expands to the first instant
/// of the day, or the last one when `end_of_day` is set.
pub fn parse_date_bound(
    field: &'static str,
    value: &str,
    end_of_day: bool,
) -> AppResult<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        return Ok(if end_of_day {
            start + Duration::days(1) - Duration::microseconds(1)
        } else {
            start
        });
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::validation(field, "Expected YYYY-MM-DD or an RFC 3339 timestamp"))
}

pub async fn list_appointments(
    state: &AppState,
    user: &AuthUser,
    query: AppointmentQuery,
) -> AppResult<ApiResponse<AppointmentList>> {
    let scope = ensure_shop_member(user)?;
    let mut condition = Condition::all().add(AppointmentCol::ShopId.eq(scope.shop_id));

    match scope.role {
        Role::Manager => {
            if let Some(professional_id) = query.professional_id {
                condition = condition.add(AppointmentCol::ProfessionalId.eq(professional_id));
            }
        }
        Role::Professional => {
            ensure_active_professional(user)?;
            condition = condition.add(AppointmentCol::ProfessionalId.eq(scope.user_id));
        }
    }

    if let Some(start) = query.start_date.as_deref().filter(|s| !s.trim().is_empty()) {
        let start = parse_date_bound("startDate", start, false)?;
        condition = condition.add(AppointmentCol::Date.gte(start));
    }
    if let Some(end) = query.end_date.as_deref().filter(|s| !s.trim().is_empty()) {
        let end = parse_date_bound("endDate", end, true)?;
        condition = condition.add(AppointmentCol::Date.lte(end));
    }

    let (page, limit, offset) = query.pagination().normalize();
    let finder = Appointments::find()
        .filter(condition)
        .order_by_desc(AppointmentCol::Date)
        .order_by_desc(AppointmentCol::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;
    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let items = with_names(state, rows).await?;
    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", AppointmentList { items }, Some(meta)))
}

async fn with_names(
    state: &AppState,
    rows: Vec<AppointmentModel>,
) -> AppResult<Vec<AppointmentView>> {
    let service_ids: Vec<Uuid> = rows.iter().map(|a| a.service_id).collect();
    let professional_ids: Vec<Uuid> = rows.iter().map(|a| a.professional_id).collect();

    let service_names: HashMap<Uuid, String> = if service_ids.is_empty() {
        HashMap::new()
    } else {
        Services::find()
            .filter(ServiceCol::Id.is_in(service_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|s| (s.id, s.name))
            .collect()
    };
    let professional_names: HashMap<Uuid, String> = if professional_ids.is_empty() {
        HashMap::new()
    } else {
        Users::find()
            .filter(UserCol::Id.is_in(professional_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|row| AppointmentView {
            service_name: service_names.get(&row.service_id).cloned(),
            professional_name: professional_names.get(&row.professional_id).cloned(),
            appointment: row.into(),
        })
        .collect())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Logs an appointment for the calling professional. Price and commission
/// rate are snapshotted from the service.
pub async fn create_appointment(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAppointmentRequest,
) -> AppResult<ApiResponse<Appointment>> {
    let scope = ensure_active_professional(user)?;
    let customer_name = validation::require_name("customerName", &payload.customer_name)?;
    let transaction_id = non_blank(payload.transaction_id);
    let proof_url = non_blank(payload.proof_url);

    if payload.payment_method.requires_proof() {
        if transaction_id.is_none() {
            return Err(AppError::validation(
                "transactionId",
                "Transaction id is required for pix and card payments",
            ));
        }
        if proof_url.is_none() {
            return Err(AppError::validation(
                "proofUrl",
                "Payment proof is required for pix and card payments",
            ));
        }
    }

    let service = Services::find()
        .filter(
            Condition::all()
                .add(ServiceCol::Id.eq(payload.service_id))
                .add(ServiceCol::ShopId.eq(scope.shop_id))
                .add(ServiceCol::Active.eq(true)),
        )
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Service"))?;

    if let Some(tx) = transaction_id.as_deref() {
        let used = Appointments::find()
            .filter(AppointmentCol::TransactionId.eq(tx))
            .count(&state.orm)
            .await?;
        if used > 0 {
            return Err(AppError::Conflict("Transaction id already used".into()));
        }
    }

    let date = payload.date.unwrap_or_else(Utc::now);
    let (day_start, day_end) = utc_day_bounds(date);
    let same_day = Appointments::find()
        .filter(
            Condition::all()
                .add(AppointmentCol::ProfessionalId.eq(scope.user_id))
                .add(AppointmentCol::ServiceId.eq(service.id))
                .add(AppointmentCol::CustomerName.eq(customer_name.as_str()))
                .add(AppointmentCol::Date.gte(day_start))
                .add(AppointmentCol::Date.lt(day_end)),
        )
        .count(&state.orm)
        .await?;
    let possible_duplicate = same_day > 0;

    let appointment = AppointmentActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(scope.shop_id),
        professional_id: Set(scope.user_id),
        service_id: Set(service.id),
        date: Set(date.into()),
        customer_name: Set(customer_name),
        price: Set(service.price),
        commission_rate: Set(service.commission_rate),
        payment_method: Set(payload.payment_method),
        transaction_id: Set(transaction_id),
        proof_url: Set(proof_url),
        status: Set(AppointmentStatus::Pending),
        possible_duplicate: Set(possible_duplicate),
        status_reason: Set(None),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    if possible_duplicate {
        tracing::warn!(appointment_id = %appointment.id, "appointment flagged as possible duplicate");
    }
    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "appointment_create",
        "appointments",
        serde_json::json!({
            "appointment_id": appointment.id,
            "price": appointment.price,
            "possible_duplicate": possible_duplicate,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Appointment logged",
        appointment.into(),
        Some(Meta::empty()),
    ))
}

/// Manager review of a pending appointment. Decided appointments are final.
pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateAppointmentStatusRequest,
) -> AppResult<ApiResponse<Appointment>> {
    let scope = ensure_manager(user)?;
    if payload.status == AppointmentStatus::Pending {
        return Err(AppError::validation("status", "Status must be confirmed or rejected"));
    }

    // Row lock: concurrent reviews of one appointment serialize here and the
    // loser sees the decided status.
    let txn = state.orm.begin().await?;
    let appointment = Appointments::find()
        .filter(
            Condition::all()
                .add(AppointmentCol::Id.eq(id))
                .add(AppointmentCol::ShopId.eq(scope.shop_id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Appointment"))?;

    if appointment.status != AppointmentStatus::Pending {
        return Err(AppError::Conflict("Appointment was already reviewed".into()));
    }

    let previous = appointment.status;
    let mut active: AppointmentActive = appointment.into();
    active.status = Set(payload.status);
    active.status_reason = Set(non_blank(payload.reason));
    active.updated_at = Set(Utc::now().into());
    let appointment = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "appointment_status",
        "appointments",
        serde_json::json!({
            "appointment_id": appointment.id,
            "from": previous,
            "to": appointment.status,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Appointment updated",
        appointment.into(),
        Some(Meta::empty()),
    ))
}
