use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::catalog::{CreateServiceRequest, ServiceList, ServiceQuery, UpdateServiceRequest},
    entity::{
        appointments::{Column as AppointmentCol, Entity as Appointments},
        services::{
            ActiveModel as ServiceActive, Column as ServiceCol, Entity as Services,
            Model as ServiceModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_manager, ensure_shop_member},
    models::Service,
    response::{ApiResponse, Meta},
    state::AppState,
    validation,
};

pub async fn list_services(
    state: &AppState,
    user: &AuthUser,
    query: ServiceQuery,
) -> AppResult<ApiResponse<ServiceList>> {
    let scope = ensure_shop_member(user)?;

    let mut condition = Condition::all().add(ServiceCol::ShopId.eq(scope.shop_id));
    if query.active_only.unwrap_or(false) {
        condition = condition.add(ServiceCol::Active.eq(true));
    }

    let items: Vec<Service> = Services::find()
        .filter(condition)
        .order_by_asc(ServiceCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success("Ok", ServiceList { items }, Some(meta)))
}

pub async fn create_service(
    state: &AppState,
    user: &AuthUser,
    payload: CreateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    let scope = ensure_manager(user)?;
    let name = validation::require_name("name", &payload.name)?;
    let price = validation::require_amount("price", payload.price)?;
    let commission_rate = validation::require_commission_rate(payload.commission_rate)?;

    let service = ServiceActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(scope.shop_id),
        name: Set(name),
        category: Set(payload.category),
        price: Set(price),
        commission_rate: Set(commission_rate),
        active: Set(payload.active.unwrap_or(true)),
        description: Set(payload.description.filter(|d| !d.trim().is_empty())),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "service_create",
        "services",
        serde_json::json!({ "service_id": service.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Service created",
        service.into(),
        Some(Meta::empty()),
    ))
}

/// Services of other shops are reported as missing.
async fn find_shop_service(state: &AppState, shop_id: Uuid, id: Uuid) -> AppResult<ServiceModel> {
    Services::find()
        .filter(
            Condition::all()
                .add(ServiceCol::Id.eq(id))
                .add(ServiceCol::ShopId.eq(shop_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Service"))
}

pub async fn update_service(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateServiceRequest,
) -> AppResult<ApiResponse<Service>> {
    let scope = ensure_manager(user)?;
    let service = find_shop_service(state, scope.shop_id, id).await?;

    let mut active: ServiceActive = service.into();
    if let Some(name) = payload.name.as_deref() {
        active.name = Set(validation::require_name("name", name)?);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(price) = payload.price {
        active.price = Set(validation::require_amount("price", price)?);
    }
    if let Some(rate) = payload.commission_rate {
        active.commission_rate = Set(validation::require_commission_rate(rate)?);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description).filter(|d| !d.trim().is_empty()));
    }
    if let Some(flag) = payload.active {
        active.active = Set(flag);
    }
    active.updated_at = Set(Utc::now().into());
    let service = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "service_update",
        "services",
        serde_json::json!({ "service_id": service.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Service updated",
        service.into(),
        Some(Meta::empty()),
    ))
}

/// Appointments keep a reference to their service, so a used service can only
/// be deactivated.
pub async fn delete_service(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Service>> {
    let scope = ensure_manager(user)?;
    let service = find_shop_service(state, scope.shop_id, id).await?;

    let used = Appointments::find()
        .filter(AppointmentCol::ServiceId.eq(service.id))
        .count(&state.orm)
        .await?;
    if used > 0 {
        return Err(AppError::Conflict(
            "Service has appointments; deactivate it instead".into(),
        ));
    }

    service.clone().delete(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "service_delete",
        "services",
        serde_json::json!({ "service_id": service.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Service deleted",
        service.into(),
        Some(Meta::empty()),
    ))
}
