use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::deductions::{
        CreateIndividualDeductionRequest, CreateStandardDeductionRequest,
        IndividualDeductionList, IndividualDeductionQuery, StandardDeductionList,
        UpdateStandardDeductionRequest,
    },
    entity::{
        individual_deductions::{
            ActiveModel as IndividualActive, Column as IndividualCol,
            Entity as IndividualDeductions,
        },
        profiles::{Column as ProfileCol, Entity as Profiles},
        sea_orm_active_enums::Role,
        standard_deductions::{
            ActiveModel as StandardActive, Column as StandardCol, Entity as StandardDeductions,
            Model as StandardModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_manager, ensure_shop_member},
    models::{IndividualDeduction, StandardDeduction},
    response::{ApiResponse, Meta},
    state::AppState,
    validation,
};

/// Managers see every deduction of the shop, professionals only active ones.
pub async fn list_standard(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<StandardDeductionList>> {
    let scope = ensure_shop_member(user)?;

    let mut condition = Condition::all().add(StandardCol::ShopId.eq(scope.shop_id));
    if !scope.is_manager() {
        condition = condition.add(StandardCol::Active.eq(true));
    }

    let items: Vec<StandardDeduction> = StandardDeductions::find()
        .filter(condition)
        .order_by_asc(StandardCol::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Ok",
        StandardDeductionList { items },
        Some(meta),
    ))
}

pub async fn create_standard(
    state: &AppState,
    user: &AuthUser,
    payload: CreateStandardDeductionRequest,
) -> AppResult<ApiResponse<StandardDeduction>> {
    let scope = ensure_manager(user)?;
    let name = validation::require_name("name", &payload.name)?;
    let amount = validation::require_amount("amount", payload.amount)?;

    let deduction = StandardActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(scope.shop_id),
        name: Set(name),
        amount: Set(amount),
        active: Set(payload.active.unwrap_or(true)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "standard_deduction_create",
        "standard_deductions",
        serde_json::json!({ "deduction_id": deduction.id, "amount": deduction.amount }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deduction created",
        deduction.into(),
        Some(Meta::empty()),
    ))
}

async fn find_standard(state: &AppState, shop_id: Uuid, id: Uuid) -> AppResult<StandardModel> {
    StandardDeductions::find()
        .filter(
            Condition::all()
                .add(StandardCol::Id.eq(id))
                .add(StandardCol::ShopId.eq(shop_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Deduction"))
}

pub async fn update_standard(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateStandardDeductionRequest,
) -> AppResult<ApiResponse<StandardDeduction>> {
    let scope = ensure_manager(user)?;
    let deduction = find_standard(state, scope.shop_id, id).await?;

    let mut active: StandardActive = deduction.into();
    if let Some(name) = payload.name.as_deref() {
        active.name = Set(validation::require_name("name", name)?);
    }
    if let Some(amount) = payload.amount {
        active.amount = Set(validation::require_amount("amount", amount)?);
    }
    if let Some(flag) = payload.active {
        active.active = Set(flag);
    }
    let deduction = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "standard_deduction_update",
        "standard_deductions",
        serde_json::json!({ "deduction_id": deduction.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deduction updated",
        deduction.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_standard(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<StandardDeduction>> {
    let scope = ensure_manager(user)?;
    let deduction = find_standard(state, scope.shop_id, id).await?;
    deduction.clone().delete(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "standard_deduction_delete",
        "standard_deductions",
        serde_json::json!({ "deduction_id": deduction.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deduction deleted",
        deduction.into(),
        Some(Meta::empty()),
    ))
}

/// Managers list the whole shop (optionally one professional); professionals
/// only ever see their own rows.
pub async fn list_individual(
    state: &AppState,
    user: &AuthUser,
    query: IndividualDeductionQuery,
) -> AppResult<ApiResponse<IndividualDeductionList>> {
    let scope = ensure_shop_member(user)?;

    let mut condition = Condition::all().add(IndividualCol::ShopId.eq(scope.shop_id));
    if scope.is_manager() {
        if let Some(professional_id) = query.professional_id {
            condition = condition.add(IndividualCol::ProfessionalId.eq(professional_id));
        }
    } else {
        condition = condition.add(IndividualCol::ProfessionalId.eq(scope.user_id));
    }

    let items: Vec<IndividualDeduction> = IndividualDeductions::find()
        .filter(condition)
        .order_by_desc(IndividualCol::Date)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    let meta = Meta::total(items.len());
    Ok(ApiResponse::success(
        "Ok",
        IndividualDeductionList { items },
        Some(meta),
    ))
}

pub async fn create_individual(
    state: &AppState,
    user: &AuthUser,
    payload: CreateIndividualDeductionRequest,
) -> AppResult<ApiResponse<IndividualDeduction>> {
    let scope = ensure_manager(user)?;
    let name = validation::require_name("name", &payload.name)?;
    let amount = validation::require_amount("amount", payload.amount)?;

    Profiles::find()
        .filter(
            Condition::all()
                .add(ProfileCol::UserId.eq(payload.professional_id))
                .add(ProfileCol::ShopId.eq(scope.shop_id))
                .add(ProfileCol::Role.eq(Role::Professional)),
        )
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Professional"))?;

    let deduction = IndividualActive {
        id: Set(Uuid::new_v4()),
        shop_id: Set(scope.shop_id),
        professional_id: Set(payload.professional_id),
        name: Set(name),
        amount: Set(amount),
        date: Set(payload.date.unwrap_or_else(Utc::now).into()),
        reason: Set(payload.reason.filter(|r| !r.trim().is_empty())),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "individual_deduction_create",
        "individual_deductions",
        serde_json::json!({
            "deduction_id": deduction.id,
            "professional_id": deduction.professional_id,
            "amount": deduction.amount,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deduction created",
        deduction.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_individual(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<IndividualDeduction>> {
    let scope = ensure_manager(user)?;
    let deduction = IndividualDeductions::find()
        .filter(
            Condition::all()
                .add(IndividualCol::Id.eq(id))
                .add(IndividualCol::ShopId.eq(scope.shop_id)),
        )
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Deduction"))?;

    deduction.clone().delete(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        Some(scope.shop_id),
        "individual_deduction_delete",
        "individual_deductions",
        serde_json::json!({ "deduction_id": deduction.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deduction deleted",
        deduction.into(),
        Some(Meta::empty()),
    ))
}
