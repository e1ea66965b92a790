use std::collections::HashMap;

use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    entity::{
        appointments::{Column as AppointmentCol, Entity as Appointments},
        individual_deductions::{Column as IndividualCol, Entity as IndividualDeductions},
        profiles::{Column as ProfileCol, Entity as Profiles},
        standard_deductions::{Column as StandardCol, Entity as StandardDeductions},
        users::{Column as UserCol, Entity as Users},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_manager},
    response::{ApiResponse, Meta},
    state::AppState,
    stats::{ProfessionalFact, StatsInput, StatsReport, compute_stats},
};

/// Loads every row of the manager's shop and aggregates in memory.
// TODO: push the per-professional sums down into a GROUP BY query.
pub async fn shop_stats(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<StatsReport>> {
    let scope = ensure_manager(user)?;
    let input = load_input(state, scope.shop_id).await?;
    let report = compute_stats(&input);

    tracing::debug!(
        shop_id = %scope.shop_id,
        professionals = report.professionals.len(),
        total_cuts = report.total_cuts,
        "stats computed"
    );
    Ok(ApiResponse::success("Ok", report, Some(Meta::empty())))
}

pub async fn load_input(state: &AppState, shop_id: Uuid) -> AppResult<StatsInput> {
    let appointments = Appointments::find()
        .filter(AppointmentCol::ShopId.eq(shop_id))
        .all(&state.orm)
        .await?;
    let profiles = Profiles::find()
        .filter(ProfileCol::ShopId.eq(shop_id))
        .all(&state.orm)
        .await?;
    let standard = StandardDeductions::find()
        .filter(
            Condition::all()
                .add(StandardCol::ShopId.eq(shop_id))
                .add(StandardCol::Active.eq(true)),
        )
        .all(&state.orm)
        .await?;
    let individual = IndividualDeductions::find()
        .filter(IndividualCol::ShopId.eq(shop_id))
        .all(&state.orm)
        .await?;

    let user_ids: Vec<Uuid> = profiles.iter().map(|p| p.user_id).collect();
    let names: HashMap<Uuid, String> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        Users::find()
            .filter(UserCol::Id.is_in(user_ids))
            .all(&state.orm)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect()
    };

    Ok(StatsInput {
        appointments: appointments.iter().map(Into::into).collect(),
        profiles: profiles
            .iter()
            .map(|p| ProfessionalFact::from_profile(p, names.get(&p.user_id).cloned()))
            .collect(),
        standard_deductions: standard.iter().map(Into::into).collect(),
        individual_deductions: individual.iter().map(Into::into).collect(),
    })
}
