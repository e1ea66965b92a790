//! Shop financial summary.
//!
//! The aggregation runs over rows already loaded in memory so it can be
//! exercised without a database. Every amount is in cents. Commission is
//! truncated per appointment (`price * rate / 100` in integer arithmetic) and
//! net payable is not floored at zero: a professional whose deductions exceed
//! the commission owes the shop.
//!
//! Revenue is bucketed by the UTC calendar date of the appointment. Totals
//! saturate at the `i64` bounds instead of wrapping.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    appointments, individual_deductions, profiles,
    sea_orm_active_enums::{ApprovalStatus, AppointmentStatus, Role},
    standard_deductions,
};

pub const REVENUE_WINDOW_DAYS: usize = 7;
pub const FALLBACK_NAME: &str = "Profissional";

#[derive(Debug, Clone)]
pub struct AppointmentFact {
    pub professional_id: Uuid,
    pub price: i64,
    pub commission_rate: i32,
    pub status: AppointmentStatus,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProfessionalFact {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub role: Role,
    pub approval_status: ApprovalStatus,
}

#[derive(Debug, Clone)]
pub struct DeductionFact {
    pub professional_id: Option<Uuid>,
    pub amount: i64,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct StatsInput {
    pub appointments: Vec<AppointmentFact>,
    pub profiles: Vec<ProfessionalFact>,
    /// Shop-wide deductions; inactive rows are ignored.
    pub standard_deductions: Vec<DeductionFact>,
    pub individual_deductions: Vec<DeductionFact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalStats {
    pub id: Uuid,
    pub name: String,
    pub total_cuts: i64,
    pub total_revenue: i64,
    pub gross_commission: i64,
    pub standard_deductions: i64,
    pub individual_deductions: i64,
    pub total_deductions: i64,
    pub net_payable: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RevenueByDay {
    /// `YYYY-MM-DD`, UTC.
    pub day: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    pub total_cuts: i64,
    pub total_revenue: i64,
    pub total_commission: i64,
    pub total_deductions: i64,
    pub net_payable: i64,
    pub pending_approvals: i64,
    pub professionals: Vec<ProfessionalStats>,
    pub revenue_by_day: Vec<RevenueByDay>,
}

/// Commission owed for a single appointment, truncated to whole cents.
pub fn commission_for(price: i64, commission_rate: i32) -> i64 {
    let commission = i128::from(price) * i128::from(commission_rate) / 100;
    i64::try_from(commission).unwrap_or(if commission < 0 { i64::MIN } else { i64::MAX })
}

fn total(amounts: impl Iterator<Item = i64>) -> i64 {
    amounts.fold(0, i64::saturating_add)
}

pub fn compute_stats(input: &StatsInput) -> StatsReport {
    let confirmed: Vec<&AppointmentFact> = input
        .appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Confirmed)
        .collect();

    let standard_total = total(
        input
            .standard_deductions
            .iter()
            .filter(|d| d.active)
            .map(|d| d.amount),
    );

    let mut individual_by_professional: HashMap<Uuid, i64> = HashMap::new();
    for deduction in &input.individual_deductions {
        if let Some(professional_id) = deduction.professional_id {
            let entry = individual_by_professional.entry(professional_id).or_default();
            *entry = entry.saturating_add(deduction.amount);
        }
    }

    let professionals: Vec<ProfessionalStats> = input
        .profiles
        .iter()
        .filter(|p| p.role == Role::Professional && p.approval_status == ApprovalStatus::Active)
        .map(|profile| {
            let own: Vec<&&AppointmentFact> = confirmed
                .iter()
                .filter(|a| a.professional_id == profile.user_id)
                .collect();
            let total_revenue = total(own.iter().map(|a| a.price));
            let gross_commission = total(
                own.iter()
                    .map(|a| commission_for(a.price, a.commission_rate)),
            );
            let individual_total = individual_by_professional
                .get(&profile.user_id)
                .copied()
                .unwrap_or(0);
            let total_deductions = standard_total.saturating_add(individual_total);

            ProfessionalStats {
                id: profile.user_id,
                name: profile
                    .name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| FALLBACK_NAME.to_string()),
                total_cuts: own.len() as i64,
                total_revenue,
                gross_commission,
                standard_deductions: standard_total,
                individual_deductions: individual_total,
                total_deductions,
                net_payable: gross_commission.saturating_sub(total_deductions),
            }
        })
        .collect();

    let pending_approvals = input
        .profiles
        .iter()
        .filter(|p| {
            p.role == Role::Professional && p.approval_status == ApprovalStatus::PendingApproval
        })
        .count() as i64;

    StatsReport {
        total_cuts: confirmed.len() as i64,
        total_revenue: total(professionals.iter().map(|p| p.total_revenue)),
        total_commission: total(professionals.iter().map(|p| p.gross_commission)),
        total_deductions: total(professionals.iter().map(|p| p.total_deductions)),
        net_payable: total(professionals.iter().map(|p| p.net_payable)),
        pending_approvals,
        revenue_by_day: revenue_by_day(&confirmed),
        professionals,
    }
}

fn revenue_by_day(confirmed: &[&AppointmentFact]) -> Vec<RevenueByDay> {
    let mut by_day: BTreeMap<String, i64> = BTreeMap::new();
    for appointment in confirmed {
        let key = appointment.date.format("%Y-%m-%d").to_string();
        let entry = by_day.entry(key).or_default();
        *entry = entry.saturating_add(appointment.price);
    }

    let skip = by_day.len().saturating_sub(REVENUE_WINDOW_DAYS);
    by_day
        .into_iter()
        .skip(skip)
        .map(|(day, total)| RevenueByDay { day, total })
        .collect()
}

impl From<&appointments::Model> for AppointmentFact {
    fn from(model: &appointments::Model) -> Self {
        Self {
            professional_id: model.professional_id,
            price: model.price,
            commission_rate: model.commission_rate,
            status: model.status,
            date: model.date.with_timezone(&Utc),
        }
    }
}

impl ProfessionalFact {
    pub fn from_profile(profile: &profiles::Model, name: Option<String>) -> Self {
        Self {
            user_id: profile.user_id,
            name,
            role: profile.role,
            approval_status: profile.approval_status,
        }
    }
}

impl From<&standard_deductions::Model> for DeductionFact {
    fn from(model: &standard_deductions::Model) -> Self {
        Self {
            professional_id: None,
            amount: model.amount,
            active: model.active,
        }
    }
}

impl From<&individual_deductions::Model> for DeductionFact {
    fn from(model: &individual_deductions::Model) -> Self {
        Self {
            professional_id: Some(model.professional_id),
            amount: model.amount,
            active: true,
        }
    }
}
