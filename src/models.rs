use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    appointment_requests, appointments, individual_deductions, professional_approvals,
    professional_availability, profiles, schedule_blocks,
    sea_orm_active_enums::{
        ApprovalAction, ApprovalStatus, AppointmentStatus, PaymentMethod, RequestStatus, Role,
        ServiceCategory,
    },
    services, shops, standard_deductions, users,
};

/// Public view of a user; the password hash never leaves the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub profile_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub manager_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shop_id: Option<Uuid>,
    pub role: Role,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub approval_status: ApprovalStatus,
    pub approved_by_user_id: Option<Uuid>,
    pub approval_at: Option<DateTime<Utc>>,
    pub rejection_at: Option<DateTime<Utc>>,
    pub availability: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub name: String,
    pub category: ServiceCategory,
    pub price: i64,
    pub commission_rate: i32,
    pub active: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub date: DateTime<Utc>,
    pub customer_name: String,
    pub price: i64,
    pub commission_rate: i32,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub proof_url: Option<String>,
    pub status: AppointmentStatus,
    pub possible_duplicate: bool,
    pub status_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StandardDeduction {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub name: String,
    pub amount: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IndividualDeduction {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub professional_id: Uuid,
    pub name: String,
    pub amount: i64,
    pub date: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalDecision {
    pub id: Uuid,
    pub professional_user_id: Uuid,
    pub manager_user_id: Uuid,
    pub action: ApprovalAction,
    pub created_at: DateTime<Utc>,
}

/// Recurring weekly window in which a professional takes bookings.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    pub id: Uuid,
    pub professional_id: Uuid,
    /// 0 is Monday, 6 is Sunday.
    pub weekday: i16,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "18:00:00")]
    pub end_time: NaiveTime,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleBlock {
    pub id: Uuid,
    pub professional_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub id: Uuid,
    pub professional_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub requested_at: DateTime<Utc>,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            profile_image_url: model.profile_image_url,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<shops::Model> for Shop {
    fn from(model: shops::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            manager_user_id: model.manager_user_id,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<profiles::Model> for Profile {
    fn from(model: profiles::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            shop_id: model.shop_id,
            role: model.role,
            phone: model.phone,
            cpf: model.cpf,
            approval_status: model.approval_status,
            approved_by_user_id: model.approved_by_user_id,
            approval_at: model.approval_at.map(|dt| dt.with_timezone(&Utc)),
            rejection_at: model.rejection_at.map(|dt| dt.with_timezone(&Utc)),
            availability: model.availability,
        }
    }
}

impl From<services::Model> for Service {
    fn from(model: services::Model) -> Self {
        Self {
            id: model.id,
            shop_id: model.shop_id,
            name: model.name,
            category: model.category,
            price: model.price,
            commission_rate: model.commission_rate,
            active: model.active,
            description: model.description,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<appointments::Model> for Appointment {
    fn from(model: appointments::Model) -> Self {
        Self {
            id: model.id,
            shop_id: model.shop_id,
            professional_id: model.professional_id,
            service_id: model.service_id,
            date: model.date.with_timezone(&Utc),
            customer_name: model.customer_name,
            price: model.price,
            commission_rate: model.commission_rate,
            payment_method: model.payment_method,
            transaction_id: model.transaction_id,
            proof_url: model.proof_url,
            status: model.status,
            possible_duplicate: model.possible_duplicate,
            status_reason: model.status_reason,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<standard_deductions::Model> for StandardDeduction {
    fn from(model: standard_deductions::Model) -> Self {
        Self {
            id: model.id,
            shop_id: model.shop_id,
            name: model.name,
            amount: model.amount,
            active: model.active,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<individual_deductions::Model> for IndividualDeduction {
    fn from(model: individual_deductions::Model) -> Self {
        Self {
            id: model.id,
            shop_id: model.shop_id,
            professional_id: model.professional_id,
            name: model.name,
            amount: model.amount,
            date: model.date.with_timezone(&Utc),
            reason: model.reason,
        }
    }
}

impl From<professional_approvals::Model> for ApprovalDecision {
    fn from(model: professional_approvals::Model) -> Self {
        Self {
            id: model.id,
            professional_user_id: model.professional_user_id,
            manager_user_id: model.manager_user_id,
            action: model.action,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<professional_availability::Model> for AvailabilityWindow {
    fn from(model: professional_availability::Model) -> Self {
        Self {
            id: model.id,
            professional_id: model.professional_id,
            weekday: model.weekday,
            start_time: model.start_time,
            end_time: model.end_time,
            active: model.active,
        }
    }
}

impl From<schedule_blocks::Model> for ScheduleBlock {
    fn from(model: schedule_blocks::Model) -> Self {
        Self {
            id: model.id,
            professional_id: model.professional_id,
            start_at: model.start_at.with_timezone(&Utc),
            end_at: model.end_at.with_timezone(&Utc),
            reason: model.reason,
        }
    }
}

impl From<appointment_requests::Model> for AppointmentRequest {
    fn from(model: appointment_requests::Model) -> Self {
        Self {
            id: model.id,
            professional_id: model.professional_id,
            service_id: model.service_id,
            customer_name: model.customer_name,
            customer_phone: model.customer_phone,
            requested_at: model.requested_at.with_timezone(&Utc),
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
