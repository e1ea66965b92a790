use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    entity::sea_orm_active_enums::{AppointmentStatus, PaymentMethod},
    models::Appointment,
    routes::params::Pagination,
};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentQuery {
    /// `YYYY-MM-DD` (start of day, UTC) or RFC 3339.
    pub start_date: Option<String>,
    /// `YYYY-MM-DD` (end of day, UTC) or RFC 3339.
    pub end_date: Option<String>,
    pub professional_id: Option<Uuid>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl AppointmentQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Price and commission are never taken from the client; they are copied from
/// the service.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub service_id: Uuid,
    pub customer_name: String,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub proof_url: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateAppointmentStatusRequest {
    pub status: AppointmentStatus,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub service_name: Option<String>,
    pub professional_name: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct AppointmentList {
    #[schema(value_type = Vec<AppointmentView>)]
    pub items: Vec<AppointmentView>,
}
