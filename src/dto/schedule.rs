use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    entity::sea_orm_active_enums::RequestStatus,
    models::{AppointmentRequest, AvailabilityWindow, ScheduleBlock},
};

/// Filters for the schedule listings. `professionalId` is only honoured for
/// managers; `status` only applies to appointment requests.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleQuery {
    pub professional_id: Option<Uuid>,
    pub status: Option<RequestStatus>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailabilityRequest {
    /// 0 is Monday, 6 is Sunday.
    pub weekday: i16,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "18:00:00")]
    pub end_time: NaiveTime,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockRequest {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointmentRequest {
    /// Professionals may only name themselves; managers may leave it empty.
    pub professional_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: String,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRequestStatus {
    pub status: RequestStatus,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct AvailabilityList {
    #[schema(value_type = Vec<AvailabilityWindow>)]
    pub items: Vec<AvailabilityWindow>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct BlockList {
    #[schema(value_type = Vec<ScheduleBlock>)]
    pub items: Vec<ScheduleBlock>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct AppointmentRequestList {
    #[schema(value_type = Vec<AppointmentRequest>)]
    pub items: Vec<AppointmentRequest>,
}
