use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{IndividualDeduction, StandardDeduction};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStandardDeductionRequest {
    pub name: String,
    pub amount: i64,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateStandardDeductionRequest {
    pub name: Option<String>,
    pub amount: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndividualDeductionRequest {
    pub professional_id: Uuid,
    pub name: String,
    pub amount: i64,
    /// Defaults to now.
    pub date: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct IndividualDeductionQuery {
    pub professional_id: Option<Uuid>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct StandardDeductionList {
    #[schema(value_type = Vec<StandardDeduction>)]
    pub items: Vec<StandardDeduction>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct IndividualDeductionList {
    #[schema(value_type = Vec<IndividualDeduction>)]
    pub items: Vec<IndividualDeduction>,
}
