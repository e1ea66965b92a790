use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entity::sea_orm_active_enums::{ApprovalAction, ApprovalStatus},
    models::{ApprovalDecision, Profile},
};

/// A professional of the manager's shop as shown in the team list.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalView {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub profile_image_url: Option<String>,
    pub approval_status: ApprovalStatus,
    pub availability: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProfessionalList {
    #[schema(value_type = Vec<ProfessionalView>)]
    pub items: Vec<ProfessionalView>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecisionRequest {
    pub action: ApprovalAction,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DecisionResponse {
    pub profile: Profile,
    pub decision: ApprovalDecision,
}
