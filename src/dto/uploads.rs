use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::sea_orm_active_enums::UploadKind;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub kind: UploadKind,
    /// Raw base64 or a `data:<mime>;base64,` URI.
    pub data_base64: String,
    /// Payment receipts only: the caller's appointment to attach the proof to.
    pub appointment_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub id: Uuid,
    pub secure_url: String,
    pub public_id: String,
    pub asset_id: String,
}
