use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    /// Only read when the caller has no profile yet.
    pub shop_code: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AvailabilityRequest {
    pub availability: bool,
}
