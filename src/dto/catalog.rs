use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{entity::sea_orm_active_enums::ServiceCategory, models::Service};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceRequest {
    pub name: String,
    pub category: ServiceCategory,
    pub price: i64,
    pub commission_rate: i32,
    pub description: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceRequest {
    pub name: Option<String>,
    pub category: Option<ServiceCategory>,
    pub price: Option<i64>,
    pub commission_rate: Option<i32>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ServiceQuery {
    pub active_only: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ServiceList {
    #[schema(value_type = Vec<Service>)]
    pub items: Vec<Service>,
}
