use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Profile, Shop, User};

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerRegistration {
    pub manager_name: String,
    pub shop_name: String,
    pub phone: String,
    pub email_prefix: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfessionalRegistration {
    pub name: String,
    pub phone: String,
    pub email_prefix: String,
    pub password: String,
    pub confirm_password: String,
    pub shop_code: String,
}

/// Signup body, discriminated by `role`.
#[derive(Deserialize, Debug, ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RegisterRequest {
    Manager(ManagerRegistration),
    Professional(ProfessionalRegistration),
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub keep_connected: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Account {
    pub user: User,
    pub profile: Option<Profile>,
    pub shop: Option<Shop>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub ok: bool,
    pub user: User,
    pub profile: Option<Profile>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogoutResponse {
    pub ok: bool,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub sid: String,
    pub exp: usize,
}
