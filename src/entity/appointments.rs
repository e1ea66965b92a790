use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::{AppointmentStatus, PaymentMethod};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub shop_id: Uuid,
    pub professional_id: Uuid,
    pub service_id: Uuid,
    pub date: DateTimeWithTimeZone,
    pub customer_name: String,
    /// Copied from the service when the appointment is logged.
    pub price: i64,
    /// Copied from the service when the appointment is logged.
    pub commission_rate: i32,
    pub payment_method: PaymentMethod,
    #[sea_orm(unique)]
    pub transaction_id: Option<String>,
    pub proof_url: Option<String>,
    pub status: AppointmentStatus,
    pub possible_duplicate: bool,
    pub status_reason: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shops::Entity",
        from = "Column::ShopId",
        to = "super::shops::Column::Id"
    )]
    Shops,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ProfessionalId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::services::Entity",
        from = "Column::ServiceId",
        to = "super::services::Column::Id"
    )]
    Services,
}

impl Related<super::shops::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shops.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::services::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
