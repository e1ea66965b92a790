use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::ApprovalAction;

/// Append-only history of manager decisions on professional signups.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "professional_approvals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub shop_id: Uuid,
    pub professional_user_id: Uuid,
    pub manager_user_id: Uuid,
    pub action: ApprovalAction,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ProfessionalUserId",
        to = "super::users::Column::Id"
    )]
    Professional,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ManagerUserId",
        to = "super::users::Column::Id"
    )]
    Manager,
}

impl ActiveModelBehavior for ActiveModel {}
