//! SeaORM Entity for institution_users table
//!
//! Institution-level accounts: admins, faculty coordinators, department
//! heads. Entirely separate from club member accounts in `users`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "institution_users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub institution_id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    /// "admin", "coordinator" or "department_head"
    pub role: String,
    pub department: Option<String>,
    /// "all" sees every club in the institution; "department" only clubs
    /// matching the user's assigned department.
    pub scope: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::institutions::Entity",
        from = "Column::InstitutionId",
        to = "super::institutions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Institution,
}

impl Related<super::institutions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institution.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_admin_or_coordinator(&self) -> bool {
        self.role == "admin" || self.role == "coordinator"
    }

    pub fn is_department_scoped(&self) -> bool {
        self.scope == "department"
    }
}
