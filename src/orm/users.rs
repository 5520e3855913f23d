//! SeaORM Entity for users table
//!
//! Club member accounts. Only presidents, vice-presidents and heads have
//! `can_login` set; plain members exist as records without login access.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub club_id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub phone: Option<String>,
    pub id_number: Option<String>,
    /// "President", "Vice-President", "Council Head" or "Member"
    pub role: String,
    /// Custom role reference, when the member holds one.
    pub role_id: Option<i32>,
    pub is_president: bool,
    pub can_login: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clubs::Entity",
        from = "Column::ClubId",
        to = "super::clubs::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Club,
    #[sea_orm(
        belongs_to = "super::roles::Entity",
        from = "Column::RoleId",
        to = "super::roles::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Role,
    #[sea_orm(has_many = "super::election_candidates::Entity")]
    ElectionCandidates,
}

impl Related<super::clubs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Club.def()
    }
}

impl Related<super::roles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Role.def()
    }
}

impl Related<super::election_candidates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ElectionCandidates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
