//! SeaORM Entity for institutions table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "institutions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// "College" or "University"
    pub kind: String,
    #[sea_orm(unique)]
    pub code: String,
    pub phone: Option<String>,
    pub admin_email: Option<String>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::institution_users::Entity")]
    InstitutionUsers,
    #[sea_orm(has_many = "super::clubs::Entity")]
    Clubs,
    #[sea_orm(has_many = "super::elections::Entity")]
    Elections,
}

impl Related<super::institution_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InstitutionUsers.def()
    }
}

impl Related<super::clubs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clubs.def()
    }
}

impl Related<super::elections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Elections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
