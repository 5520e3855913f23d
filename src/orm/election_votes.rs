//! SeaORM Entity for election_votes table
//!
//! Append-only vote log. A row records only that some voter token voted in
//! some election; it never records the chosen candidate, so the ballot
//! cannot be reconstructed from this table. The schema carries a unique
//! index on (election_id, voter_token); the insert is the authoritative
//! duplicate-vote gate.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "election_votes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub election_id: i32,
    pub voter_token: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::elections::Entity",
        from = "Column::ElectionId",
        to = "super::elections::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Election,
}

impl Related<super::elections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Election.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
