//! SeaORM Entity for elections table
//!
//! An election belongs to one club and, redundantly for scoping, one
//! institution. The stored `status` column is informational only; whether
//! an election accepts votes is always derived from the current time
//! against `[start_time, end_time]`.

use chrono::NaiveDateTime;
use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "elections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub club_id: i32,
    pub institution_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime,
    pub end_time: DateTime,
    /// "scheduled", "active" or "completed". Never gates behavior.
    pub status: String,
    /// Opaque public token used in place of the id in unauthenticated URLs.
    #[sea_orm(unique)]
    pub access_code: String,
    pub created_at: DateTime,
}

/// Live voting state, derived from the clock rather than the status column.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VotingState {
    NotStarted,
    Open,
    Closed,
}

impl Model {
    pub fn voting_state(&self, now: NaiveDateTime) -> VotingState {
        if now < self.start_time {
            VotingState::NotStarted
        } else if now > self.end_time {
            VotingState::Closed
        } else {
            VotingState::Open
        }
    }
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
        belongs_to = "super::institutions::Entity",
        from = "Column::InstitutionId",
        to = "super::institutions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Institution,
    #[sea_orm(has_many = "super::election_candidates::Entity")]
    ElectionCandidates,
    #[sea_orm(has_many = "super::election_votes::Entity")]
    ElectionVotes,
}

impl Related<super::clubs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Club.def()
    }
}

impl Related<super::institutions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Institution.def()
    }
}

impl Related<super::election_candidates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ElectionCandidates.def()
    }
}

impl Related<super::election_votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ElectionVotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
