//! SeaORM entities, one module per table.

pub mod clubs;
pub mod election_candidates;
pub mod election_votes;
pub mod elections;
pub mod events;
pub mod finance;
pub mod institution_users;
pub mod institutions;
pub mod pending_members;
pub mod roles;
pub mod social_posts;
pub mod tasks;
pub mod team_members;
pub mod teams;
pub mod users;
