//! Team management endpoints, club scope.

use crate::db::get_db_pool;
use crate::middleware::ClubCtx;
use crate::orm::{team_members, teams, users};
use actix_web::{delete, error, get, post, web, Error, HttpResponse, Responder};
use chrono::Utc;
use sea_orm::{entity::*, query::*, ActiveValue::Set, ColumnTrait, EntityTrait};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_teams)
        .service(create_team)
        .service(add_team_member)
        .service(remove_team_member);
}

#[derive(Deserialize)]
pub struct TeamForm {
    pub name: String,
    pub description: Option<String>,
    pub captain_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct TeamMemberForm {
    pub user_id: i32,
    pub member_role: Option<String>,
}

#[derive(Serialize)]
struct TeamWithMembers {
    #[serde(flatten)]
    team: teams::Model,
    members: Vec<team_members::Model>,
}

#[get("/api/teams")]
pub async fn list_teams(client: ClubCtx) -> Result<impl Responder, Error> {
    let db = get_db_pool();
    let teams = teams::Entity::find()
        .filter(teams::Column::ClubId.eq(client.club_id()))
        .order_by_asc(teams::Column::Name)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let mut response = Vec::with_capacity(teams.len());
    for team in teams {
        let members = team_members::Entity::find()
            .filter(team_members::Column::TeamId.eq(team.id))
            .all(db)
            .await
            .map_err(error::ErrorInternalServerError)?;
        response.push(TeamWithMembers { team, members });
    }

    Ok(HttpResponse::Ok().json(response))
}

#[post("/api/teams")]
pub async fn create_team(client: ClubCtx, form: web::Json<TeamForm>) -> Result<impl Responder, Error> {
    client.require_permission("manage_teams")?;

    if form.name.trim().is_empty() {
        return Err(error::ErrorBadRequest("Team name is required"));
    }

    let team = teams::ActiveModel {
        club_id: Set(client.club_id()),
        name: Set(form.name.trim().to_owned()),
        description: Set(form.description.clone()),
        captain_id: Set(form.captain_id),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let team = team
        .insert(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(team))
}

#[post("/api/teams/{id}/members")]
pub async fn add_team_member(
    client: ClubCtx,
    path: web::Path<i32>,
    form: web::Json<TeamMemberForm>,
) -> Result<impl Responder, Error> {
    client.require_permission("manage_teams")?;

    let db = get_db_pool();
    let team = teams::Entity::find_by_id(path.into_inner())
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|t| t.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Team not found"))?;

    // The member must belong to the same club as the team.
    users::Entity::find_by_id(form.user_id)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|u| u.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Member not found"))?;

    let existing = team_members::Entity::find()
        .filter(team_members::Column::TeamId.eq(team.id))
        .filter(team_members::Column::UserId.eq(form.user_id))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?;
    if existing.is_some() {
        return Err(error::ErrorBadRequest("Member already on this team"));
    }

    let member = team_members::ActiveModel {
        team_id: Set(team.id),
        user_id: Set(form.user_id),
        member_role: Set(form.member_role.clone()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let member = member
        .insert(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(member))
}

#[delete("/api/teams/{team_id}/members/{user_id}")]
pub async fn remove_team_member(
    client: ClubCtx,
    path: web::Path<(i32, i32)>,
) -> Result<impl Responder, Error> {
    client.require_permission("manage_teams")?;

    let (team_id, user_id) = path.into_inner();
    let db = get_db_pool();

    teams::Entity::find_by_id(team_id)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|t| t.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Team not found"))?;

    team_members::Entity::delete_many()
        .filter(team_members::Column::TeamId.eq(team_id))
        .filter(team_members::Column::UserId.eq(user_id))
        .exec(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Member removed" })))
}
