//! Club record endpoints.

use crate::db::get_db_pool;
use crate::middleware::ClubCtx;
use crate::orm::clubs;
use actix_web::{error, get, web, Error, HttpResponse, Responder};
use sea_orm::{entity::*, query::*, ColumnTrait, EntityTrait};
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(verify_club).service(view_club);
}

/// Public club lookup by invite code, used by the membership apply page.
/// Exposes only what the apply form renders.
#[get("/api/clubs/verify/{club_code}")]
pub async fn verify_club(path: web::Path<String>) -> Result<impl Responder, Error> {
    let club_code = path.into_inner();

    let club = clubs::Entity::find()
        .filter(clubs::Column::ClubCode.eq(club_code))
        .one(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Club not found"))?;

    Ok(HttpResponse::Ok().json(json!({
        "name": club.name,
        "collegeName": club.college_name,
        "description": club.description,
    })))
}

/// The caller's own club record.
#[get("/api/club")]
pub async fn view_club(client: ClubCtx) -> Result<impl Responder, Error> {
    let club = clubs::Entity::find_by_id(client.club_id())
        .one(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Club not found"))?;

    Ok(HttpResponse::Ok().json(club))
}
