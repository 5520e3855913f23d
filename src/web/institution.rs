//! Institution-scope read endpoints.
//!
//! Everything here is filtered through [`crate::tenancy`]: the caller's
//! visible club set is re-derived per request and every query carries it.

use crate::db::get_db_pool;
use crate::middleware::InstitutionCtx;
use crate::orm::{events, finance, tasks, users};
use crate::tenancy;
use actix_web::{error, get, Error, HttpResponse, Responder};
use sea_orm::{entity::*, query::*, ColumnTrait, EntityTrait};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_clubs)
        .service(list_users)
        .service(list_events)
        .service(list_tasks)
        .service(list_finance);
}

#[get("/api/institution/clubs")]
pub async fn list_clubs(client: InstitutionCtx) -> Result<impl Responder, Error> {
    let clubs = tenancy::visible_clubs(get_db_pool(), &client.user)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(clubs))
}

#[get("/api/institution/users")]
pub async fn list_users(client: InstitutionCtx) -> Result<impl Responder, Error> {
    let db = get_db_pool();
    let club_ids = tenancy::visible_club_ids(db, &client.user)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let users = users::Entity::find()
        .filter(users::Column::ClubId.is_in(club_ids))
        .order_by_asc(users::Column::Name)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(users))
}

#[get("/api/institution/events")]
pub async fn list_events(client: InstitutionCtx) -> Result<impl Responder, Error> {
    let db = get_db_pool();
    let club_ids = tenancy::visible_club_ids(db, &client.user)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let events = events::Entity::find()
        .filter(events::Column::ClubId.is_in(club_ids))
        .order_by_desc(events::Column::Date)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(events))
}

#[get("/api/institution/tasks")]
pub async fn list_tasks(client: InstitutionCtx) -> Result<impl Responder, Error> {
    let db = get_db_pool();
    let club_ids = tenancy::visible_club_ids(db, &client.user)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let tasks = tasks::Entity::find()
        .filter(tasks::Column::ClubId.is_in(club_ids))
        .order_by_asc(tasks::Column::DueDate)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(tasks))
}

#[get("/api/institution/finance")]
pub async fn list_finance(client: InstitutionCtx) -> Result<impl Responder, Error> {
    let db = get_db_pool();
    let club_ids = tenancy::visible_club_ids(db, &client.user)
        .await
        .map_err(error::ErrorInternalServerError)?;

    let entries = finance::Entity::find()
        .filter(finance::Column::ClubId.is_in(club_ids))
        .order_by_desc(finance::Column::CreatedAt)
        .all(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(entries))
}
