//! Event management endpoints, club scope.

use crate::db::get_db_pool;
use crate::middleware::ClubCtx;
use crate::orm::events;
use actix_web::{delete, error, get, patch, post, web, Error, HttpResponse, Responder};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{entity::*, query::*, ActiveValue::Set, ColumnTrait, EntityTrait};
use serde::Deserialize;
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_events)
        .service(create_event)
        .service(update_event)
        .service(delete_event);
}

#[derive(Deserialize)]
pub struct EventForm {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDateTime,
    pub budget: Option<f64>,
    pub assigned_to_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct EventUpdateForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub budget: Option<f64>,
    pub status: Option<String>,
    pub assigned_to_id: Option<i32>,
}

#[get("/api/events")]
pub async fn list_events(client: ClubCtx) -> Result<impl Responder, Error> {
    let events = events::Entity::find()
        .filter(events::Column::ClubId.eq(client.club_id()))
        .order_by_desc(events::Column::Date)
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(events))
}

#[post("/api/events")]
pub async fn create_event(client: ClubCtx, form: web::Json<EventForm>) -> Result<impl Responder, Error> {
    client.require_permission("manage_events")?;

    if form.title.trim().is_empty() {
        return Err(error::ErrorBadRequest("Event title is required"));
    }

    let event = events::ActiveModel {
        club_id: Set(client.club_id()),
        title: Set(form.title.trim().to_owned()),
        description: Set(form.description.clone()),
        date: Set(form.date),
        budget: Set(form.budget),
        status: Set("Planning".to_owned()),
        assigned_to_id: Set(form.assigned_to_id),
        created_by_id: Set(client.user_id()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let event = event
        .insert(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(event))
}

#[patch("/api/events/{id}")]
pub async fn update_event(
    client: ClubCtx,
    path: web::Path<i32>,
    form: web::Json<EventUpdateForm>,
) -> Result<impl Responder, Error> {
    client.require_permission("manage_events")?;

    let db = get_db_pool();
    let event = events::Entity::find_by_id(path.into_inner())
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|e| e.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Event not found"))?;

    let mut active: events::ActiveModel = event.into();
    if let Some(title) = &form.title {
        active.title = Set(title.trim().to_owned());
    }
    if form.description.is_some() {
        active.description = Set(form.description.clone());
    }
    if let Some(date) = form.date {
        active.date = Set(date);
    }
    if form.budget.is_some() {
        active.budget = Set(form.budget);
    }
    if let Some(status) = &form.status {
        active.status = Set(status.clone());
    }
    if form.assigned_to_id.is_some() {
        active.assigned_to_id = Set(form.assigned_to_id);
    }

    let event = active
        .update(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(event))
}

#[delete("/api/events/{id}")]
pub async fn delete_event(client: ClubCtx, path: web::Path<i32>) -> Result<impl Responder, Error> {
    client.require_permission("manage_events")?;

    let db = get_db_pool();
    let event = events::Entity::find_by_id(path.into_inner())
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|e| e.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Event not found"))?;

    events::Entity::delete_by_id(event.id)
        .exec(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Event deleted" })))
}
