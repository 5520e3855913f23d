//! Task management endpoints, club scope.

use crate::db::get_db_pool;
use crate::middleware::ClubCtx;
use crate::orm::{events, tasks};
use actix_web::{error, get, patch, post, web, Error, HttpResponse, Responder};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{entity::*, query::*, ActiveValue::Set, ColumnTrait, EntityTrait};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_tasks).service(create_task).service(update_task);
}

#[derive(Deserialize)]
pub struct TaskListQuery {
    pub event_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct TaskForm {
    pub event_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub assigned_to_id: Option<i32>,
    pub team_id: Option<i32>,
    pub due_date: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
pub struct TaskUpdateForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to_id: Option<i32>,
    pub team_id: Option<i32>,
    pub due_date: Option<NaiveDateTime>,
    pub status: Option<String>,
}

#[get("/api/tasks")]
pub async fn list_tasks(
    client: ClubCtx,
    query: web::Query<TaskListQuery>,
) -> Result<impl Responder, Error> {
    let mut find = tasks::Entity::find().filter(tasks::Column::ClubId.eq(client.club_id()));
    if let Some(event_id) = query.event_id {
        find = find.filter(tasks::Column::EventId.eq(event_id));
    }

    let tasks = find
        .order_by_asc(tasks::Column::DueDate)
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(tasks))
}

#[post("/api/tasks")]
pub async fn create_task(client: ClubCtx, form: web::Json<TaskForm>) -> Result<impl Responder, Error> {
    client.require_permission("manage_tasks")?;

    if form.title.trim().is_empty() {
        return Err(error::ErrorBadRequest("Task title is required"));
    }

    let db = get_db_pool();

    // The parent event must be the caller's own.
    events::Entity::find_by_id(form.event_id)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|e| e.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Event not found"))?;

    let task = tasks::ActiveModel {
        event_id: Set(form.event_id),
        club_id: Set(client.club_id()),
        title: Set(form.title.trim().to_owned()),
        description: Set(form.description.clone()),
        assigned_to_id: Set(form.assigned_to_id),
        team_id: Set(form.team_id),
        due_date: Set(form.due_date),
        status: Set("Pending".to_owned()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let task = task
        .insert(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(task))
}

#[patch("/api/tasks/{id}")]
pub async fn update_task(
    client: ClubCtx,
    path: web::Path<i32>,
    form: web::Json<TaskUpdateForm>,
) -> Result<impl Responder, Error> {
    client.require_permission("manage_tasks")?;

    let db = get_db_pool();
    let task = tasks::Entity::find_by_id(path.into_inner())
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|t| t.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Task not found"))?;

    let mut active: tasks::ActiveModel = task.into();
    if let Some(title) = &form.title {
        active.title = Set(title.trim().to_owned());
    }
    if form.description.is_some() {
        active.description = Set(form.description.clone());
    }
    if form.assigned_to_id.is_some() {
        active.assigned_to_id = Set(form.assigned_to_id);
    }
    if form.team_id.is_some() {
        active.team_id = Set(form.team_id);
    }
    if form.due_date.is_some() {
        active.due_date = Set(form.due_date);
    }
    if let Some(status) = &form.status {
        active.status = Set(status.clone());
    }

    let task = active
        .update(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(task))
}
