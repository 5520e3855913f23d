//! Custom role management endpoints.

use crate::db::get_db_pool;
use crate::middleware::ClubCtx;
use crate::orm::roles;
use actix_web::{error, get, patch, post, web, Error, HttpResponse, Responder};
use chrono::Utc;
use sea_orm::{entity::*, query::*, ActiveValue::Set, ColumnTrait, EntityTrait};
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_roles).service(create_role).service(update_role);
}

#[derive(Deserialize)]
pub struct RoleForm {
    pub name: String,
    /// JSON map of permission flags, e.g. {"manage_events": true}.
    pub permissions: serde_json::Value,
}

#[derive(Deserialize)]
pub struct RoleUpdateForm {
    pub name: Option<String>,
    pub permissions: Option<serde_json::Value>,
}

#[get("/api/roles")]
pub async fn list_roles(client: ClubCtx) -> Result<impl Responder, Error> {
    let roles = roles::Entity::find()
        .filter(roles::Column::ClubId.eq(client.club_id()))
        .order_by_asc(roles::Column::Name)
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(roles))
}

#[post("/api/roles")]
pub async fn create_role(client: ClubCtx, form: web::Json<RoleForm>) -> Result<impl Responder, Error> {
    client.require_permission("manage_roles")?;

    if form.name.trim().is_empty() {
        return Err(error::ErrorBadRequest("Role name is required"));
    }
    if !form.permissions.is_object() {
        return Err(error::ErrorBadRequest("Permissions must be an object"));
    }

    let role = roles::ActiveModel {
        club_id: Set(client.club_id()),
        name: Set(form.name.trim().to_owned()),
        permissions: Set(form.permissions.clone()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let role = role
        .insert(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(role))
}

#[patch("/api/roles/{id}")]
pub async fn update_role(
    client: ClubCtx,
    path: web::Path<i32>,
    form: web::Json<RoleUpdateForm>,
) -> Result<impl Responder, Error> {
    client.require_permission("manage_roles")?;

    let db = get_db_pool();
    let role = roles::Entity::find_by_id(path.into_inner())
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|r| r.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Role not found"))?;

    let mut active: roles::ActiveModel = role.into();
    if let Some(name) = &form.name {
        active.name = Set(name.trim().to_owned());
    }
    if let Some(permissions) = &form.permissions {
        if !permissions.is_object() {
            return Err(error::ErrorBadRequest("Permissions must be an object"));
        }
        active.permissions = Set(permissions.clone());
    }

    let role = active
        .update(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(role))
}
