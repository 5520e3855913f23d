//! Membership application and approval endpoints.
//!
//! Applications land in `pending_members`; approval copies the row into
//! `users` as a plain member without login access and removes the pending
//! row in the same transaction.

use crate::db::get_db_pool;
use crate::middleware::ClubCtx;
use crate::orm::{clubs, pending_members, users};
use crate::session;
use actix_web::{delete, error, get, post, web, Error, HttpResponse, Responder};
use chrono::Utc;
use sea_orm::{entity::*, query::*, ActiveValue::Set, ColumnTrait, EntityTrait};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(apply)
        .service(list_pending)
        .service(approve_member)
        .service(reject_member)
        .service(list_members);
}

#[derive(Deserialize, Validate)]
pub struct ApplyForm {
    pub club_code: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub phone: Option<String>,
    pub id_number: Option<String>,
}

/// Public membership application into a club identified by its code.
#[post("/api/members/apply")]
pub async fn apply(form: web::Json<ApplyForm>) -> Result<impl Responder, Error> {
    form.validate()
        .map_err(|e| error::ErrorBadRequest(e.to_string()))?;

    let db = get_db_pool();

    let club = clubs::Entity::find()
        .filter(clubs::Column::ClubCode.eq(form.club_code.clone()))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Club not found"))?;

    // The email must be unused both as a member and as a pending applicant.
    let taken = users::Entity::find()
        .filter(users::Column::Email.eq(form.email.clone()))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .is_some()
        || pending_members::Entity::find()
            .filter(pending_members::Column::Email.eq(form.email.clone()))
            .one(db)
            .await
            .map_err(error::ErrorInternalServerError)?
            .is_some();
    if taken {
        return Err(error::ErrorBadRequest("Email already registered"));
    }

    let password =
        session::hash_password(&form.password).map_err(error::ErrorInternalServerError)?;

    let pending = pending_members::ActiveModel {
        club_id: Set(club.id),
        name: Set(form.name.clone()),
        email: Set(form.email.clone()),
        password: Set(password),
        phone: Set(form.phone.clone()),
        id_number: Set(form.id_number.clone()),
        applied_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    pending
        .insert(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Application submitted" })))
}

#[get("/api/members/pending")]
pub async fn list_pending(client: ClubCtx) -> Result<impl Responder, Error> {
    client.require_permission("manage_committee")?;

    let pending = pending_members::Entity::find()
        .filter(pending_members::Column::ClubId.eq(client.club_id()))
        .order_by_asc(pending_members::Column::AppliedAt)
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(pending))
}

#[post("/api/members/approve/{id}")]
pub async fn approve_member(client: ClubCtx, path: web::Path<i32>) -> Result<impl Responder, Error> {
    client.require_permission("manage_committee")?;

    let db = get_db_pool();
    let pending = pending_members::Entity::find_by_id(path.into_inner())
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|p| p.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Application not found"))?;

    let txn = db.begin().await.map_err(error::ErrorInternalServerError)?;

    let user = users::ActiveModel {
        club_id: Set(pending.club_id),
        name: Set(pending.name.clone()),
        email: Set(pending.email.clone()),
        password: Set(pending.password.clone()),
        phone: Set(pending.phone.clone()),
        id_number: Set(pending.id_number.clone()),
        role: Set("Member".to_owned()),
        role_id: Set(None),
        is_president: Set(false),
        can_login: Set(false),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let user = user
        .insert(&txn)
        .await
        .map_err(error::ErrorInternalServerError)?;

    pending_members::Entity::delete_by_id(pending.id)
        .exec(&txn)
        .await
        .map_err(error::ErrorInternalServerError)?;

    txn.commit()
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(user))
}

#[delete("/api/members/reject/{id}")]
pub async fn reject_member(client: ClubCtx, path: web::Path<i32>) -> Result<impl Responder, Error> {
    client.require_permission("manage_committee")?;

    let db = get_db_pool();
    let pending = pending_members::Entity::find_by_id(path.into_inner())
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|p| p.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Application not found"))?;

    pending_members::Entity::delete_by_id(pending.id)
        .exec(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Application rejected" })))
}

#[get("/api/members")]
pub async fn list_members(client: ClubCtx) -> Result<impl Responder, Error> {
    client.require_permission("view_members")?;

    let members = users::Entity::find()
        .filter(users::Column::ClubId.eq(client.club_id()))
        .order_by_asc(users::Column::Name)
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(members))
}
