//! Social-media post scheduling endpoints, club scope.

use crate::db::get_db_pool;
use crate::middleware::ClubCtx;
use crate::orm::social_posts;
use actix_web::{delete, error, get, patch, post, web, Error, HttpResponse, Responder};
use chrono::{NaiveDateTime, Utc};
use sea_orm::{entity::*, query::*, ActiveValue::Set, ColumnTrait, EntityTrait};
use serde::Deserialize;
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(list_posts)
        .service(create_post)
        .service(update_post)
        .service(delete_post);
}

#[derive(Deserialize)]
pub struct SocialPostForm {
    pub caption: String,
    pub image_url: Option<String>,
    pub platform: String,
    pub scheduled_date: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
pub struct SocialPostUpdateForm {
    pub caption: Option<String>,
    pub image_url: Option<String>,
    pub scheduled_date: Option<NaiveDateTime>,
    pub status: Option<String>,
}

#[get("/api/social")]
pub async fn list_posts(client: ClubCtx) -> Result<impl Responder, Error> {
    let posts = social_posts::Entity::find()
        .filter(social_posts::Column::ClubId.eq(client.club_id()))
        .order_by_desc(social_posts::Column::CreatedAt)
        .all(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(posts))
}

#[post("/api/social")]
pub async fn create_post(
    client: ClubCtx,
    form: web::Json<SocialPostForm>,
) -> Result<impl Responder, Error> {
    client.require_permission("manage_social")?;

    if form.caption.trim().is_empty() {
        return Err(error::ErrorBadRequest("Caption is required"));
    }

    let status = if form.scheduled_date.is_some() {
        "Scheduled"
    } else {
        "Draft"
    };

    let post = social_posts::ActiveModel {
        club_id: Set(client.club_id()),
        caption: Set(form.caption.trim().to_owned()),
        image_url: Set(form.image_url.clone()),
        platform: Set(form.platform.clone()),
        scheduled_date: Set(form.scheduled_date),
        status: Set(status.to_owned()),
        created_by_id: Set(client.user_id()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    };
    let post = post
        .insert(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(post))
}

#[patch("/api/social/{id}")]
pub async fn update_post(
    client: ClubCtx,
    path: web::Path<i32>,
    form: web::Json<SocialPostUpdateForm>,
) -> Result<impl Responder, Error> {
    client.require_permission("manage_social")?;

    let db = get_db_pool();
    let post = social_posts::Entity::find_by_id(path.into_inner())
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|p| p.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Post not found"))?;

    let mut active: social_posts::ActiveModel = post.into();
    if let Some(caption) = &form.caption {
        active.caption = Set(caption.trim().to_owned());
    }
    if form.image_url.is_some() {
        active.image_url = Set(form.image_url.clone());
    }
    if form.scheduled_date.is_some() {
        active.scheduled_date = Set(form.scheduled_date);
    }
    if let Some(status) = &form.status {
        active.status = Set(status.clone());
    }

    let post = active
        .update(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(post))
}

#[delete("/api/social/{id}")]
pub async fn delete_post(client: ClubCtx, path: web::Path<i32>) -> Result<impl Responder, Error> {
    client.require_permission("manage_social")?;

    let db = get_db_pool();
    let post = social_posts::Entity::find_by_id(path.into_inner())
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .filter(|p| p.club_id == client.club_id())
        .ok_or_else(|| error::ErrorNotFound("Post not found"))?;

    social_posts::Entity::delete_by_id(post.id)
        .exec(db)
        .await
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Post deleted" })))
}
