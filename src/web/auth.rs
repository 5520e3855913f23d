//! Login endpoints for both authorization scopes.
//!
//! Club members and institution users live in separate tables and receive
//! tokens tagged with their scope; neither token works on the other
//! route family.

use crate::db::get_db_pool;
use crate::orm::{institution_users, users};
use crate::session::{self, TokenScope};
use actix_web::{error, post, web, Error, HttpResponse, Responder};
use sea_orm::{entity::*, query::*, ColumnTrait, EntityTrait};
use serde::Deserialize;
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(club_login).service(institution_login);
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[post("/api/auth/login")]
pub async fn club_login(form: web::Json<LoginForm>) -> Result<impl Responder, Error> {
    let db = get_db_pool();

    let user = users::Entity::find()
        .filter(users::Column::Email.eq(form.email.clone()))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorUnauthorized("Invalid credentials"))?;

    if !user.can_login {
        return Err(error::ErrorForbidden(
            "Account pending approval or no login access",
        ));
    }

    if !session::verify_password(&user.password, &form.password) {
        return Err(error::ErrorUnauthorized("Invalid credentials"));
    }

    let token = session::issue_token(user.id, TokenScope::Club)
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(json!({
        "token": token,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
            "isPresident": user.is_president,
            "clubId": user.club_id,
        },
    })))
}

#[post("/api/institution/auth/login")]
pub async fn institution_login(form: web::Json<LoginForm>) -> Result<impl Responder, Error> {
    let db = get_db_pool();

    let user = institution_users::Entity::find()
        .filter(institution_users::Column::Email.eq(form.email.clone()))
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorUnauthorized("Invalid credentials"))?;

    if !session::verify_password(&user.password, &form.password) {
        return Err(error::ErrorUnauthorized("Invalid credentials"));
    }

    let token = session::issue_token(user.id, TokenScope::Institution)
        .map_err(error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(json!({
        "token": token,
        "user": {
            "id": user.id,
            "name": user.name,
            "email": user.email,
            "role": user.role,
            "department": user.department,
            "scope": user.scope,
            "institutionId": user.institution_id,
        },
    })))
}
