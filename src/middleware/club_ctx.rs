//! Club-scoped request context.
//!
//! Extractor for routes under the club surface. Verifies the bearer token,
//! requires club scope, loads the member row and computes the permission
//! set for this request. Permissions are never cached; a role change takes
//! effect on the holder's next request.

use crate::db::get_db_pool;
use crate::orm::{roles, users};
use crate::permission::PermissionSet;
use crate::session::{self, TokenScope};
use actix_web::dev::Payload;
use actix_web::{error, Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sea_orm::EntityTrait;

#[derive(Clone, Debug)]
pub struct ClubCtx {
    pub user: users::Model,
    pub permissions: PermissionSet,
}

impl ClubCtx {
    pub fn user_id(&self) -> i32 {
        self.user.id
    }

    pub fn club_id(&self) -> i32 {
        self.user.club_id
    }

    pub fn can(&self, tag: &str) -> bool {
        self.permissions.can(tag)
    }

    /// Require a named permission. Returns () or ErrorForbidden.
    pub fn require_permission(&self, tag: &str) -> Result<(), Error> {
        if !self.can(tag) {
            return Err(error::ErrorForbidden("Insufficient permissions"));
        }
        Ok(())
    }

    pub fn require_president(&self) -> Result<(), Error> {
        if !self.user.is_president {
            return Err(error::ErrorForbidden(
                "Only the club president can do this",
            ));
        }
        Ok(())
    }
}

async fn resolve(token: String) -> Result<ClubCtx, Error> {
    let claims = session::decode_token(&token)
        .map_err(|_| error::ErrorForbidden("Invalid or expired token"))?;

    if claims.scope != TokenScope::Club {
        return Err(error::ErrorForbidden("Wrong authorization scope"));
    }

    let db = get_db_pool();
    let user = users::Entity::find_by_id(claims.sub)
        .one(db)
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorForbidden("Access denied"))?;

    if !user.can_login {
        return Err(error::ErrorForbidden("Access denied"));
    }

    let custom_role = match user.role_id {
        Some(role_id) => roles::Entity::find_by_id(role_id)
            .one(db)
            .await
            .map_err(error::ErrorInternalServerError)?,
        None => None,
    };

    let permissions = PermissionSet::for_user(&user, custom_role.as_ref());
    Ok(ClubCtx { user, permissions })
}

impl FromRequest for ClubCtx {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = crate::middleware::bearer_token(req);
        Box::pin(async move { resolve(token?).await })
    }
}
