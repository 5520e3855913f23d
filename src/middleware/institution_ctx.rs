//! Institution-scoped request context.
//!
//! Independent of [`super::ClubCtx`]; the two scopes share no session
//! model. A club token on an institution route fails the scope check.

use crate::db::get_db_pool;
use crate::orm::institution_users;
use crate::session::{self, TokenScope};
use actix_web::dev::Payload;
use actix_web::{error, Error, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use sea_orm::EntityTrait;

#[derive(Clone, Debug)]
pub struct InstitutionCtx {
    pub user: institution_users::Model,
}

impl InstitutionCtx {
    pub fn institution_id(&self) -> i32 {
        self.user.institution_id
    }

    /// Election creation/deletion and other write operations are limited
    /// to admins and faculty coordinators.
    pub fn require_admin_or_coordinator(&self) -> Result<(), Error> {
        if !self.user.is_admin_or_coordinator() {
            return Err(error::ErrorForbidden("Insufficient permissions"));
        }
        Ok(())
    }
}

async fn resolve(token: String) -> Result<InstitutionCtx, Error> {
    let claims = session::decode_token(&token)
        .map_err(|_| error::ErrorForbidden("Invalid or expired token"))?;

    if claims.scope != TokenScope::Institution {
        return Err(error::ErrorForbidden("Wrong authorization scope"));
    }

    let user = institution_users::Entity::find_by_id(claims.sub)
        .one(get_db_pool())
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorForbidden("Access denied"))?;

    Ok(InstitutionCtx { user })
}

impl FromRequest for InstitutionCtx {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = crate::middleware::bearer_token(req);
        Box::pin(async move { resolve(token?).await })
    }
}
