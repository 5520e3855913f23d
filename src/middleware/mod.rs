mod club_ctx;
mod institution_ctx;

pub use club_ctx::ClubCtx;
pub use institution_ctx::InstitutionCtx;

use actix_web::{error, Error, HttpRequest};

/// Pull the bearer token out of the Authorization header.
/// Missing header is 401; a malformed one is indistinguishable from a
/// missing one to the caller.
pub(crate) fn bearer_token(req: &HttpRequest) -> Result<String, Error> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_owned())
        .ok_or_else(|| error::ErrorUnauthorized("Authentication required"))
}
