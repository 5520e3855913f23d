//! Password hashing and bearer-token session handling.
//!
//! Passwords are hashed with Argon2id, keyed with the SALT environment
//! variable when present. Sessions are stateless: a signed JWT carries the
//! user id and its scope (club or institution); nothing is stored
//! server-side.

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

static ARGON2: OnceCell<Argon2<'static>> = OnceCell::new();

/// Bearer tokens are good for 30 days, matching the login TTL of the client.
const TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

pub fn init() {
    let argon2 = match std::env::var("SALT") {
        Ok(salt) => {
            // The secret must outlive the hasher; it lives for the process.
            let secret: &'static [u8] = Box::leak(salt.into_bytes().into_boxed_slice());
            Argon2::new_with_secret(
                secret,
                argon2::Algorithm::Argon2id,
                argon2::Version::V0x13,
                argon2::Params::default(),
            )
            .expect("SALT is not usable as an Argon2 secret.")
        }
        Err(_) => {
            log::warn!("SALT unset; password hashes are not keyed with a pepper.");
            Argon2::default()
        }
    };
    let _ = ARGON2.set(argon2);
}

pub fn get_argon2() -> &'static Argon2<'static> {
    ARGON2.get().expect("session::init() has not been called.")
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(get_argon2()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => get_argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            log::warn!("Unparseable password hash in database: {}", err);
            false
        }
    }
}

/// Authorization scope carried in the token. The two scopes are entirely
/// independent; a club token is never valid on institution routes and vice
/// versa.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenScope {
    Club,
    Institution,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id within the scope's own user table.
    pub sub: i32,
    pub scope: TokenScope,
    pub exp: i64,
}

pub fn issue_token(user_id: i32, scope: TokenScope) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        scope,
        exp: chrono::Utc::now().timestamp() + TOKEN_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(crate::app_config::get().session_secret.as_bytes()),
    )
}

pub fn decode_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(crate::app_config::get().session_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_env() {
        crate::app_config::init();
        init();
    }

    #[test]
    fn issued_tokens_round_trip() {
        init_env();
        let token = issue_token(42, TokenScope::Club).expect("issue");
        let claims = decode_token(&token).expect("decode");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.scope, TokenScope::Club);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        init_env();
        assert!(decode_token("not-a-token").is_err());
    }

    #[test]
    fn password_hash_verifies_and_rejects() {
        init_env();
        let hash = hash_password("hunter2").expect("hash");
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }
}
