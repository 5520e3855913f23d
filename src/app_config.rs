//! Process-level runtime configuration read from the environment once at
//! startup.

use once_cell::sync::OnceCell;

#[derive(Debug)]
pub struct AppConfig {
    /// True when APP_ENV=production. Controls cookie hardening.
    pub production: bool,
    /// HMAC secret for bearer tokens.
    pub session_secret: String,
}

static APP_CONFIG: OnceCell<AppConfig> = OnceCell::new();

pub fn init() {
    let production = std::env::var("APP_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let session_secret = match std::env::var("SESSION_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        _ => {
            if production {
                panic!("SESSION_SECRET must be set to at least 32 bytes in production.");
            }
            log::warn!(
                "SESSION_SECRET missing or too short; using a development-only default. \
                 Tokens will not survive restarts across differently-configured processes."
            );
            "clubhub-development-secret-do-not-deploy".to_owned()
        }
    };

    let _ = APP_CONFIG.set(AppConfig {
        production,
        session_secret,
    });
}

pub fn get() -> &'static AppConfig {
    APP_CONFIG
        .get()
        .expect("AppConfig accessed before app_config::init().")
}

pub fn is_production() -> bool {
    get().production
}
