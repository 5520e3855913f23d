pub mod auth;
pub mod club;
pub mod elections;
pub mod events;
pub mod finance;
pub mod institution;
pub mod members;
pub mod roles;
pub mod social;
pub mod tasks;
pub mod teams;
pub mod vote;

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4.0.1/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Route resolution stops at the first match.
    auth::configure(conf);
    club::configure(conf);
    elections::configure(conf);
    events::configure(conf);
    finance::configure(conf);
    institution::configure(conf);
    members::configure(conf);
    roles::configure(conf);
    social::configure(conf);
    tasks::configure(conf);
    teams::configure(conf);
    vote::configure(conf);
}
