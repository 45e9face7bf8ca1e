//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod billing;
pub mod envelope;
pub mod error;
pub mod health;
pub mod notifications;
pub mod quota;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

use actix_web::web;

/// Register every session-aware handler mounted under `/api`.
///
/// The caller supplies the surrounding scope and its session middleware.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::logout)
        .service(billing::create_portal_session)
        .service(billing::create_checkout_session)
        .service(quota::get_receipt_quota)
        .service(notifications::list_notifications);
}
