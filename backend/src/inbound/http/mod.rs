//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod error;
pub mod health;
pub mod loans;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` handler on a service config.
///
/// `/loans/user/{userId}` is registered ahead of `/loans/{id}` so the literal
/// segment wins. Body and path extractor failures are reported through the
/// shared error envelope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use lms_backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(accounts::register)
        .service(accounts::current_account)
        .service(accounts::login)
        .service(accounts::logout)
        .service(loans::list_loans)
        .service(loans::create_loan)
        .service(loans::list_user_loans)
        .service(loans::get_loan)
        .service(loans::update_loan)
        .service(loans::delete_loan)
        .service(loans::approve_loan)
        .service(loans::reject_loan);
}
