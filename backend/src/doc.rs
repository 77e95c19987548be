//! OpenAPI documentation for the REST API.
//!
//! Served by Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump` for client generation.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode, LoanView};
use crate::inbound::http::accounts::{AccountView, LoginBody, RegisterBody};
use crate::inbound::http::loans::{CreateLoanBody, MessageResponse, ReferenceId, UpdateLoanBody};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Loan management API",
        description = "Session-authenticated loan applications, manager decisions and accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::loans::list_loans,
        crate::inbound::http::loans::get_loan,
        crate::inbound::http::loans::list_user_loans,
        crate::inbound::http::loans::create_loan,
        crate::inbound::http::loans::update_loan,
        crate::inbound::http::loans::delete_loan,
        crate::inbound::http::loans::approve_loan,
        crate::inbound::http::loans::reject_loan,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::current_account,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoanView,
        CreateLoanBody,
        UpdateLoanBody,
        ReferenceId,
        MessageResponse,
        RegisterBody,
        LoginBody,
        AccountView,
    )),
    tags(
        (name = "loans", description = "Loan applications and manager decisions"),
        (name = "accounts", description = "Registration and session management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
