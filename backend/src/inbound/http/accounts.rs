//! Account API handlers: registration, login, logout and the current user.
//!
//! ```text
//! POST /api/accounts {"email":"ada@example.com","password":"secret","firstName":"Ada","lastName":"Lovelace","phoneNumber":"555-0100","roleId":2}
//! POST /api/login {"email":"ada@example.com","password":"secret"}
//! POST /api/logout
//! GET  /api/accounts/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    Error, LoginCredentials, LoginValidationError, Principal, Registration, RegistrationError,
    RegistrationParts, User, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, ValidationCode, field_error, missing_field_error, require,
};

const EMAIL: FieldName = FieldName::new("email");
const PASSWORD: FieldName = FieldName::new("password");
const FIRST_NAME: FieldName = FieldName::new("firstName");
const LAST_NAME: FieldName = FieldName::new("lastName");
const ROLE_ID: FieldName = FieldName::new("roleId");

/// Request body for `POST /api/accounts`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[serde(default)]
    #[schema(example = "555-0100")]
    pub phone_number: String,
    /// `1` Manager, `2` Customer.
    #[schema(example = 2)]
    pub role_id: Option<i64>,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginBody {
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

/// Public view of an account. Never includes the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    #[schema(example = 5)]
    pub id: i64,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "555-0100")]
    pub phone_number: String,
    #[schema(example = "Customer")]
    pub role: String,
}

impl From<&User> for AccountView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.get(),
            email: user.email.as_str().to_owned(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone_number: user.phone.clone(),
            role: user.role.label().to_owned(),
        }
    }
}

fn map_registration_error(err: RegistrationError) -> Error {
    let message = err.to_string();
    let (field, code) = match err {
        RegistrationError::EmptyPassword => (PASSWORD, ValidationCode::MissingField),
        RegistrationError::User(inner) => match inner {
            UserValidationError::EmptyEmail => (EMAIL, ValidationCode::MissingField),
            UserValidationError::EmailLocalPartTooLong { .. }
            | UserValidationError::InvalidEmail => (EMAIL, ValidationCode::InvalidValue),
            UserValidationError::EmptyFirstName => (FIRST_NAME, ValidationCode::MissingField),
            UserValidationError::EmptyLastName => (LAST_NAME, ValidationCode::MissingField),
            UserValidationError::UnknownRole { .. } => (ROLE_ID, ValidationCode::InvalidValue),
        },
    };
    field_error(field, code, &message)
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = match err {
        LoginValidationError::EmptyEmail => EMAIL,
        LoginValidationError::EmptyPassword => PASSWORD,
    };
    missing_field_error(field, &err.to_string())
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/accounts",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Account created", body = AccountView),
        (status = 400, description = "Invalid payload or email already registered", body = Error),
        (status = 503, description = "Account store unavailable", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/accounts")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let role_id = require(body.role_id, ROLE_ID, "Role id must not be null")?;
    let registration = Registration::try_from_parts(RegistrationParts {
        email: &body.email,
        password: &body.password,
        first_name: &body.first_name,
        last_name: &body.last_name,
        phone: &body.phone_number,
        role_id,
    })
    .map_err(map_registration_error)?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(AccountView::from(&user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginBody,
    responses(
        (status = 200, description = "Login success", body = AccountView,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginBody>,
) -> ApiResult<web::Json<AccountView>> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.email, &body.password)
        .map_err(map_login_validation_error)?;
    let user = state.login.authenticate(&credentials).await?;
    session.persist_principal(&Principal::new(user.id, user.role))?;
    info!(user_id = %user.id, role = user.role.label(), "session established");
    Ok(web::Json(AccountView::from(&user)))
}

/// Drop the session. Succeeds whether or not a session exists.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses((status = 200, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    if let Some(principal) = session.principal() {
        info!(user_id = %principal.user_id(), "user logged out");
    }
    session.clear();
    HttpResponse::Ok().finish()
}

/// Return the logged-in account.
#[utoipa::path(
    get,
    path = "/api/accounts/me",
    responses(
        (status = 200, description = "Current account", body = AccountView),
        (status = 401, description = "Not logged in", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "currentAccount"
)]
#[get("/accounts/me")]
pub async fn current_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AccountView>> {
    let principal = session.require_principal()?;
    let user = state.accounts.find_user(principal.user_id()).await?;
    Ok(web::Json(AccountView::from(&user)))
}

#[cfg(test)]
mod tests;
