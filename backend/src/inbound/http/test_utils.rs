//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;

use crate::domain::{AccountService, LoanService, Registration, RegistrationParts, User};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryStore;

/// bcrypt cost low enough to keep handler tests fast.
pub const TEST_HASH_COST: u32 = 4;

/// Password shared by every account registered through [`register`].
pub const TEST_PASSWORD: &str = "correct horse";

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag for
/// plain HTTP test requests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}

/// Real services over a fresh in-memory store.
pub fn memory_state() -> web::Data<HttpState> {
    let store = Arc::new(InMemoryStore::new());
    let accounts = Arc::new(AccountService::with_hash_cost(store.clone(), TEST_HASH_COST));
    let loans = Arc::new(LoanService::new(store.clone(), store));
    web::Data::new(HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        accounts,
        loans: loans.clone(),
        loans_query: loans,
    }))
}

/// App exposing the `/api` routes behind the test session middleware.
pub fn api_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).service(
        web::scope("/api")
            .wrap(test_session_middleware())
            .configure(configure_api),
    )
}

/// Register an account directly through the account port.
pub async fn register(
    state: &HttpState,
    email: &str,
    first_name: &str,
    last_name: &str,
    role_id: i64,
) -> User {
    let registration = Registration::try_from_parts(RegistrationParts {
        email,
        password: TEST_PASSWORD,
        first_name,
        last_name,
        phone: "555-0100",
        role_id,
    })
    .expect("valid registration");
    state
        .accounts
        .register(registration)
        .await
        .expect("account registered")
}

/// Log in over HTTP and return the session cookie.
pub async fn login<S, B>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": email, "password": TEST_PASSWORD }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");
    session_cookie(&response)
}
