//! Behaviour tests for the loan lifecycle across the full HTTP stack.
//!
//! Each step drives a freshly initialised app that shares the same state and
//! session key, so cookies issued by one step authenticate the next.
//
// rstest-bdd generates guard variables with double underscores, which trips
// the non_snake_case lint under -D warnings.
#![allow(non_snake_case)]

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{App, test as actix_test, web};
use lms_backend::Trace;
use lms_backend::domain::{
    AccountService, LoanService, Registration, RegistrationParts, TRACE_ID_HEADER,
};
use lms_backend::inbound::http::configure_api;
use lms_backend::inbound::http::state::{HttpState, HttpStatePorts};
use lms_backend::outbound::memory::InMemoryStore;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};

const PASSWORD: &str = "correct horse";

struct Exchange {
    status: u16,
    trace_id: Option<String>,
    body: Value,
}

#[derive(Default)]
struct LendingWorld {
    state: Option<web::Data<HttpState>>,
    key: Option<Key>,
    cookie: Option<Cookie<'static>>,
    last_loan_id: Option<i64>,
    last: Option<Exchange>,
}

impl LendingWorld {
    fn start(&mut self) {
        let store = Arc::new(InMemoryStore::new());
        let accounts = Arc::new(AccountService::with_hash_cost(store.clone(), 4));
        let loans = Arc::new(LoanService::new(store.clone(), store));
        self.state = Some(web::Data::new(HttpState::new(HttpStatePorts {
            login: accounts.clone(),
            accounts,
            loans: loans.clone(),
            loans_query: loans,
        })));
        self.key = Some(Key::generate());
    }

    fn state(&self) -> web::Data<HttpState> {
        self.state.clone().expect("lending API started")
    }

    fn register(&self, email: &str, role_id: i64) {
        let state = self.state();
        let registration = Registration::try_from_parts(RegistrationParts {
            email,
            password: PASSWORD,
            first_name: "Test",
            last_name: "User",
            phone: "555-0100",
            role_id,
        })
        .expect("valid registration");
        actix_rt::System::new()
            .block_on(async move { state.accounts.register(registration).await })
            .expect("account registered");
    }

    /// Send one request through a fresh app and record the exchange.
    fn send(
        &mut self,
        request: actix_test::TestRequest,
        with_cookie: bool,
    ) -> Option<Cookie<'static>> {
        let state = self.state();
        let key = self.key.clone().expect("session key");
        let request = match (with_cookie, self.cookie.clone()) {
            (true, Some(cookie)) => request.cookie(cookie),
            _ => request,
        };

        let (exchange, cookie) = actix_rt::System::new().block_on(async move {
            let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
                .cookie_name("session".to_owned())
                .cookie_secure(false)
                .build();
            let app = actix_test::init_service(
                App::new()
                    .app_data(state)
                    .wrap(Trace)
                    .service(web::scope("/api").wrap(session).configure(configure_api)),
            )
            .await;
            let response = actix_test::call_service(&app, request.to_request()).await;
            let status = response.status().as_u16();
            let trace_id = response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let cookie = response
                .response()
                .cookies()
                .find(|cookie| cookie.name() == "session")
                .map(|cookie| cookie.into_owned());
            let bytes = actix_test::read_body(response).await;
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (
                Exchange {
                    status,
                    trace_id,
                    body,
                },
                cookie,
            )
        });

        self.last = Some(exchange);
        cookie
    }

    fn log_in(&mut self, email: &str) {
        let request = actix_test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": email, "password": PASSWORD }));
        let cookie = self.send(request, false);
        assert_eq!(self.status(), 200, "login should succeed for {email}");
        self.cookie = Some(cookie.expect("session cookie"));
    }

    fn apply(&mut self, amount: u32, term: i32) {
        let user_id = self.current_user_id();
        let request = actix_test::TestRequest::post()
            .uri("/api/loans")
            .set_json(json!({
                "amount": amount,
                "term": term,
                "type": 1,
                "userId": user_id,
            }));
        self.send(request, true);
        let created = self
            .last
            .as_ref()
            .filter(|exchange| exchange.status == 201)
            .and_then(|exchange| exchange.body.get("id"))
            .and_then(Value::as_i64);
        if created.is_some() {
            self.last_loan_id = created;
        }
    }

    fn current_user_id(&mut self) -> i64 {
        self.send(actix_test::TestRequest::get().uri("/api/accounts/me"), true);
        self.last
            .as_ref()
            .and_then(|exchange| exchange.body.get("id"))
            .and_then(Value::as_i64)
            .expect("current account id")
    }

    fn loan_uri(&self, suffix: &str) -> String {
        let id = self.last_loan_id.expect("a loan was created");
        format!("/api/loans/{id}{suffix}")
    }

    fn decide(&mut self, action: &str) {
        let uri = self.loan_uri(&format!("/{action}"));
        self.send(actix_test::TestRequest::patch().uri(&uri), true);
    }

    fn status(&self) -> u16 {
        self.last.as_ref().expect("a request was sent").status
    }
}

#[fixture]
fn world() -> Mutex<LendingWorld> {
    Mutex::new(LendingWorld::default())
}

#[given("a running lending API")]
fn a_running_lending_api(world: &Mutex<LendingWorld>) {
    world.lock().expect("world lock").start();
}

#[given("a manager {email} is registered")]
fn a_manager_is_registered(world: &Mutex<LendingWorld>, email: String) {
    world.lock().expect("world lock").register(&email, 1);
}

#[given("a customer {email} is registered")]
fn a_customer_is_registered(world: &Mutex<LendingWorld>, email: String) {
    world.lock().expect("world lock").register(&email, 2);
}

#[given("{email} is logged in")]
fn is_logged_in(world: &Mutex<LendingWorld>, email: String) {
    world.lock().expect("world lock").log_in(&email);
}

#[given("the client has applied for a loan of {amount} over {term} months")]
fn the_client_has_applied(world: &Mutex<LendingWorld>, amount: u32, term: i32) {
    let mut world = world.lock().expect("world lock");
    world.apply(amount, term);
    assert_eq!(world.status(), 201);
}

#[given("the client has approved the last loan")]
fn the_client_has_approved(world: &Mutex<LendingWorld>) {
    let mut world = world.lock().expect("world lock");
    world.decide("approve");
    assert_eq!(world.status(), 200);
}

#[given("the client has rejected the last loan")]
fn the_client_has_rejected(world: &Mutex<LendingWorld>) {
    let mut world = world.lock().expect("world lock");
    world.decide("reject");
    assert_eq!(world.status(), 200);
}

#[when("the client applies for a loan of {amount} over {term} months")]
fn the_client_applies(world: &Mutex<LendingWorld>, amount: u32, term: i32) {
    world.lock().expect("world lock").apply(amount, term);
}

#[when("the client approves the last loan")]
fn the_client_approves(world: &Mutex<LendingWorld>) {
    world.lock().expect("world lock").decide("approve");
}

#[when("the client deletes the last loan")]
fn the_client_deletes(world: &Mutex<LendingWorld>) {
    let mut world = world.lock().expect("world lock");
    let uri = world.loan_uri("");
    world.send(actix_test::TestRequest::delete().uri(&uri), true);
}

#[when("the client fetches the last loan")]
fn the_client_fetches(world: &Mutex<LendingWorld>) {
    let mut world = world.lock().expect("world lock");
    let uri = world.loan_uri("");
    world.send(actix_test::TestRequest::get().uri(&uri), true);
}

#[when("an anonymous client lists all loans")]
fn an_anonymous_client_lists_all_loans(world: &Mutex<LendingWorld>) {
    world
        .lock()
        .expect("world lock")
        .send(actix_test::TestRequest::get().uri("/api/loans"), false);
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &Mutex<LendingWorld>, status: u16) {
    assert_eq!(world.lock().expect("world lock").status(), status);
}

#[then("the loan status is {label}")]
fn the_loan_status_is(world: &Mutex<LendingWorld>, label: String) {
    let world = world.lock().expect("world lock");
    let body = &world.last.as_ref().expect("a request was sent").body;
    assert_eq!(body.get("status").and_then(Value::as_str), Some(label.as_str()));
}

#[then("the error body echoes the trace id header")]
fn the_error_body_echoes_the_trace_id(world: &Mutex<LendingWorld>) {
    let world = world.lock().expect("world lock");
    let exchange = world.last.as_ref().expect("a request was sent");
    let trace_id = exchange.trace_id.as_deref().expect("trace id header");
    assert_eq!(
        exchange.body.get("traceId").and_then(Value::as_str),
        Some(trace_id)
    );
}

#[scenario(
    path = "tests/features/loan_lifecycle.feature",
    name = "A manager approves a customer's application"
)]
fn manager_approves_application(world: Mutex<LendingWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/loan_lifecycle.feature",
    name = "Approved loans cannot be deleted by their owner"
)]
fn approved_loans_cannot_be_deleted(world: Mutex<LendingWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/loan_lifecycle.feature",
    name = "A rejected loan can still be withdrawn"
)]
fn rejected_loan_can_be_withdrawn(world: Mutex<LendingWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/loan_lifecycle.feature",
    name = "Customers cannot see each other's loans"
)]
fn customers_cannot_see_each_others_loans(world: Mutex<LendingWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/loan_lifecycle.feature",
    name = "Customers cannot decide loans"
)]
fn customers_cannot_decide_loans(world: Mutex<LendingWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/loan_lifecycle.feature",
    name = "Anonymous requests carry a trace id"
)]
fn anonymous_requests_carry_a_trace_id(world: Mutex<LendingWorld>) {
    drop(world);
}
