//! Handler tests for registration and session endpoints.

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::rstest;
use serde_json::{Value, json};

use super::AccountView;
use crate::inbound::http::test_utils::{
    TEST_PASSWORD, api_app, login, memory_state, register, session_cookie,
};

fn registration(email: &str) -> Value {
    json!({
        "email": email,
        "password": "s3cret",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "phoneNumber": "555-0100",
        "roleId": 2
    })
}

#[actix_web::test]
async fn register_returns_account_without_password() {
    let app = test::init_service(api_app(memory_state())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/accounts")
            .set_json(registration("ada@example.com"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["role"], "Customer");
    assert_eq!(body["firstName"], "Ada");
    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
}

#[actix_web::test]
async fn register_rejects_duplicate_email_ignoring_case() {
    let state = memory_state();
    register(&state, "ada@example.com", "Ada", "Lovelace", 2).await;
    let app = test::init_service(api_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/accounts")
            .set_json(registration("ADA@example.com"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[case::bad_email(json!({"email": "nope", "password": "x", "firstName": "A", "lastName": "B", "roleId": 2}), "email", "invalid_value")]
#[case::no_password(json!({"email": "a@example.com", "password": "", "firstName": "A", "lastName": "B", "roleId": 2}), "password", "missing_field")]
#[case::no_first_name(json!({"email": "a@example.com", "password": "x", "firstName": " ", "lastName": "B", "roleId": 2}), "firstName", "missing_field")]
#[case::unknown_role(json!({"email": "a@example.com", "password": "x", "firstName": "A", "lastName": "B", "roleId": 9}), "roleId", "invalid_value")]
#[case::no_role(json!({"email": "a@example.com", "password": "x", "firstName": "A", "lastName": "B"}), "roleId", "missing_field")]
#[actix_web::test]
async fn register_reports_the_offending_field(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = test::init_service(api_app(memory_state())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/accounts")
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], field);
    assert_eq!(body["details"]["code"], code);
}

#[rstest]
#[case::wrong_password("ada@example.com", "wrong")]
#[case::unknown_email("nobody@example.com", TEST_PASSWORD)]
#[actix_web::test]
async fn login_rejects_bad_credentials_without_a_cookie(
    #[case] email: &str,
    #[case] password: &str,
) {
    let state = memory_state();
    register(&state, "ada@example.com", "Ada", "Lovelace", 2).await;
    let app = test::init_service(api_app(state)).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": email, "password": password }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.response().cookies().next().is_none());
}

#[actix_web::test]
async fn login_requires_both_fields() {
    let app = test::init_service(api_app(memory_state())).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": "ada@example.com", "password": "" }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["details"]["field"], "password");
}

#[actix_web::test]
async fn current_account_follows_the_session() {
    let state = memory_state();
    let ada = register(&state, "ada@example.com", "Ada", "Lovelace", 2).await;
    let app = test::init_service(api_app(state)).await;

    let anonymous = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/accounts/me").to_request(),
    )
    .await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&app, "ada@example.com").await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/accounts/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let account: AccountView = test::read_body_json(res).await;
    assert_eq!(account, AccountView::from(&ada));
}

#[actix_web::test]
async fn logout_clears_the_session_cookie() {
    let state = memory_state();
    register(&state, "ada@example.com", "Ada", "Lovelace", 2).await;
    let app = test::init_service(api_app(state)).await;
    let cookie = login(&app, "ada@example.com").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = session_cookie(&res);
    assert!(cleared.value().is_empty());

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/accounts/me")
            .cookie(cleared)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn logout_without_a_session_still_succeeds() {
    let app = test::init_service(api_app(memory_state())).await;

    let res = test::call_service(&app, test::TestRequest::post().uri("/api/logout").to_request())
        .await;

    assert_eq!(res.status(), StatusCode::OK);
}
