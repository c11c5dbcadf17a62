mod common;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use pretty_assertions::assert_eq;
use serde_json::json;
use taskdesk::auth::TokenIssuer;
use taskdesk::routes;

use common::{login, send, TestContext, PASSWORD, SECRET};

#[test_log::test(actix_rt::test)]
async fn test_register_and_login_flow() {
    let ctx = TestContext::new();
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .app_data(ctx.issuer.clone())
            .configure(routes::config),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "name": "Ana", "email": "a@x.com", "password": "secret1" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Registration failed. Body: {}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["name"], "Ana");
    assert_eq!(body["data"]["email"], "a@x.com");
    assert_eq!(body["data"]["isActive"], true);
    assert!(body["data"].get("password").is_none());

    let (status, body) = login(&app, "a@x.com", "secret1").await;
    assert_eq!(status, StatusCode::OK, "Login failed. Body: {}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"], json!({ "name": "Ana", "email": "a@x.com" }));

    let token = body["data"]["token"].as_str().unwrap();
    let claims = TokenIssuer::new(SECRET, 1).verify(token).unwrap();
    assert_eq!(claims.email, "a@x.com");

    let (status, body) = login(&app, "a@x.com", "wrong1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "success": false, "message": "Invalid password" }));
}

#[actix_rt::test]
async fn test_duplicate_registration_is_rejected() {
    let ctx = TestContext::new();
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .app_data(ctx.issuer.clone())
            .configure(routes::config),
    )
    .await;

    common::register(&app, "Ana", "a@x.com").await;

    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "name": "Other Ana", "email": "a@x.com", "password": "secret2" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists with the provided email");
}

#[actix_rt::test]
async fn test_invalid_register_inputs() {
    let ctx = TestContext::new();
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .app_data(ctx.issuer.clone())
            .configure(routes::config),
    )
    .await;

    let test_cases = vec![
        (
            json!({ "name": "A", "email": "a@x.com", "password": "secret1" }),
            "name",
            "name too short",
        ),
        (
            json!({ "name": "Ana", "email": "not-an-email", "password": "secret1" }),
            "email",
            "invalid email format",
        ),
        (
            json!({ "name": "Ana", "email": "a@x.com", "password": "12345" }),
            "password",
            "password too short",
        ),
    ];

    for (payload, field, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/auth/register")
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "Test case failed: {}", description);
        assert_eq!(body["success"], false, "Test case failed: {}", description);
        assert_eq!(body["message"], "Invalid data", "Test case failed: {}", description);
        assert!(
            body["errors"].get(field).is_some(),
            "Test case failed: {}. Body: {}",
            description,
            body
        );
    }

    // Missing fields never reach the validator.
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "email": "a@x.com", "password": "secret1" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid data");
    assert!(body["errors"].is_array());
}

#[actix_rt::test]
async fn test_invalid_login_inputs() {
    let ctx = TestContext::new();
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .app_data(ctx.issuer.clone())
            .configure(routes::config),
    )
    .await;

    common::register(&app, "Ana", "a@x.com").await;

    let test_cases = vec![
        (json!({ "password": PASSWORD }), "Invalid data", "missing email"),
        (json!({ "email": "a@x.com" }), "Invalid data", "missing password"),
        (
            json!({ "email": "invalid-email", "password": PASSWORD }),
            "Invalid data",
            "invalid email format",
        ),
        (
            json!({ "email": "a@x.com", "password": "123" }),
            "Invalid data",
            "password too short",
        ),
        (
            json!({ "email": "a@x.com", "password": "Wrong123" }),
            "Invalid password",
            "incorrect password",
        ),
        (
            json!({ "email": "nobody@x.com", "password": PASSWORD }),
            "User not found",
            "non-existent user",
        ),
    ];

    for (payload, message, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/auth/login")
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "Test case failed: {}", description);
        assert_eq!(body["message"], message, "Test case failed: {}", description);
        assert!(body["data"].is_null(), "Test case failed: {}", description);
    }
}

#[actix_rt::test]
async fn test_inactive_user_cannot_login() {
    let ctx = TestContext::new();
    let app = test::init_service(
        App::new()
            .app_data(ctx.state.clone())
            .app_data(ctx.issuer.clone())
            .configure(routes::config),
    )
    .await;

    let id = common::register(&app, "Ana", "a@x.com").await;
    ctx.users.set_active(id, false).unwrap();

    let (status, body) = login(&app, "a@x.com", PASSWORD).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User is not active");
}
