#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, Error};
use serde_json::{json, Value};
use taskdesk::auth::{BcryptHasher, TokenIssuer};
use taskdesk::repository::{InMemoryTaskRepository, InMemoryUserRepository, MemoryStore};
use taskdesk::state::AppState;
use uuid::Uuid;

pub const SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "secret1";

/// App data over fresh in-memory storage. The user repository is handed back so tests
/// can reach state the HTTP surface does not expose (deactivation, soft delete).
pub struct TestContext {
    pub state: web::Data<AppState>,
    pub issuer: web::Data<TokenIssuer>,
    pub users: InMemoryUserRepository,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let users = InMemoryUserRepository::new(store.clone());
        let state = AppState::new(
            Arc::new(users.clone()),
            Arc::new(InMemoryTaskRepository::new(store)),
            Arc::new(BcryptHasher::new(4)),
        );

        Self {
            state: web::Data::new(state),
            issuer: web::Data::new(TokenIssuer::new(SECRET, 1)),
            users,
        }
    }
}

/// Sends a request and returns its status and JSON body.
///
/// Guard rejections surface as service errors rather than responses, so both are
/// rendered the same way here.
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
    >,
    req: actix_http::Request,
) -> (StatusCode, Value) {
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let bytes = test::read_body(resp).await;
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                    panic!("non-JSON body ({}): {:?}", e, String::from_utf8_lossy(&bytes))
                })
            };
            (status, body)
        }
        Err(err) => {
            let resp = err.as_response_error().error_response();
            let status = resp.status();
            let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
            (status, serde_json::from_slice(&bytes).unwrap())
        }
    }
}

pub async fn register(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
    >,
    name: &str,
    email: &str,
) -> Uuid {
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "name": name, "email": email, "password": PASSWORD }))
        .to_request();
    let (status, body) = send(app, req).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["data"]["id"].as_str().unwrap().parse().unwrap()
}

pub async fn login(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
    >,
    email: &str,
    password: &str,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    send(app, req).await
}

/// Registers a user and returns its id with a bearer token.
pub async fn sign_up(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
    >,
    name: &str,
    email: &str,
) -> (Uuid, String) {
    let id = register(app, name, email).await;
    let (status, body) = login(app, email, PASSWORD).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    (id, body["data"]["token"].as_str().unwrap().to_string())
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
