use actix_web::{get, HttpResponse, Responder};
use serde_json::json;

/// Liveness probe. Touches no storage.
#[get("/ping")]
pub async fn ping() -> impl Responder {
    HttpResponse::Ok().json(json!({ "pong": "it worked!" }))
}
