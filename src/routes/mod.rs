pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;

use std::fmt::Display;

use actix_web::{web, HttpRequest};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers every route plus the extractor error handlers.
///
/// Expects `web::Data<AppState>` and `web::Data<TokenIssuer>` on the app.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(malformed))
        .app_data(web::QueryConfig::default().error_handler(malformed))
        .app_data(web::PathConfig::default().error_handler(malformed))
        .service(health::ping)
        .service(
            web::scope("/auth")
                .service(auth::register)
                .service(auth::login),
        )
        .service(
            web::scope("/users")
                .wrap(AuthMiddleware)
                .service(users::create_user)
                .service(users::get_user)
                .service(users::update_user),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::create_task)
                .service(tasks::get_tasks)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Renders body, query and path deserialization failures as a 400 envelope.
fn malformed<E: Display>(err: E, req: &HttpRequest) -> actix_web::Error {
    log::debug!("malformed input on {}: {}", req.path(), err);
    AppError::MalformedInput(err.to_string()).into()
}
