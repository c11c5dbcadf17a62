#![doc = "The `taskdesk` library crate."]
#![doc = ""]
#![doc = "Domain models, storage adapters, use-cases, authentication and HTTP routes for the"]
#![doc = "task-management API. The binary (`main.rs`) only loads configuration, connects to"]
#![doc = "storage and serves `routes::config` with an `AppState`."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod usecases;

pub use error::{AppError, AppResult};
pub use state::AppState;
