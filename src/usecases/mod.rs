//! Business operations composed over the repository traits.
//!
//! Validators are read-only precondition checks. Use-cases order those checks
//! before any write so a rejected request leaves storage untouched.

pub mod auth;
pub mod create_task;
pub mod create_user;
pub mod task_validation;
pub mod user_validation;

pub use auth::{AuthUseCase, Credentials};
pub use create_task::{CreateTaskUseCase, TaskDraft};
pub use create_user::{CreateUserUseCase, Registration};
pub use task_validation::TaskRepositoryValidation;
pub use user_validation::UserRepositoryValidation;
