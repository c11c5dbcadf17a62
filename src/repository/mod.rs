//! Storage contracts for users and tasks.
//!
//! Every default query excludes soft-deleted rows (`deleted_at IS NULL`).
//! The `*_with_deleted` lookups are the only way to reach a soft-deleted row.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{NewTask, NewUser, Task, TaskFilters, TaskPatch, User, UserPatch};

pub use memory::{InMemoryTaskRepository, InMemoryUserRepository, MemoryStore};
pub use postgres::{PgTaskRepository, PgUserRepository};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> AppResult<User>;

    async fn find_all(&self) -> AppResult<Vec<User>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Includes soft-deleted users.
    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Applies the present fields. Returns `None` when the user is missing or deleted.
    async fn update(&self, id: Uuid, patch: UserPatch) -> AppResult<Option<User>>;

    /// Soft delete: sets `deleted_at`. `NotFound` when no live user matched.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create(&self, task: NewTask) -> AppResult<Task>;

    async fn find_all(&self) -> AppResult<Vec<Task>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Task>>;

    /// Includes soft-deleted tasks.
    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Task>>;

    /// `find_with_filters(&TaskFilters::default())` is equivalent to `find_all()`.
    async fn find_with_filters(&self, filters: &TaskFilters) -> AppResult<Vec<Task>>;

    /// Applies the present fields. Returns `None` when the task is missing or deleted.
    async fn update(&self, id: Uuid, patch: TaskPatch) -> AppResult<Option<Task>>;

    /// Soft delete: sets `deleted_at`. `NotFound` when no live task matched.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}
