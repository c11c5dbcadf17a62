//! Application state: the one place where concrete adapters meet the use-cases.

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{BcryptHasher, CredentialHasher};
use crate::repository::{
    InMemoryTaskRepository, InMemoryUserRepository, MemoryStore, PgTaskRepository,
    PgUserRepository, TaskRepository, UserRepository,
};
use crate::usecases::{
    AuthUseCase, CreateTaskUseCase, CreateUserUseCase, TaskRepositoryValidation,
    UserRepositoryValidation,
};

/// Shared by every worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub hasher: Arc<dyn CredentialHasher>,
    pub user_validation: UserRepositoryValidation,
    pub task_validation: TaskRepositoryValidation,
    pub auth: AuthUseCase,
    pub create_user: CreateUserUseCase,
    pub create_task: CreateTaskUseCase,
}

impl AppState {
    /// Wires every validator and use-case over the given adapters.
    pub fn new(
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        let user_validation = UserRepositoryValidation::new(users.clone());
        let task_validation = TaskRepositoryValidation::new(tasks.clone());

        Self {
            auth: AuthUseCase::new(users.clone(), user_validation.clone(), hasher.clone()),
            create_user: CreateUserUseCase::new(
                user_validation.clone(),
                users.clone(),
                hasher.clone(),
            ),
            create_task: CreateTaskUseCase::new(user_validation.clone(), tasks.clone()),
            users,
            tasks,
            hasher,
            user_validation,
            task_validation,
        }
    }

    /// PostgreSQL adapters over a shared pool.
    pub fn postgres(pool: PgPool, bcrypt_cost: u32) -> Self {
        Self::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgTaskRepository::new(pool)),
            Arc::new(BcryptHasher::new(bcrypt_cost)),
        )
    }

    /// In-memory adapters over a fresh store.
    pub fn in_memory(bcrypt_cost: u32) -> Self {
        let store = MemoryStore::new();
        Self::new(
            Arc::new(InMemoryUserRepository::new(store.clone())),
            Arc::new(InMemoryTaskRepository::new(store)),
            Arc::new(BcryptHasher::new(bcrypt_cost)),
        )
    }
}
