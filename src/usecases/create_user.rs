use std::sync::Arc;

use crate::auth::CredentialHasher;
use crate::error::AppResult;
use crate::models::{NewUser, User};
use crate::repository::UserRepository;

use super::UserRepositoryValidation;

/// Registration data with the plaintext password.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Registers a user: unique email, hashed password, one insert.
#[derive(Clone)]
pub struct CreateUserUseCase {
    user_validation: UserRepositoryValidation,
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl CreateUserUseCase {
    pub fn new(
        user_validation: UserRepositoryValidation,
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            user_validation,
            users,
            hasher,
        }
    }

    /// The email pre-check is best effort; the storage unique index still answers a
    /// concurrent duplicate with `Conflict`.
    pub async fn execute(&self, registration: Registration) -> AppResult<User> {
        self.user_validation
            .validate_unique_email(&registration.email)
            .await?;

        let password = self.hasher.hash(&registration.password).await?;

        let user = self
            .users
            .create(NewUser {
                name: registration.name,
                email: registration.email,
                password,
            })
            .await?;

        log::info!("user {} registered", user.id);
        Ok(user)
    }
}
