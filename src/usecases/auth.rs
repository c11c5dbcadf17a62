use std::sync::Arc;

use crate::auth::CredentialHasher;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::repository::UserRepository;

use super::UserRepositoryValidation;

/// Email and plaintext password presented at login.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Checks a login attempt: known email, active account, matching password.
#[derive(Clone)]
pub struct AuthUseCase {
    users: Arc<dyn UserRepository>,
    user_validation: UserRepositoryValidation,
    hasher: Arc<dyn CredentialHasher>,
}

impl AuthUseCase {
    pub fn new(
        users: Arc<dyn UserRepository>,
        user_validation: UserRepositoryValidation,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            users,
            user_validation,
            hasher,
        }
    }

    /// Returns the full user, hash included. Callers strip it before responding.
    pub async fn execute(&self, credentials: Credentials) -> AppResult<User> {
        let user = self
            .users
            .find_by_email(&credentials.email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        self.user_validation.validate_user_active(user.id).await?;

        if !self
            .hasher
            .compare(&credentials.password, &user.password)
            .await?
        {
            log::warn!("login refused for user {}: password mismatch", user.id);
            return Err(AppError::Unauthorized("Invalid password".into()));
        }

        Ok(user)
    }
}
