use std::sync::Arc;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::repository::UserRepository;

/// Read-only preconditions on users, shared by use-cases and handlers.
#[derive(Clone)]
pub struct UserRepositoryValidation {
    users: Arc<dyn UserRepository>,
}

impl UserRepositoryValidation {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn validate_user_exists(&self, user_id: Uuid) -> AppResult<()> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("User not found".into())),
        }
    }

    pub async fn validate_user_active(&self, user_id: Uuid) -> AppResult<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if !user.is_active {
            return Err(AppError::Forbidden("User is not active".into()));
        }
        Ok(())
    }

    pub async fn validate_user_email(&self, email: &str) -> AppResult<()> {
        match self.users.find_by_email(email).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(
                "User not found with the provided email".into(),
            )),
        }
    }

    pub async fn validate_unique_email(&self, email: &str) -> AppResult<()> {
        match self.users.find_by_email(email).await? {
            Some(_) => Err(AppError::Conflict(
                "User already exists with the provided email".into(),
            )),
            None => Ok(()),
        }
    }
}
