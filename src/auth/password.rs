use async_trait::async_trait;
use bcrypt::{hash, verify};

use crate::error::AppError;

/// One-way password hashing. The hash output embeds its algorithm and cost.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String, AppError>;

    async fn compare(&self, plaintext: &str, hashed: &str) -> Result<bool, AppError>;
}

/// bcrypt on actix's blocking thread pool.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl CredentialHasher for BcryptHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        actix_web::web::block(move || hash(plaintext, cost))
            .await?
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// A malformed stored hash is an error, not a mismatch.
    async fn compare(&self, plaintext: &str, hashed: &str) -> Result<bool, AppError> {
        let plaintext = plaintext.to_owned();
        let hashed = hashed.to_owned();
        actix_web::web::block(move || verify(plaintext, &hashed))
            .await?
            .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
    }
}
