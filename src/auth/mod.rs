pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{BcryptHasher, CredentialHasher};
pub use token::{Claims, TokenIssuer};

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Must be a valid email of at most 100 characters.
    #[validate(email, length(max = 100))]
    pub email: String,
    /// Between 6 and 255 characters.
    #[validate(length(min = 6, max = 255))]
    pub password: String,
}

/// The user summary returned by a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginUser {
    pub name: String,
    pub email: String,
}

/// `data` of a successful login response.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginData {
    pub user: LoginUser,
    /// The JWT for session authentication.
    pub token: String,
}
