//! Authentication-related models

use crate::auth::{directory::Principal, jwt::TokenPair};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request. `email` also accepts a username.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email or username is required"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Public view of a principal
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub public_id: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<Principal> for UserResponse {
    fn from(principal: Principal) -> Self {
        Self {
            public_id: principal.public_id,
            username: principal.username,
            email: principal.email,
            role: principal.role,
        }
    }
}

/// Login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub tokens: TokenPair,
}

/// Current user response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// Role in effect for this request
    pub effective_role: String,
}
