//! 统一错误模型
//! Authentication failure taxonomy and the structured error body sent to clients

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Failures raised by the user directory collaborator
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// Authentication error type
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication credentials")]
    MissingCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token type mismatch: expected '{expected}', got '{actual}'")]
    TokenTypeMismatch { expected: String, actual: String },

    #[error("User not found")]
    UserNotFound,

    #[error("User inactive")]
    UserInactive,

    #[error("Invalid credentials")]
    PasswordMismatch,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    /// 获取 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken
            | AuthError::TokenTypeMismatch { .. }
            | AuthError::UserNotFound
            | AuthError::PasswordMismatch => StatusCode::UNAUTHORIZED,
            AuthError::UserInactive => StatusCode::FORBIDDEN,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Directory(_) | AuthError::Config(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Machine-readable code. A type mismatch is reported as a plain invalid token.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "MISSING_CREDENTIALS",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken | AuthError::TokenTypeMismatch { .. } => "INVALID_TOKEN",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::UserInactive => "USER_INACTIVE",
            AuthError::PasswordMismatch => "INVALID_CREDENTIALS",
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::Directory(_) | AuthError::Config(_) | AuthError::Internal(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// 获取用户友好的错误消息（不包含敏感信息）
    pub fn detail(&self) -> String {
        match self {
            AuthError::MissingCredentials => "Missing authentication credentials".to_string(),
            AuthError::TokenExpired => "Token expired".to_string(),
            AuthError::InvalidToken | AuthError::TokenTypeMismatch { .. } => {
                "Invalid token".to_string()
            }
            AuthError::UserNotFound => "User not found".to_string(),
            AuthError::UserInactive => "User inactive".to_string(),
            AuthError::PasswordMismatch => "Invalid credentials".to_string(),
            AuthError::Validation(msg) => msg.clone(),
            AuthError::Directory(_) | AuthError::Config(_) | AuthError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// True for failures caused by the caller's credentials rather than a dependency
    pub fn is_auth_failure(&self) -> bool {
        !matches!(
            self,
            AuthError::Validation(_)
                | AuthError::Directory(_)
                | AuthError::Config(_)
                | AuthError::Internal(_)
        )
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            status_code: self.status_code().as_u16(),
            detail: self.detail(),
        }
    }

    // 便捷方法
    pub fn internal(msg: impl Into<String>) -> Self {
        AuthError::Internal(msg.into())
    }
}

/// 错误响应 DTO
#[derive(Debug, Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub status_code: u16,
    pub detail: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.body();

        if status.is_server_error() {
            tracing::error!(code = %body.code, error = %self, "Request failed");
        } else {
            tracing::warn!(code = %body.code, status = body.status_code, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

/// 从 config::ConfigError 转换
impl From<config::ConfigError> for AuthError {
    fn from(e: config::ConfigError) -> Self {
        AuthError::Config(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(e: validator::ValidationErrors) -> Self {
        AuthError::Validation(e.to_string())
    }
}
