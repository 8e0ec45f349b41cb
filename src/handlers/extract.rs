//! JSON body extractor whose rejections use the structured error body

use crate::error::AuthError;
use axum::extract::{rejection::JsonRejection, FromRequest};

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AuthError))]
pub struct AppJson<T>(pub T);

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(rejection.body_text())
    }
}
