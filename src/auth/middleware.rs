//! JWT 认证中间件
//! Attaches the resolved identity to the request for downstream handlers

use crate::{
    auth::resolver::{Identity, IdentityResolver},
    error::AuthError,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

// 实现 FromRequestParts 以便在 handler 中直接提取 Identity
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)
    }
}

/// 认证中间件 - 必须认证
pub async fn require_auth(
    State(resolver): State<Arc<IdentityResolver>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let identity = resolver.resolve(req.headers()).await?;

    // 附加到请求扩展
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
