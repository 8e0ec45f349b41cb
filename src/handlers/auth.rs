//! 认证相关的 HTTP 处理器

use crate::{
    auth::resolver::Identity, error::AuthError, handlers::extract::AppJson,
    middleware::AppState, models::auth::*,
};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// 登录
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let response = state.auth_service.login(req).await?;

    Ok(Json(response))
}

/// 刷新令牌
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<RefreshTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let token_pair = state.auth_service.refresh(req).await?;

    Ok(Json(token_pair))
}

/// 获取当前用户信息
pub async fn get_current_user(identity: Identity) -> Json<MeResponse> {
    Json(MeResponse {
        effective_role: identity.role,
        user: UserResponse::from(identity.principal),
    })
}
