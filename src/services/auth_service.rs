//! 认证服务：登录、令牌刷新

use crate::{
    auth::{
        claims::ClaimsInput,
        directory::{Principal, UserDirectory},
        jwt::{TokenCodec, TokenPair},
        password::PasswordHasher,
        resolver::find_subject,
    },
    error::AuthError,
    models::auth::*,
};
use std::sync::Arc;
use validator::Validate;

pub struct AuthService {
    directory: Arc<dyn UserDirectory>,
    codec: Arc<TokenCodec>,
    hasher: Arc<PasswordHasher>,
}

impl AuthService {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        codec: Arc<TokenCodec>,
        hasher: Arc<PasswordHasher>,
    ) -> Self {
        Self {
            directory,
            codec,
            hasher,
        }
    }

    /// 用户登录
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        req.validate()?;

        let user = self.directory.find_by_login(&req.email).await?;

        // Unknown account and wrong password are indistinguishable to the caller,
        // in the response and in the Argon2 work done
        let hashed_password = user.as_ref().and_then(|u| u.hashed_password.as_deref());
        self.hasher.verify_credentials(&req.password, hashed_password)?;

        let Some(user) = user else {
            return Err(AuthError::PasswordMismatch);
        };

        check_account_status(&user)?;

        let tokens = self.codec.mint_pair(&claims_for(&user))?;

        tracing::info!(user_id = user.id, "User logged in");

        Ok(AuthResponse {
            user: UserResponse::from(user),
            tokens,
        })
    }

    /// 刷新令牌
    pub async fn refresh(&self, req: RefreshTokenRequest) -> Result<TokenPair, AuthError> {
        req.validate()?;

        let claims = self.codec.verify_refresh(&req.refresh_token)?;

        let user = find_subject(self.directory.as_ref(), &claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        check_account_status(&user)?;

        // The role is re-read from the directory, not copied from the old token
        self.codec.mint_pair(&claims_for(&user))
    }
}

/// Claims minted for a principal: public id as subject, stored role
pub fn claims_for(user: &Principal) -> ClaimsInput {
    ClaimsInput::new(user.public_id.clone()).with_role(user.role.clone())
}

/// 检查账户状态
fn check_account_status(user: &Principal) -> Result<(), AuthError> {
    if user.is_active {
        Ok(())
    } else {
        Err(AuthError::UserInactive)
    }
}
