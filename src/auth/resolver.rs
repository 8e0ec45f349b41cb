//! Identity resolution: bearer token -> live, authorized principal

use crate::{
    auth::{
        claims::TokenKind,
        directory::{Principal, UserDirectory},
        extract::CredentialExtractor,
        jwt::TokenCodec,
    },
    error::{AuthError, DirectoryError},
};
use axum::http::HeaderMap;
use serde::Serialize;
use std::sync::Arc;

/// Identity attached to a request once its credentials check out
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    pub principal: Principal,
    /// Role from the token when present, otherwise the principal's stored role
    pub role: String,
}

/// How a token subject addresses the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectRef<'a> {
    Id(i64),
    PublicId(&'a str),
}

impl<'a> SubjectRef<'a> {
    /// A purely numeric subject is a primary id; anything else is a public id
    pub fn parse(subject: &'a str) -> Self {
        match subject.parse::<i64>() {
            Ok(id) => SubjectRef::Id(id),
            Err(_) => SubjectRef::PublicId(subject),
        }
    }
}

pub struct IdentityResolver {
    codec: Arc<TokenCodec>,
    directory: Arc<dyn UserDirectory>,
    extractor: CredentialExtractor,
}

impl IdentityResolver {
    pub fn new(codec: Arc<TokenCodec>, directory: Arc<dyn UserDirectory>) -> Self {
        Self::with_extractor(codec, directory, CredentialExtractor::default())
    }

    pub fn with_extractor(
        codec: Arc<TokenCodec>,
        directory: Arc<dyn UserDirectory>,
        extractor: CredentialExtractor,
    ) -> Self {
        Self {
            codec,
            directory,
            extractor,
        }
    }

    /// Resolve the caller of a request from its headers
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let result = match self.extractor.extract(headers) {
            Ok(token) => self.authenticate(&token).await,
            Err(e) => Err(e),
        };
        record_outcome(&result);
        result
    }

    /// Resolve an already extracted bearer token
    pub async fn resolve_token(&self, token: &str) -> Result<Identity, AuthError> {
        let result = self.authenticate(token).await;
        record_outcome(&result);
        result
    }

    async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.codec.verify(token, Some(TokenKind::Access))?;

        let principal = self
            .lookup(&claims.sub)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !principal.is_active {
            return Err(AuthError::UserInactive);
        }

        let role = claims
            .role
            .filter(|role| !role.is_empty())
            .unwrap_or_else(|| principal.role.clone());

        Ok(Identity { principal, role })
    }

    async fn lookup(&self, subject: &str) -> Result<Option<Principal>, AuthError> {
        Ok(find_subject(self.directory.as_ref(), subject).await?)
    }
}

/// Fresh directory read for a token subject, never cached
pub async fn find_subject(
    directory: &dyn UserDirectory,
    subject: &str,
) -> Result<Option<Principal>, DirectoryError> {
    match SubjectRef::parse(subject) {
        SubjectRef::Id(id) => directory.find_by_id(id).await,
        SubjectRef::PublicId(public_id) => directory.find_by_public_id(public_id).await,
    }
}

fn record_outcome(result: &Result<Identity, AuthError>) {
    match result {
        Ok(identity) => {
            metrics::counter!("auth_success_total").increment(1);
            tracing::debug!(
                user_id = identity.principal.id,
                role = %identity.role,
                "Identity resolved"
            );
        }
        Err(e) if e.is_auth_failure() => {
            metrics::counter!("auth_failures_total", "code" => e.code()).increment(1);
            tracing::debug!(code = e.code(), "Authentication rejected");
        }
        Err(e) => {
            metrics::counter!("auth_dependency_errors_total").increment(1);
            tracing::error!(error = %e, "Identity resolution failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_ref_parse() {
        assert_eq!(SubjectRef::parse("42"), SubjectRef::Id(42));
        assert_eq!(SubjectRef::parse("abc-123"), SubjectRef::PublicId("abc-123"));
        assert_eq!(
            SubjectRef::parse("5f0c2b1e-7a3d-4c8e-9b6a-1d2e3f4a5b6c"),
            SubjectRef::PublicId("5f0c2b1e-7a3d-4c8e-9b6a-1d2e3f4a5b6c")
        );
    }
}
