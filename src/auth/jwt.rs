//! JWT token minting and verification
//! Access and refresh tokens share one HMAC-signed compact envelope

use crate::{
    auth::claims::{ClaimsInput, ClaimsSet, TokenKind},
    config::AppConfig,
    error::AuthError,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::str::FromStr;

/// Token pair response
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
}

/// Mints and verifies tokens with the process-wide signing secret
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Create the codec from config
    pub fn from_config(config: &AppConfig) -> Result<Self, AuthError> {
        let security = &config.security;
        let algorithm = parse_algorithm(&security.jwt_algorithm)?;

        Self::new(
            security.jwt_secret.expose_secret().as_bytes(),
            algorithm,
            Duration::minutes(security.access_token_expire_minutes),
            Duration::hours(security.refresh_token_expire_hours),
        )
    }

    pub fn new(
        secret: &[u8],
        algorithm: Algorithm,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, AuthError> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::Config(format!(
                "Unsupported JWT algorithm: {:?}",
                algorithm
            )));
        }

        if secret.is_empty() {
            return Err(AuthError::Config("JWT secret must not be empty".to_string()));
        }

        if access_ttl <= Duration::zero() || refresh_ttl <= Duration::zero() {
            return Err(AuthError::Config("Token lifetimes must be positive".to_string()));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Mint an access token valid for the configured access lifetime
    pub fn mint_access(&self, input: &ClaimsInput) -> Result<String, AuthError> {
        self.mint(input, TokenKind::Access, self.access_ttl)
    }

    /// Mint an access token with an explicit lifetime
    pub fn mint_access_with_ttl(
        &self,
        input: &ClaimsInput,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        if ttl <= Duration::zero() {
            return Err(AuthError::internal("Token lifetime must be positive"));
        }
        self.mint(input, TokenKind::Access, ttl)
    }

    /// Mint a refresh token (`type = "refresh"`)
    pub fn mint_refresh(&self, input: &ClaimsInput) -> Result<String, AuthError> {
        self.mint(input, TokenKind::Refresh, self.refresh_ttl)
    }

    /// Mint an access + refresh pair for the same claims
    pub fn mint_pair(&self, input: &ClaimsInput) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.mint_access(input)?,
            refresh_token: self.mint_refresh(input)?,
            token_type: "bearer".to_string(),
            expires_in: self.access_ttl.num_seconds(),
        })
    }

    fn mint(&self, input: &ClaimsInput, kind: TokenKind, ttl: Duration) -> Result<String, AuthError> {
        if let Some(key) = input.reserved_key() {
            return Err(AuthError::Internal(format!(
                "Claim '{}' is set by the token codec and cannot be supplied",
                key
            )));
        }

        let now = Utc::now();
        let claims = ClaimsSet {
            sub: input.subject().to_string(),
            role: input.role().map(str::to_string),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type: kind.type_claim().map(str::to_string),
            extra: input.extra().clone(),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode {} token: {:?}", kind, e);
            AuthError::Internal(format!("Failed to encode {} token", kind))
        })
    }

    /// Verify signature, algorithm and expiry, and optionally the token type.
    ///
    /// Any failure other than expiry or a type mismatch is reported as
    /// [`AuthError::InvalidToken`]; the underlying cause is only logged.
    pub fn verify(&self, token: &str, expected: Option<TokenKind>) -> Result<ClaimsSet, AuthError> {
        let claims = decode::<ClaimsSet>(token, &self.decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                kind => {
                    tracing::debug!("Token validation failed: {:?}", kind);
                    AuthError::InvalidToken
                }
            })?
            .claims;

        if let Some(expected) = expected {
            if !claims.is_kind(expected) {
                tracing::debug!(
                    "Token type mismatch: expected '{}', got '{}'",
                    expected,
                    claims.type_name()
                );
                return Err(AuthError::TokenTypeMismatch {
                    expected: expected.as_str().to_string(),
                    actual: claims.type_name().to_string(),
                });
            }
        }

        Ok(claims)
    }

    /// Validate access token specifically
    pub fn verify_access(&self, token: &str) -> Result<ClaimsSet, AuthError> {
        self.verify(token, Some(TokenKind::Access))
    }

    /// Validate refresh token specifically
    pub fn verify_refresh(&self, token: &str) -> Result<ClaimsSet, AuthError> {
        self.verify(token, Some(TokenKind::Refresh))
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked at whole-second granularity with no grace period
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);
        validation
    }
}

/// Parse a configured algorithm name, accepting the HMAC family only
pub fn parse_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    let algorithm = Algorithm::from_str(name)
        .map_err(|_| AuthError::Config(format!("Unknown JWT algorithm: {}", name)))?;

    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
        other => Err(AuthError::Config(format!(
            "JWT algorithm {:?} is not a shared-secret algorithm",
            other
        ))),
    }
}
