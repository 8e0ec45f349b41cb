//! Bearer credential extraction
//!
//! Strategies are tried in order and the first non-empty token wins.

use crate::error::AuthError;
use axum::http::{header::AUTHORIZATION, HeaderMap};

/// A single extraction convention
pub type ExtractStrategy = fn(&HeaderMap) -> Option<String>;

/// Ordered list of credential extraction strategies
#[derive(Clone)]
pub struct CredentialExtractor {
    strategies: Vec<(&'static str, ExtractStrategy)>,
}

impl CredentialExtractor {
    pub fn new(strategies: Vec<(&'static str, ExtractStrategy)>) -> Self {
        Self { strategies }
    }

    /// Find a bearer token, failing with `MissingCredentials` when no strategy yields one
    pub fn extract(&self, headers: &HeaderMap) -> Result<String, AuthError> {
        for (name, strategy) in &self.strategies {
            if let Some(token) = strategy(headers).filter(|t| !t.is_empty()) {
                tracing::trace!(strategy = %name, "Credentials extracted");
                return Ok(token);
            }
        }

        Err(AuthError::MissingCredentials)
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|(name, _)| *name).collect()
    }
}

impl Default for CredentialExtractor {
    /// HTTP bearer credentials first, then the OAuth2 password-bearer convention
    fn default() -> Self {
        Self::new(vec![
            ("http_bearer", bearer_credentials as ExtractStrategy),
            ("oauth2_password_bearer", oauth2_password_bearer as ExtractStrategy),
        ])
    }
}

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// `Authorization: Bearer <token>` as a strict HTTP bearer credential:
/// exactly a scheme and one credential separated by whitespace.
pub fn bearer_credentials(headers: &HeaderMap) -> Option<String> {
    let mut parts = authorization(headers)?.split_whitespace();
    let scheme = parts.next()?;
    let credentials = parts.next()?;

    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    Some(credentials.to_string())
}

/// OAuth2 password-bearer convention: split on the first space, the
/// remainder (trimmed) is the token.
pub fn oauth2_password_bearer(headers: &HeaderMap) -> Option<String> {
    let (scheme, param) = authorization(headers)?.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = param.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_extract_token_valid() {
        let token = CredentialExtractor::default()
            .extract(&headers("Bearer test_token_123"))
            .unwrap();
        assert_eq!(token, "test_token_123");
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        assert_eq!(bearer_credentials(&headers("bearer abc")), Some("abc".to_string()));
        assert_eq!(oauth2_password_bearer(&headers("BEARER abc")), Some("abc".to_string()));
    }

    #[test]
    fn test_extract_token_missing() {
        let result = CredentialExtractor::default().extract(&HeaderMap::new());
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[test]
    fn test_extract_token_invalid_format() {
        let extractor = CredentialExtractor::default();
        assert!(extractor.extract(&headers("InvalidFormat")).is_err());
        assert!(extractor.extract(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(extractor.extract(&headers("Bearer ")).is_err());
    }

    #[test]
    fn test_falls_back_to_oauth2_convention() {
        // Extra whitespace inside the credential defeats the strict parser only
        let value = "Bearer  abc def";
        assert_eq!(bearer_credentials(&headers(value)), None);
        assert_eq!(
            CredentialExtractor::default().extract(&headers(value)).unwrap(),
            "abc def"
        );
    }

    #[test]
    fn test_strategies_tried_in_order() {
        fn first(_: &HeaderMap) -> Option<String> {
            Some("first".to_string())
        }
        fn second(_: &HeaderMap) -> Option<String> {
            Some("second".to_string())
        }
        fn empty(_: &HeaderMap) -> Option<String> {
            Some(String::new())
        }

        let extractor = CredentialExtractor::new(vec![
            ("empty", empty as ExtractStrategy),
            ("first", first as ExtractStrategy),
            ("second", second as ExtractStrategy),
        ]);
        assert_eq!(extractor.extract(&HeaderMap::new()).unwrap(), "first");
        assert_eq!(extractor.strategy_names(), vec!["empty", "first", "second"]);
    }
}
