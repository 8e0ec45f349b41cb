//! Token claims
//!
//! Callers describe what goes into a token with [`ClaimsInput`]. Every value is
//! a [`ClaimValue`], so richer types (timestamps, ids, enums) must be converted
//! to a primitive before a token is minted.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Claim keys stamped by the codec itself
pub const RESERVED_CLAIMS: [&str; 5] = ["sub", "role", "iat", "exp", "type"];

/// Token kinds sharing the same signed envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }

    /// Value written to the `type` claim. Access tokens carry none.
    pub fn type_claim(&self) -> Option<&'static str> {
        match self {
            TokenKind::Access => None,
            TokenKind::Refresh => Some("refresh"),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primitive claim value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl From<&str> for ClaimValue {
    fn from(v: &str) -> Self {
        ClaimValue::String(v.to_string())
    }
}

impl From<String> for ClaimValue {
    fn from(v: String) -> Self {
        ClaimValue::String(v)
    }
}

impl From<i64> for ClaimValue {
    fn from(v: i64) -> Self {
        ClaimValue::Int(v)
    }
}

impl From<i32> for ClaimValue {
    fn from(v: i32) -> Self {
        ClaimValue::Int(v.into())
    }
}

impl From<u32> for ClaimValue {
    fn from(v: u32) -> Self {
        ClaimValue::Int(v.into())
    }
}

impl From<f64> for ClaimValue {
    fn from(v: f64) -> Self {
        ClaimValue::Float(v)
    }
}

impl From<bool> for ClaimValue {
    fn from(v: bool) -> Self {
        ClaimValue::Bool(v)
    }
}

/// Timestamps are carried as ISO-8601 strings
impl<Tz: TimeZone> From<DateTime<Tz>> for ClaimValue
where
    Tz::Offset: std::fmt::Display,
{
    fn from(v: DateTime<Tz>) -> Self {
        ClaimValue::String(v.to_rfc3339())
    }
}

impl From<Uuid> for ClaimValue {
    fn from(v: Uuid) -> Self {
        ClaimValue::String(v.to_string())
    }
}

/// Caller-supplied claims, before the codec stamps timestamps and type
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimsInput {
    subject: String,
    role: Option<String>,
    extra: BTreeMap<String, ClaimValue>,
}

impl ClaimsInput {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            role: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<ClaimValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn extra(&self) -> &BTreeMap<String, ClaimValue> {
        &self.extra
    }

    /// First extra key that collides with a codec-owned claim
    pub fn reserved_key(&self) -> Option<&str> {
        self.extra
            .keys()
            .map(String::as_str)
            .find(|key| RESERVED_CLAIMS.contains(key))
    }
}

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimsSet {
    /// Subject (public id of the principal)
    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Expiration (unix seconds)
    pub exp: i64,

    /// Only present on refresh tokens
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, ClaimValue>,
}

impl ClaimsSet {
    /// Token type, with a missing claim meaning "access"
    pub fn type_name(&self) -> &str {
        self.token_type
            .as_deref()
            .unwrap_or(TokenKind::Access.as_str())
    }

    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.type_name() == kind.as_str()
    }

    pub fn get(&self, key: &str) -> Option<&ClaimValue> {
        self.extra.get(key)
    }
}
