//! User directory collaborator
//!
//! The resolver reads principals through [`UserDirectory`]; the PostgreSQL
//! implementation lives in `repository::user_repo`.

use crate::error::DirectoryError;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::Serialize;

/// Account record as stored by the directory
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Principal {
    /// Internal numeric id, never placed in tokens
    pub id: i64,
    /// Stable public identifier used as the token subject
    pub public_id: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub hashed_password: Option<String>,
}

/// Read access to principals. Implementations must be safe to call concurrently.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Principal>, DirectoryError>;

    async fn find_by_public_id(&self, public_id: &str)
        -> Result<Option<Principal>, DirectoryError>;

    /// Lookup by email or username, used by login
    async fn find_by_login(&self, login: &str) -> Result<Option<Principal>, DirectoryError>;
}

/// Directory held in memory, keyed by numeric id
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    principals: DashMap<i64, Principal>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a principal
    pub fn insert(&self, principal: Principal) {
        self.principals.insert(principal.id, principal);
    }

    /// Flip the active flag, as an external suspension would
    pub fn set_active(&self, id: i64, active: bool) -> bool {
        match self.principals.get_mut(&id) {
            Some(mut principal) => {
                principal.is_active = active;
                true
            }
            None => false,
        }
    }

    fn find(&self, predicate: impl Fn(&Principal) -> bool) -> Option<Principal> {
        self.principals
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_id(&self, id: i64) -> Result<Option<Principal>, DirectoryError> {
        Ok(self.principals.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_public_id(
        &self,
        public_id: &str,
    ) -> Result<Option<Principal>, DirectoryError> {
        Ok(self.find(|p| p.public_id == public_id))
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Principal>, DirectoryError> {
        Ok(self.find(|p| p.email.eq_ignore_ascii_case(login) || p.username == login))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(id: i64, public_id: &str) -> Principal {
        Principal {
            id,
            public_id: public_id.to_string(),
            username: format!("user{}", id),
            email: format!("user{}@example.com", id),
            role: "default_user".to_string(),
            is_active: true,
            hashed_password: None,
        }
    }

    #[tokio::test]
    async fn test_lookups() {
        let directory = InMemoryUserDirectory::new();
        directory.insert(principal(1, "abc-123"));
        directory.insert(principal(2, "def-456"));

        assert_eq!(directory.find_by_id(2).await.unwrap().unwrap().public_id, "def-456");
        assert_eq!(directory.find_by_public_id("abc-123").await.unwrap().unwrap().id, 1);
        assert_eq!(
            directory.find_by_login("USER2@example.com").await.unwrap().unwrap().id,
            2
        );
        assert!(directory.find_by_id(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_active() {
        let directory = InMemoryUserDirectory::new();
        directory.insert(principal(1, "abc-123"));

        assert!(directory.set_active(1, false));
        assert!(!directory.find_by_id(1).await.unwrap().unwrap().is_active);
        assert!(!directory.set_active(9, false));
    }

    #[test]
    fn test_password_digest_not_serialized() {
        let mut p = principal(1, "abc-123");
        p.hashed_password = Some("$argon2id$...".to_string());
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["public_id"], "abc-123");
    }
}
