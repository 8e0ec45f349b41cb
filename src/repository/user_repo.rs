//! User repository (数据库访问层)
//! PostgreSQL-backed user directory

use crate::{
    auth::directory::{Principal, UserDirectory},
    error::DirectoryError,
};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

const PRINCIPAL_COLUMNS: &str = r#"
    id::BIGINT AS id,
    public_id::TEXT AS public_id,
    username,
    email,
    role,
    is_active,
    hashed_password
"#;

pub struct UserRepository {
    db: PgPool,
}

impl UserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Principal>, DirectoryError> {
        let user = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            PRINCIPAL_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 根据公开 ID 查找用户
    pub async fn find_by_public_id(
        &self,
        public_id: &str,
    ) -> Result<Option<Principal>, DirectoryError> {
        // A subject that is not a UUID cannot match any row
        let Ok(public_id) = Uuid::parse_str(public_id) else {
            return Ok(None);
        };

        let user = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {} FROM users WHERE public_id = $1",
            PRINCIPAL_COLUMNS
        ))
        .bind(public_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }

    /// 根据邮箱或用户名查找用户
    pub async fn find_by_login(&self, login: &str) -> Result<Option<Principal>, DirectoryError> {
        let user = sqlx::query_as::<_, Principal>(&format!(
            "SELECT {} FROM users WHERE lower(email) = lower($1) OR username = $1 ORDER BY id LIMIT 1",
            PRINCIPAL_COLUMNS
        ))
        .bind(login)
        .fetch_optional(&self.db)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl UserDirectory for UserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Principal>, DirectoryError> {
        UserRepository::find_by_id(self, id).await
    }

    async fn find_by_public_id(
        &self,
        public_id: &str,
    ) -> Result<Option<Principal>, DirectoryError> {
        UserRepository::find_by_public_id(self, public_id).await
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<Principal>, DirectoryError> {
        UserRepository::find_by_login(self, login).await
    }
}
