//! 仓库层集成测试
//!
//! 测试 PostgreSQL 用户目录（需要数据库连接，使用 TEST_DATABASE_URL）
//! 运行: cargo test --test repository_tests -- --ignored

use authcore::{auth::UserDirectory, db, repository::UserRepository};
use sqlx::PgPool;
use uuid::Uuid;

mod common;
use common::create_test_config;

/// 初始化测试数据库
async fn setup_test_db() -> PgPool {
    let config = create_test_config();

    let pool = db::create_pool(&config.database)
        .await
        .expect("Failed to connect to test database");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

struct SeededUser {
    id: i64,
    public_id: String,
    username: String,
    email: String,
}

/// Insert a user with unique name and email, returning its generated ids
async fn seed_user(pool: &PgPool, role: &str, is_active: bool) -> SeededUser {
    let suffix = Uuid::new_v4().simple().to_string();
    let username = format!("user_{}", suffix);
    let email = format!("User_{}@Example.com", suffix);

    let (id, public_id): (i64, String) = sqlx::query_as(
        r#"
        INSERT INTO users (username, email, hashed_password, role, is_active)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id::BIGINT, public_id::TEXT
        "#,
    )
    .bind(&username)
    .bind(&email)
    .bind("$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaA")
    .bind(role)
    .bind(is_active)
    .fetch_one(pool)
    .await
    .expect("Failed to insert test user");

    SeededUser {
        id,
        public_id,
        username,
        email,
    }
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_find_by_id() {
    let pool = setup_test_db().await;
    let seeded = seed_user(&pool, "admin", true).await;
    let repo = UserRepository::new(pool);

    let principal = repo
        .find_by_id(seeded.id)
        .await
        .expect("Query failed")
        .expect("User should exist");

    assert_eq!(principal.id, seeded.id);
    assert_eq!(principal.public_id, seeded.public_id);
    assert_eq!(principal.username, seeded.username);
    assert_eq!(principal.role, "admin");
    assert!(principal.is_active);
    assert!(principal.hashed_password.is_some());

    assert!(repo.find_by_id(-1).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_find_by_public_id() {
    let pool = setup_test_db().await;
    let seeded = seed_user(&pool, "default_user", false).await;
    let repo = UserRepository::new(pool);

    let principal = repo
        .find_by_public_id(&seeded.public_id)
        .await
        .expect("Query failed")
        .expect("User should exist");

    assert_eq!(principal.id, seeded.id);
    assert!(!principal.is_active);

    let unknown = Uuid::new_v4().to_string();
    assert!(repo.find_by_public_id(&unknown).await.unwrap().is_none());

    // A subject that is not a UUID is simply not found
    assert!(repo.find_by_public_id("abc-123").await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_find_by_login() {
    let pool = setup_test_db().await;
    let seeded = seed_user(&pool, "operator", true).await;
    let repo = UserRepository::new(pool);

    let by_email = repo
        .find_by_login(&seeded.email.to_lowercase())
        .await
        .expect("Query failed")
        .expect("Email lookup is case-insensitive");
    assert_eq!(by_email.id, seeded.id);

    let by_username = repo
        .find_by_login(&seeded.username)
        .await
        .expect("Query failed")
        .expect("Username lookup should match");
    assert_eq!(by_username.id, seeded.id);

    assert!(repo
        .find_by_login("nobody@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn test_repository_as_user_directory() {
    let pool = setup_test_db().await;
    let seeded = seed_user(&pool, "admin", true).await;
    let directory: Box<dyn UserDirectory> = Box::new(UserRepository::new(pool));

    let principal = directory
        .find_by_public_id(&seeded.public_id)
        .await
        .unwrap()
        .expect("User should exist");
    assert_eq!(principal.email, seeded.email);
}
