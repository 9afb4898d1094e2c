//! User-record stores: in-memory (development/tests) and Postgres.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use cabinet_auth::{AuthError, AuthResult, UserStore};
use cabinet_core::{UserId, UserRecord};

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory user store for development and black-box tests.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record, replacing any previous one with the same id.
    pub fn seed(&self, user: UserRecord) {
        self.users.write().unwrap().insert(user.id, user);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<UserRecord>> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn insert(&self, user: &UserRecord) -> AuthResult<()> {
        self.users.write().unwrap().insert(user.id, user.clone());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Postgres store
// ─────────────────────────────────────────────────────────────────────────────

/// Postgres-backed user store.
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `users` table when missing (dev convenience; production
    /// schemas are migrated out of band).
    pub async fn ensure_schema(&self) -> AuthResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT '',
                "function" TEXT,
                password_hash TEXT,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                first_login BOOLEAN NOT NULL DEFAULT FALSE,
                created_by UUID,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }
}

fn store_error(err: sqlx::Error) -> AuthError {
    tracing::error!(error = %err, "user store query failed");
    AuthError::Server(err.to_string())
}

fn row_to_user(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        id: UserId::from_uuid(row.try_get("id")?),
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        role: row.try_get("role")?,
        function: row.try_get("function")?,
        password_hash: row.try_get("password_hash")?,
        is_active: row.try_get("is_active")?,
        first_login: row.try_get("first_login")?,
        created_by: row
            .try_get::<Option<Uuid>, _>("created_by")?
            .map(UserId::from_uuid),
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<UserRecord>> {
        let row = sqlx::query(
            r#"SELECT id, email, name, role, "function", password_hash,
                      is_active, first_login, created_by, created_at
               FROM users WHERE email = $1"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.as_ref().map(row_to_user).transpose().map_err(store_error)
    }

    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<UserRecord>> {
        let row = sqlx::query(
            r#"SELECT id, email, name, role, "function", password_hash,
                      is_active, first_login, created_by, created_at
               FROM users WHERE id = $1"#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        row.as_ref().map(row_to_user).transpose().map_err(store_error)
    }

    async fn insert(&self, user: &UserRecord) -> AuthResult<()> {
        sqlx::query(
            r#"INSERT INTO users
                   (id, email, name, role, "function", password_hash,
                    is_active, first_login, created_by, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)"#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.role)
        .bind(&user.function)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.first_login)
        .bind(user.created_by.map(Uuid::from))
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }
}
