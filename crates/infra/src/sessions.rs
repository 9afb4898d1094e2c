//! Persisted-session backend.
//!
//! Wraps the stateless [`SessionManager`] and additionally tracks every
//! issued token in a session row store keyed by token fingerprint (SHA-256
//! of the bearer token): validate requires a live row, and logout deletes
//! it. The raw token never touches storage, so a leaked table cannot be
//! replayed as credentials. This is the backend to pick when server-side
//! revocation matters more than statelessness.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{PgPool, Row};

use cabinet_auth::{
    AuthError, AuthProvider, AuthResult, ExistsReport, Session, SessionManager, SessionUser,
};
use cabinet_core::UserId;

/// Hex SHA-256 of a bearer token; the only form that touches storage.
pub fn token_fingerprint(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Session row storage, keyed by token fingerprint.
#[async_trait]
pub trait SessionRowStore: Send + Sync {
    /// Insert or refresh the row for a fingerprint.
    async fn insert(
        &self,
        fingerprint: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()>;

    /// Expiry of the live row, if one exists.
    async fn expiry(&self, fingerprint: &str) -> AuthResult<Option<DateTime<Utc>>>;

    async fn delete(&self, fingerprint: &str) -> AuthResult<()>;
}

/// Auth backend that gates every token on a live session row.
pub struct PersistedSessionProvider {
    manager: SessionManager,
    rows: Arc<dyn SessionRowStore>,
}

impl PersistedSessionProvider {
    pub fn new(manager: SessionManager, rows: Arc<dyn SessionRowStore>) -> Self {
        Self { manager, rows }
    }

    async fn persist(&self, session: &Session) -> AuthResult<()> {
        self.rows
            .insert(
                &token_fingerprint(&session.token),
                session.user.id,
                session.expires_at,
            )
            .await
    }
}

#[async_trait]
impl AuthProvider for PersistedSessionProvider {
    async fn login(&self, email: &str, password: &str) -> AuthResult<Session> {
        let session = self.manager.login(email, password).await?;
        self.persist(&session).await?;
        Ok(session)
    }

    async fn validate(&self, token: &str) -> AuthResult<SessionUser> {
        let fingerprint = token_fingerprint(token);

        // A fingerprint with no row was revoked (or never issued here).
        let Some(expires_at) = self.rows.expiry(&fingerprint).await? else {
            return Err(AuthError::InvalidToken);
        };

        if Utc::now() >= expires_at {
            // Expired rows are garbage; cleanup is best-effort.
            if let Err(err) = self.rows.delete(&fingerprint).await {
                tracing::debug!(error = %err, "expired session row cleanup failed");
            }
            return Err(AuthError::TokenExpired);
        }

        self.manager.validate(token).await
    }

    async fn logout(&self, token: &str) -> AuthResult<()> {
        // Best-effort invalidation: a failed delete is logged, never
        // surfaced. The caller clears its local session regardless.
        if let Err(err) = self.rows.delete(&token_fingerprint(token)).await {
            tracing::warn!(error = %err, "session row delete failed during logout");
        }
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str, name: &str) -> AuthResult<Session> {
        let session = self.manager.sign_up(email, password, name).await?;
        self.persist(&session).await?;
        Ok(session)
    }

    async fn check_user_exists(&self, email: &str) -> AuthResult<ExistsReport> {
        self.manager.check_user_exists(email).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Postgres row store
// ─────────────────────────────────────────────────────────────────────────────

pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `sessions` table when missing.
    pub async fn ensure_schema(&self) -> AuthResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token_hash TEXT PRIMARY KEY,
                user_id UUID NOT NULL,
                issued_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                expires_at TIMESTAMPTZ NOT NULL
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
    tracing::error!(error = %err, "session store query failed");
    AuthError::Server(err.to_string())
}

#[async_trait]
impl SessionRowStore for PostgresSessionStore {
    async fn insert(
        &self,
        fingerprint: &str,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> AuthResult<()> {
        sqlx::query(
            r#"INSERT INTO sessions (token_hash, user_id, expires_at)
               VALUES ($1, $2, $3)
               ON CONFLICT (token_hash) DO UPDATE SET expires_at = EXCLUDED.expires_at"#,
        )
        .bind(fingerprint)
        .bind(user_id.as_uuid())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        Ok(())
    }

    async fn expiry(&self, fingerprint: &str) -> AuthResult<Option<DateTime<Utc>>> {
        let row = sqlx::query("SELECT expires_at FROM sessions WHERE token_hash = $1")
            .bind(fingerprint)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.map(|r| r.try_get("expires_at")).transpose().map_err(store_error)
    }

    async fn delete(&self, fingerprint: &str) -> AuthResult<()> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(fingerprint)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    use chrono::Duration;

    use cabinet_auth::CredentialVerifier;
    use cabinet_core::UserRecord;

    use crate::password::Argon2Verifier;
    use crate::token::JwtCodec;
    use crate::user_store::InMemoryUserStore;

    /// In-memory row store double.
    #[derive(Default)]
    struct MemRows(RwLock<HashMap<String, (UserId, DateTime<Utc>)>>);

    #[async_trait]
    impl SessionRowStore for MemRows {
        async fn insert(
            &self,
            fingerprint: &str,
            user_id: UserId,
            expires_at: DateTime<Utc>,
        ) -> AuthResult<()> {
            self.0
                .write()
                .unwrap()
                .insert(fingerprint.to_string(), (user_id, expires_at));
            Ok(())
        }

        async fn expiry(&self, fingerprint: &str) -> AuthResult<Option<DateTime<Utc>>> {
            Ok(self.0.read().unwrap().get(fingerprint).map(|(_, exp)| *exp))
        }

        async fn delete(&self, fingerprint: &str) -> AuthResult<()> {
            self.0.write().unwrap().remove(fingerprint);
            Ok(())
        }
    }

    fn provider() -> (PersistedSessionProvider, Arc<MemRows>) {
        let users = Arc::new(InMemoryUserStore::new());
        let mut user = UserRecord::new("a@b.com", "A", "Avocat").unwrap();
        user.password_hash = Some(Argon2Verifier.hash("s3cret-pass").unwrap());
        users.seed(user);

        let manager = SessionManager::new(
            users,
            Arc::new(Argon2Verifier),
            Arc::new(JwtCodec::new("test-secret")),
        );
        let rows = Arc::new(MemRows::default());
        (PersistedSessionProvider::new(manager, rows.clone()), rows)
    }

    #[test]
    fn fingerprints_are_stable_and_distinct() {
        assert_eq!(token_fingerprint("abc"), token_fingerprint("abc"));
        assert_ne!(token_fingerprint("abc"), token_fingerprint("abd"));
        assert_eq!(token_fingerprint("abc").len(), 64);
    }

    #[tokio::test]
    async fn login_stores_the_fingerprint_never_the_token() {
        let (provider, rows) = provider();
        let session = provider.login("a@b.com", "s3cret-pass").await.unwrap();

        let map = rows.0.read().unwrap();
        assert_eq!(map.len(), 1);
        let key = map.keys().next().unwrap();
        assert_eq!(key, &token_fingerprint(&session.token));
        assert_ne!(key, &session.token);
    }

    #[tokio::test]
    async fn revoking_the_row_invalidates_the_token() {
        let (provider, rows) = provider();
        let session = provider.login("a@b.com", "s3cret-pass").await.unwrap();
        assert!(provider.validate(&session.token).await.is_ok());

        rows.delete(&token_fingerprint(&session.token)).await.unwrap();

        // The JWT itself is still signed and unexpired; only the row gates it.
        assert_eq!(
            provider.validate(&session.token).await.unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[tokio::test]
    async fn logout_deletes_the_row() {
        let (provider, rows) = provider();
        let session = provider.login("a@b.com", "s3cret-pass").await.unwrap();

        provider.logout(&session.token).await.unwrap();

        assert!(rows.0.read().unwrap().is_empty());
        assert_eq!(
            provider.validate(&session.token).await.unwrap_err(),
            AuthError::InvalidToken
        );
    }

    #[tokio::test]
    async fn expired_row_is_rejected_and_cleaned_up() {
        let (provider, rows) = provider();
        let session = provider.login("a@b.com", "s3cret-pass").await.unwrap();

        let fingerprint = token_fingerprint(&session.token);
        rows.insert(&fingerprint, session.user.id, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();

        assert_eq!(
            provider.validate(&session.token).await.unwrap_err(),
            AuthError::TokenExpired
        );
        assert!(rows.0.read().unwrap().is_empty());
    }

    #[tokio::test]
    async fn logout_with_an_unknown_token_still_succeeds() {
        let (provider, _) = provider();
        assert!(provider.logout("never-issued").await.is_ok());
    }
}
