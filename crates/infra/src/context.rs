//! Application context with explicit lifecycle.
//!
//! Everything that used to be an ambient singleton (connection pool, auth
//! client) is constructed here once at startup and passed down explicitly.

use std::sync::Arc;

use anyhow::Context as _;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use cabinet_auth::{AuthProvider, SessionManager, UserStore};

use crate::config::{AuthBackend, Config};
use crate::password::Argon2Verifier;
use crate::sessions::{PersistedSessionProvider, PostgresSessionStore};
use crate::token::JwtCodec;
use crate::user_store::{InMemoryUserStore, PostgresUserStore};

/// Explicitly constructed dependency context.
pub struct AppContext {
    pub config: Config,
    provider: Arc<dyn AuthProvider>,
    pool: Option<PgPool>,
}

impl AppContext {
    /// Wire stores, verifier, codec and the configured auth backend.
    pub async fn init(config: Config) -> anyhow::Result<Self> {
        let pool = match &config.database_url {
            Some(url) => Some(
                PgPoolOptions::new()
                    .max_connections(5)
                    .connect(url)
                    .await
                    .context("failed to connect to Postgres")?,
            ),
            None => None,
        };

        let users: Arc<dyn UserStore> = match &pool {
            Some(pool) => {
                let store = PostgresUserStore::new(pool.clone());
                store.ensure_schema().await?;
                Arc::new(store)
            }
            None => {
                tracing::warn!("DATABASE_URL not set; using in-memory user store");
                Arc::new(InMemoryUserStore::new())
            }
        };

        let manager = SessionManager::new(
            users,
            Arc::new(Argon2Verifier),
            Arc::new(JwtCodec::new(&config.jwt_secret)),
        );

        let provider: Arc<dyn AuthProvider> = match config.auth_backend {
            AuthBackend::Jwt => Arc::new(manager),
            AuthBackend::Postgres => {
                let pool = pool
                    .clone()
                    .context("postgres auth backend requires DATABASE_URL")?;
                let rows = PostgresSessionStore::new(pool);
                rows.ensure_schema().await?;
                Arc::new(PersistedSessionProvider::new(manager, Arc::new(rows)))
            }
        };

        tracing::info!(backend = ?config.auth_backend, "auth backend wired");

        Ok(Self {
            config,
            provider,
            pool,
        })
    }

    pub fn provider(&self) -> Arc<dyn AuthProvider> {
        self.provider.clone()
    }

    /// Graceful shutdown: close the pool and drop the provider.
    pub async fn shutdown(self) {
        if let Some(pool) = self.pool {
            pool.close().await;
            tracing::info!("database pool closed");
        }
    }
}
