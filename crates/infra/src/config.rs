//! Runtime configuration, read once at startup.
//!
//! Everything is environment-driven. The auth backend is selected here and
//! nowhere else; handlers only ever see the `AuthProvider` trait.

use anyhow::{Context as _, bail};

/// Which auth backend to wire in at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthBackend {
    /// Stateless tokens, validated by signature + expiry recomputation.
    Jwt,
    /// Tokens additionally tracked in a Postgres `sessions` table.
    Postgres,
}

impl AuthBackend {
    fn parse(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "jwt" => Ok(AuthBackend::Jwt),
            "postgres" => Ok(AuthBackend::Postgres),
            other => bail!("CABINET_AUTH_BACKEND must be 'jwt' or 'postgres', got '{other}'"),
        }
    }
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub auth_backend: AuthBackend,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `DATABASE_URL` is optional for the `jwt` backend (an in-memory user
    /// store is wired in for development) and mandatory for `postgres`.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr =
            std::env::var("CABINET_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let auth_backend = match std::env::var("CABINET_AUTH_BACKEND") {
            Ok(raw) => AuthBackend::parse(&raw).context("invalid CABINET_AUTH_BACKEND")?,
            Err(_) => AuthBackend::Jwt,
        };

        let database_url = std::env::var("DATABASE_URL").ok();
        if auth_backend == AuthBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL must be set when CABINET_AUTH_BACKEND=postgres");
        }

        Ok(Self {
            bind_addr,
            jwt_secret,
            database_url,
            auth_backend,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_parsing_is_tolerant_of_case() {
        assert_eq!(AuthBackend::parse("JWT").unwrap(), AuthBackend::Jwt);
        assert_eq!(AuthBackend::parse(" postgres ").unwrap(), AuthBackend::Postgres);
        assert!(AuthBackend::parse("redis").is_err());
    }
}
