//! `cabinet-infra` — adapters behind the auth seams.
//!
//! User-record stores (in-memory and Postgres), the Argon2 credential
//! verifier, the JWT token codec, the Postgres-persisted session backend,
//! and the runtime configuration/context wiring.

pub mod config;
pub mod context;
pub mod password;
pub mod sessions;
pub mod token;
pub mod user_store;

pub use config::{AuthBackend, Config};
pub use context::AppContext;
pub use password::Argon2Verifier;
pub use sessions::{
    PersistedSessionProvider, PostgresSessionStore, SessionRowStore, token_fingerprint,
};
pub use token::JwtCodec;
pub use user_store::{InMemoryUserStore, PostgresUserStore};
