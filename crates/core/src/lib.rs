//! `cabinet-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure
//! concerns): typed identifiers, the domain error model, and the user record
//! shape exposed by the user-record store.

pub mod error;
pub mod id;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use id::UserId;
pub use user::UserRecord;
