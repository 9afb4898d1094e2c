//! HTTP API: routing, bearer middleware and error mapping.

pub mod app;
pub mod context;
pub mod errors;
pub mod middleware;
