//! HealthHub Backend Library
//!
//! Exposes the auth slice, the domain API, and the stores so the binary and
//! the integration tests share one router construction path.

pub mod api;
pub mod auth;
pub mod middleware;
pub mod models;
pub mod store;
