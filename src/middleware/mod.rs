//! Observability middleware.
//!
//! Request logging with latency tracking. Authentication middleware lives in
//! [`crate::auth::middleware`].

pub mod logging;

pub use logging::request_logging;
