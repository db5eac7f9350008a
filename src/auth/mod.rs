//! Authentication Module
//! Token issuance, the request gate, role authorization, and input validation.

pub mod api;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod user_store;
pub mod validate;

pub use api::AuthState;
pub use jwt::JwtHandler;
pub use middleware::{auth_middleware, require_role};
pub use models::{Claims, UserRole};
pub use user_store::UserStore;
