//! Request Validation
//! Field-level checks applied to auth payloads before any handler logic runs.
//!
//! Requiredness is not flat: the role profile is a tagged variant, and the
//! doctor branch alone makes `specialization` mandatory. The first failing
//! field is reported and the handler never executes.

use crate::auth::models::{LoginRequest, RegisterRequest, RoleProfile};
use serde::Serialize;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A single failed validation rule, reported to the client as-is.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl RegisterRequest {
    /// Validate a registration payload. Returns the first failing field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::new("email", "email is required"));
        }
        if !looks_like_email(&self.email) {
            return Err(ValidationError::new("email", "email must be a valid address"));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(ValidationError::new(
                "password",
                format!("password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        if self.full_name.trim().is_empty() {
            return Err(ValidationError::new("fullName", "full name is required"));
        }

        // Role-conditional branch: only the doctor profile requires a
        // specialization; every other branch accepts it as absent.
        if let RoleProfile::Doctor { specialization, .. } = &self.profile {
            match specialization {
                Some(s) if !s.trim().is_empty() => {}
                _ => {
                    return Err(ValidationError::new(
                        "specialization",
                        "specialization is required for doctors",
                    ))
                }
            }
        }

        Ok(())
    }
}

impl LoginRequest {
    /// Validate a login payload. Both fields required, nothing more.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::new("email", "email is required"));
        }
        if self.password.is_empty() {
            return Err(ValidationError::new("password", "password is required"));
        }
        Ok(())
    }
}

/// Cheap shape check: one '@', non-empty local part, domain with a dot.
fn looks_like_email(s: &str) -> bool {
    let s = s.trim();
    let mut parts = s.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let Some(domain) = parts.next() else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !s.contains(char::is_whitespace)
}
