//! Authentication API Endpoints
//! Registration, login, and the identity echo for the signed-in user.

use crate::auth::{
    jwt::JwtHandler,
    models::{Claims, LoginRequest, LoginResponse, RegisterRequest, UserResponse, UserRole},
    user_store::{UserStore, UserStoreError},
    validate::ValidationError,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub user_store: Arc<UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(user_store: Arc<UserStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            user_store,
            jwt_handler,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserResponse,
}

/// Register endpoint - POST /api/auth/register
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthApiError> {
    payload.validate()?;

    let user = state.user_store.create_user(&payload).map_err(|e| match e {
        UserStoreError::DuplicateEmail => AuthApiError::EmailTaken,
        UserStoreError::Internal(err) => {
            error!("Registration failed: {}", err);
            AuthApiError::InternalError
        }
    })?;

    info!("User registered: {} ({})", user.email, user.role.as_str());

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user: UserResponse::from_user(&user),
        }),
    ))
}

/// Login endpoint - POST /api/auth/login
///
/// Unknown email and wrong password produce the same rejection, so the
/// response never reveals whether an account exists.
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthApiError> {
    payload.validate()?;

    let user = state
        .user_store
        .verify_credentials(&payload.email, &payload.password)
        .map_err(|e| {
            error!("Credential check failed: {}", e);
            AuthApiError::InternalError
        })?
        .ok_or_else(|| {
            warn!("Failed login attempt: {}", payload.email);
            AuthApiError::InvalidCredentials
        })?;

    let (token, expires_in) = state.jwt_handler.generate_token(&user).map_err(|e| {
        error!("Token generation failed: {}", e);
        AuthApiError::InternalError
    })?;

    info!("Login successful: {} ({})", user.email, user.role.as_str());

    Ok(Json(LoginResponse {
        token,
        expires_in,
        user: UserResponse::from_user(&user),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub email: String,
    pub role: UserRole,
}

/// Current identity - GET /api/auth/me
/// Built entirely from the claims the gate attached; no database lookup.
pub async fn get_current_user(Extension(claims): Extension<Claims>) -> Json<MeResponse> {
    Json(MeResponse {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    })
}

/// Auth API errors
#[derive(Debug)]
pub enum AuthApiError {
    Validation(ValidationError),
    EmailTaken,
    InvalidCredentials,
    InternalError,
}

impl From<ValidationError> for AuthApiError {
    fn from(e: ValidationError) -> Self {
        AuthApiError::Validation(e)
    }
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        match self {
            AuthApiError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.message, "field": e.field })),
            )
                .into_response(),
            // 400 on conflict, matching the contract the frontend expects
            AuthApiError::EmailTaken => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Email already registered" })),
            )
                .into_response(),
            AuthApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid email or password" })),
            )
                .into_response(),
            AuthApiError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_api_error_statuses() {
        let validation = AuthApiError::Validation(ValidationError {
            field: "email",
            message: "email is required".to_string(),
        })
        .into_response();
        assert_eq!(validation.status(), StatusCode::BAD_REQUEST);

        let taken = AuthApiError::EmailTaken.into_response();
        assert_eq!(taken.status(), StatusCode::BAD_REQUEST);

        let invalid = AuthApiError::InvalidCredentials.into_response();
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);

        let internal = AuthApiError::InternalError.into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
