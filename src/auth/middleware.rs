//! Authentication Middleware
//! The request gate (bearer-token check) and the role authorizer layered on it.

use crate::auth::{
    jwt::JwtHandler,
    models::{Claims, UserRole},
};
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

/// Request gate: verifies the bearer token in front of protected routes.
///
/// The token is expected as `Authorization: Bearer <token>`, nothing else.
/// On success the decoded claims are inserted into the request extensions,
/// so downstream layers and handlers get a typed identity context without
/// touching the database.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or(AuthError::MissingToken)?;

    let claims = jwt_handler
        .validate_token(&token)
        .map_err(|_| AuthError::InvalidToken)?;

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Role authorizer: restricts a route to a whitelist of role tags.
///
/// Runs after [`auth_middleware`] and reads the claims it attached. Wire it
/// up as a route layer:
///
/// ```ignore
/// .route_layer(middleware::from_fn(|req, next| {
///     require_role(&[UserRole::Doctor], req, next)
/// }))
/// ```
pub async fn require_role(
    allowed: &'static [UserRole],
    req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(AuthError::MissingToken)?;

    if !allowed.contains(&claims.role) {
        return Err(AuthError::Forbidden);
    }

    Ok(next.run(req).await)
}

/// Gate/authorizer rejections. Terminal for the request.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Not authorized to access this resource"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest};
    use uuid::Uuid;

    #[test]
    fn test_auth_error_responses() {
        let missing = AuthError::MissingToken.into_response();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let invalid = AuthError::InvalidToken.into_response();
        assert_eq!(invalid.status(), StatusCode::UNAUTHORIZED);

        let forbidden = AuthError::Forbidden.into_response();
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_claims_round_trip_through_extensions() {
        let mut req = HttpRequest::new(Body::empty());
        assert!(req.extensions().get::<Claims>().is_none());

        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            email: "a@x.com".to_string(),
            role: UserRole::Patient,
            exp: 1234567890,
        };
        req.extensions_mut().insert(claims.clone());

        let extracted = req.extensions().get::<Claims>().unwrap();
        assert_eq!(extracted.email, "a@x.com");
        assert_eq!(extracted.role, UserRole::Patient);
    }
}
