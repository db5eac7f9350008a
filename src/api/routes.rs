//! Router assembly: public, auth, and role-gated route groups.

use crate::{
    api::{appointments, contact, documents},
    auth::{api as auth_api, auth_middleware, require_role, AuthState, JwtHandler, UserRole},
    middleware::request_logging,
    store::{AppointmentStore, ContactStore, DocumentStore},
};
use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state for the domain handlers.
#[derive(Clone)]
pub struct AppState {
    pub appointments: Arc<AppointmentStore>,
    pub documents: Arc<DocumentStore>,
    pub contacts: Arc<ContactStore>,
}

/// Role whitelists, declared per route group.
const PATIENT_ONLY: &[UserRole] = &[UserRole::Patient];
const DOCTOR_ONLY: &[UserRole] = &[UserRole::Doctor];

/// Build the full application router.
///
/// Layer order on protected routes: gate first (token check), then the role
/// whitelist of the matched group, then the handler.
pub fn create_router(
    state: AppState,
    auth_state: AuthState,
    jwt_handler: Arc<JwtHandler>,
) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/register", post(auth_api::register))
        .route("/api/auth/login", post(auth_api::login))
        .with_state(auth_state);

    let patient_routes = Router::new()
        .route("/api/appointments", post(appointments::book))
        .route(
            "/api/appointments/patient",
            get(appointments::list_for_patient),
        )
        .route("/api/documents/patient", get(documents::list_for_patient))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_role(PATIENT_ONLY, req, next)
        }));

    let doctor_routes = Router::new()
        .route(
            "/api/appointments/doctor",
            get(appointments::list_for_doctor),
        )
        .route(
            "/api/appointments/:id/receipt",
            post(appointments::create_receipt),
        )
        .route("/api/documents", post(documents::create))
        .route("/api/documents/doctor", get(documents::list_for_doctor))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            require_role(DOCTOR_ONLY, req, next)
        }));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth_api::get_current_user))
        .merge(patient_routes)
        .merge(doctor_routes)
        .route_layer(middleware::from_fn_with_state(jwt_handler, auth_middleware))
        .with_state(state.clone());

    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/api/contact", post(contact::submit))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(auth_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
