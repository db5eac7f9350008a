//! HealthHub API server: registration, login, and role-gated healthcare CRUD.

use anyhow::{Context, Result};
use dotenv::dotenv;
use healthhub_backend::{
    api::{create_router, AppState},
    auth::{AuthState, JwtHandler, UserStore},
    store::{AppointmentStore, ContactStore, DocumentStore},
};
use std::{env, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    init_tracing();

    info!("HealthHub API starting");

    let db_path = env::var("HEALTHHUB_DB_PATH").unwrap_or_else(|_| "healthhub.db".to_string());

    // The signing secret is process-wide configuration: loaded once here,
    // injected into the issuer and the gate, never a literal elsewhere.
    let jwt_secret = match env::var("JWT_SECRET") {
        Ok(secret) => secret,
        Err(_) => {
            warn!("JWT_SECRET not set - falling back to the development secret");
            "dev-secret-change-in-production-minimum-32-characters".to_string()
        }
    };

    let user_store = Arc::new(UserStore::new(&db_path)?);
    let jwt_handler = Arc::new(JwtHandler::new(jwt_secret));
    let auth_state = AuthState::new(user_store, jwt_handler.clone());

    let app_state = AppState {
        appointments: Arc::new(AppointmentStore::new(&db_path)?),
        documents: Arc::new(DocumentStore::new(&db_path)?),
        contacts: Arc::new(ContactStore::new(&db_path)?),
    };

    info!("Database initialized at: {}", db_path);

    let app = create_router(app_state, auth_state, jwt_handler);

    let addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!("HealthHub API listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "healthhub_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
