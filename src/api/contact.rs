//! Contact Form Endpoint
//! Public; all three fields required.

use crate::{
    api::{ApiError, AppState},
    auth::validate::ValidationError,
    models::ContactMessage,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
    pub contact: ContactMessage,
}

/// POST /api/contact
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ValidationError::new("name", "name is required").into());
    }
    if payload.email.trim().is_empty() {
        return Err(ValidationError::new("email", "email is required").into());
    }
    if payload.message.trim().is_empty() {
        return Err(ValidationError::new("message", "message is required").into());
    }

    let contact = state
        .contacts
        .create(&payload.name, &payload.email, &payload.message)?;

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: "Message sent successfully".to_string(),
            contact,
        }),
    ))
}
