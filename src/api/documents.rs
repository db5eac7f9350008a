//! Document Endpoints
//! Doctors file document metadata for patients; both sides list their own.

use crate::{
    api::{ApiError, AppState},
    auth::{models::Claims, validate::ValidationError},
    models::Document,
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    pub patient_id: String,
    pub appointment_id: Uuid,
    pub file_path: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// POST /api/documents (doctor only)
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    if payload.patient_id.trim().is_empty() {
        return Err(ValidationError::new("patientId", "patient id is required").into());
    }
    if payload.file_path.trim().is_empty() {
        return Err(ValidationError::new("filePath", "file path is required").into());
    }

    let document = state.documents.create(
        &payload.patient_id,
        &claims.sub,
        &payload.appointment_id,
        &payload.file_path,
        payload.description.as_deref(),
    )?;

    Ok((StatusCode::CREATED, Json(document)))
}

/// GET /api/documents/patient (patient only)
pub async fn list_for_patient(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = state.documents.list_for_patient(&claims.sub)?;
    Ok(Json(documents))
}

/// GET /api/documents/doctor (doctor only)
pub async fn list_for_doctor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let documents = state.documents.list_for_doctor(&claims.sub)?;
    Ok(Json(documents))
}
