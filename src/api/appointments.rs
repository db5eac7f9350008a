//! Appointment Endpoints
//! Patients book and list their appointments; doctors list theirs and attach
//! receipts. The authenticated identity always comes from the gate's claims,
//! never from the request body.

use crate::{
    api::{ApiError, AppState},
    auth::{models::Claims, validate::ValidationError},
    models::{Appointment, Receipt},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: String,
    pub appointment_date: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// POST /api/appointments (patient only)
pub async fn book(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), ApiError> {
    if payload.doctor_id.trim().is_empty() {
        return Err(ValidationError::new("doctorId", "doctor id is required").into());
    }
    if payload.appointment_date.trim().is_empty() {
        return Err(ValidationError::new("appointmentDate", "appointment date is required").into());
    }

    let appointment = state.appointments.book(
        &claims.sub,
        &payload.doctor_id,
        &payload.appointment_date,
        payload.notes.as_deref(),
    )?;

    Ok((StatusCode::CREATED, Json(appointment)))
}

/// GET /api/appointments/patient (patient only)
pub async fn list_for_patient(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let appointments = state.appointments.list_for_patient(&claims.sub)?;
    Ok(Json(appointments))
}

/// GET /api/appointments/doctor (doctor only)
pub async fn list_for_doctor(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Appointment>>, ApiError> {
    let appointments = state.appointments.list_for_doctor(&claims.sub)?;
    Ok(Json(appointments))
}

#[derive(Debug, Deserialize)]
pub struct CreateReceiptRequest {
    pub amount: f64,
    #[serde(default)]
    pub details: Option<String>,
}

/// POST /api/appointments/:id/receipt (doctor only)
pub async fn create_receipt(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(appointment_id): Path<Uuid>,
    Json(payload): Json<CreateReceiptRequest>,
) -> Result<(StatusCode, Json<Receipt>), ApiError> {
    let receipt = state
        .appointments
        .create_receipt(
            &appointment_id,
            &claims.sub,
            payload.amount,
            payload.details.as_deref(),
        )?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".to_string()))?;

    Ok((StatusCode::CREATED, Json(receipt)))
}
