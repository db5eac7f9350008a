//! Domain models shared across routes and stores.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Appointment lifecycle states.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scheduled" => Some(AppointmentStatus::Scheduled),
            "completed" => Some(AppointmentStatus::Completed),
            "cancelled" => Some(AppointmentStatus::Cancelled),
            _ => None,
        }
    }
}

/// A booked appointment between a patient and a doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: String,
    pub doctor_id: String,
    pub appointment_date: String,
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    pub receipt_id: Option<Uuid>,
    pub created_at: String,
}

/// Payment receipt a doctor attaches to an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub patient_id: String,
    pub doctor_id: String,
    pub amount: f64,
    pub details: Option<String>,
    pub created_at: String,
}

/// Metadata for a document a doctor files for a patient. The bytes live
/// elsewhere; only the path is recorded here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub patient_id: String,
    pub doctor_id: String,
    pub appointment_id: Uuid,
    pub file_path: String,
    pub description: Option<String>,
    pub created_at: String,
}

/// A submitted contact-form message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: String,
}
