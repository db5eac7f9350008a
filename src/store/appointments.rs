//! Appointment Storage
//! Appointments plus the receipts doctors attach to them.

use crate::models::{Appointment, AppointmentStatus, Receipt};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

pub struct AppointmentStore {
    db_path: String,
}

impl AppointmentStore {
    pub fn new(db_path: &str) -> Result<Self> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<()> {
        let conn = Connection::open(&self.db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS appointments (
                id TEXT PRIMARY KEY,
                patient_id TEXT NOT NULL,
                doctor_id TEXT NOT NULL,
                appointment_date TEXT NOT NULL,
                notes TEXT,
                status TEXT NOT NULL,
                receipt_id TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS receipts (
                id TEXT PRIMARY KEY,
                appointment_id TEXT NOT NULL,
                patient_id TEXT NOT NULL,
                doctor_id TEXT NOT NULL,
                amount REAL NOT NULL,
                details TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (appointment_id) REFERENCES appointments(id)
            )",
            [],
        )?;

        Ok(())
    }

    /// Book a new appointment for a patient.
    pub fn book(
        &self,
        patient_id: &str,
        doctor_id: &str,
        appointment_date: &str,
        notes: Option<&str>,
    ) -> Result<Appointment> {
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
            doctor_id: doctor_id.to_string(),
            appointment_date: appointment_date.to_string(),
            notes: notes.map(|n| n.to_string()),
            status: AppointmentStatus::Scheduled,
            receipt_id: None,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO appointments (id, patient_id, doctor_id, appointment_date,
                                       notes, status, receipt_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                appointment.id.to_string(),
                appointment.patient_id,
                appointment.doctor_id,
                appointment.appointment_date,
                appointment.notes,
                appointment.status.as_str(),
                appointment.receipt_id.map(|r| r.to_string()),
                appointment.created_at,
            ],
        )?;

        info!(
            "Appointment booked: {} (patient {}, doctor {})",
            appointment.id, appointment.patient_id, appointment.doctor_id
        );

        Ok(appointment)
    }

    pub fn find_by_id(&self, id: &Uuid) -> Result<Option<Appointment>> {
        let conn = Connection::open(&self.db_path)?;
        let mut stmt = conn.prepare(
            "SELECT id, patient_id, doctor_id, appointment_date, notes, status, receipt_id, created_at
             FROM appointments WHERE id = ?1",
        )?;

        match stmt.query_row(params![id.to_string()], row_to_appointment) {
            Ok(appt) => Ok(Some(appt)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Appointments booked by a patient, newest first.
    pub fn list_for_patient(&self, patient_id: &str) -> Result<Vec<Appointment>> {
        self.list_by_column("patient_id", patient_id)
    }

    /// Appointments assigned to a doctor, newest first.
    pub fn list_for_doctor(&self, doctor_id: &str) -> Result<Vec<Appointment>> {
        self.list_by_column("doctor_id", doctor_id)
    }

    fn list_by_column(&self, column: &str, value: &str) -> Result<Vec<Appointment>> {
        let conn = Connection::open(&self.db_path)?;
        let sql = format!(
            "SELECT id, patient_id, doctor_id, appointment_date, notes, status, receipt_id, created_at
             FROM appointments WHERE {} = ?1 ORDER BY created_at DESC",
            column
        );
        let mut stmt = conn.prepare(&sql)?;

        let appointments = stmt
            .query_map(params![value], row_to_appointment)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(appointments)
    }

    /// Attach a receipt to an existing appointment. Returns `None` when the
    /// appointment is unknown; the insert and the back-reference update run
    /// in one transaction.
    pub fn create_receipt(
        &self,
        appointment_id: &Uuid,
        doctor_id: &str,
        amount: f64,
        details: Option<&str>,
    ) -> Result<Option<Receipt>> {
        let Some(appointment) = self.find_by_id(appointment_id)? else {
            return Ok(None);
        };

        let receipt = Receipt {
            id: Uuid::new_v4(),
            appointment_id: *appointment_id,
            patient_id: appointment.patient_id.clone(),
            doctor_id: doctor_id.to_string(),
            amount,
            details: details.map(|d| d.to_string()),
            created_at: Utc::now().to_rfc3339(),
        };

        let mut conn = Connection::open(&self.db_path)?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO receipts (id, appointment_id, patient_id, doctor_id, amount, details, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                receipt.id.to_string(),
                receipt.appointment_id.to_string(),
                receipt.patient_id,
                receipt.doctor_id,
                receipt.amount,
                receipt.details,
                receipt.created_at,
            ],
        )?;
        tx.execute(
            "UPDATE appointments SET receipt_id = ?1 WHERE id = ?2",
            params![receipt.id.to_string(), appointment_id.to_string()],
        )?;
        tx.commit()?;

        info!("Receipt {} attached to appointment {}", receipt.id, appointment_id);

        Ok(Some(receipt))
    }
}

fn row_to_appointment(row: &rusqlite::Row<'_>) -> rusqlite::Result<Appointment> {
    let id_str: String = row.get(0)?;
    let status_str: String = row.get(5)?;
    let receipt_id: Option<String> = row.get(6)?;
    Ok(Appointment {
        id: parse_uuid_column(0, &id_str)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        appointment_date: row.get(3)?,
        notes: row.get(4)?,
        status: AppointmentStatus::from_str(&status_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                5,
                rusqlite::types::Type::Text,
                format!("unknown appointment status: {}", status_str).into(),
            )
        })?,
        receipt_id: receipt_id
            .map(|r| parse_uuid_column(6, &r))
            .transpose()?,
        created_at: row.get(7)?,
    })
}

fn parse_uuid_column(index: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}
