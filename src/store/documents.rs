//! Document Storage
//! Metadata for files doctors attach to patient records.

use crate::models::Document;
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::info;
use uuid::Uuid;

pub struct DocumentStore {
    db_path: String,
}

impl DocumentStore {
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
            "CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                patient_id TEXT NOT NULL,
                doctor_id TEXT NOT NULL,
                appointment_id TEXT NOT NULL,
                file_path TEXT NOT NULL,
                description TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub fn create(
        &self,
        patient_id: &str,
        doctor_id: &str,
        appointment_id: &Uuid,
        file_path: &str,
        description: Option<&str>,
    ) -> Result<Document> {
        let document = Document {
            id: Uuid::new_v4(),
            patient_id: patient_id.to_string(),
            doctor_id: doctor_id.to_string(),
            appointment_id: *appointment_id,
            file_path: file_path.to_string(),
            description: description.map(|d| d.to_string()),
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO documents (id, patient_id, doctor_id, appointment_id,
                                    file_path, description, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                document.id.to_string(),
                document.patient_id,
                document.doctor_id,
                document.appointment_id.to_string(),
                document.file_path,
                document.description,
                document.created_at,
            ],
        )?;

        info!(
            "Document {} filed for patient {} by doctor {}",
            document.id, document.patient_id, document.doctor_id
        );

        Ok(document)
    }

    pub fn list_for_patient(&self, patient_id: &str) -> Result<Vec<Document>> {
        self.list_by_column("patient_id", patient_id)
    }

    pub fn list_for_doctor(&self, doctor_id: &str) -> Result<Vec<Document>> {
        self.list_by_column("doctor_id", doctor_id)
    }

    fn list_by_column(&self, column: &str, value: &str) -> Result<Vec<Document>> {
        let conn = Connection::open(&self.db_path)?;
        let sql = format!(
            "SELECT id, patient_id, doctor_id, appointment_id, file_path, description, created_at
             FROM documents WHERE {} = ?1 ORDER BY created_at DESC",
            column
        );
        let mut stmt = conn.prepare(&sql)?;

        let documents = stmt
            .query_map(params![value], row_to_document)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(documents)
    }
}

fn row_to_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<Document> {
    let id_str: String = row.get(0)?;
    let appointment_id: String = row.get(3)?;
    Ok(Document {
        id: parse_uuid_column(0, &id_str)?,
        patient_id: row.get(1)?,
        doctor_id: row.get(2)?,
        appointment_id: parse_uuid_column(3, &appointment_id)?,
        file_path: row.get(4)?,
        description: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn parse_uuid_column(index: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
    })
}
