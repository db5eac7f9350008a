//! Contact Message Storage

use crate::models::ContactMessage;
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection};

pub struct ContactStore {
    db_path: String,
}

impl ContactStore {
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
            "CREATE TABLE IF NOT EXISTS contact_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    pub fn create(&self, name: &str, email: &str, message: &str) -> Result<ContactMessage> {
        let created_at = Utc::now().to_rfc3339();

        let conn = Connection::open(&self.db_path)?;
        conn.execute(
            "INSERT INTO contact_messages (name, email, message, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![name, email, message, created_at],
        )?;

        Ok(ContactMessage {
            id: Some(conn.last_insert_rowid()),
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            created_at,
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_create_assigns_sequential_ids() {
        let temp_file = NamedTempFile::new().unwrap();
        let store = ContactStore::new(temp_file.path().to_str().unwrap()).unwrap();

        let first = store.create("A B", "a@x.com", "hello").unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(first.name, "A B");

        let second = store.create("C D", "c@x.com", "hi there").unwrap();
        assert_eq!(second.id, Some(2));
        assert_eq!(second.message, "hi there");
    }
}
