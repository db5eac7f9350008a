//! User Storage
//! Credential records in SQLite: unique email, bcrypt-hashed secret, role tag.

use crate::auth::models::{RegisterRequest, RoleProfile, User, UserRole};
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{info, warn};
use uuid::Uuid;

/// Errors surfaced by credential writes.
#[derive(Debug)]
pub enum UserStoreError {
    /// The email is already on file; no write was performed.
    DuplicateEmail,
    Internal(anyhow::Error),
}

impl std::fmt::Display for UserStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStoreError::DuplicateEmail => write!(f, "Email already registered"),
            UserStoreError::Internal(e) => write!(f, "User store error: {}", e),
        }
    }
}

impl std::error::Error for UserStoreError {}

impl From<anyhow::Error> for UserStoreError {
    fn from(e: anyhow::Error) -> Self {
        UserStoreError::Internal(e)
    }
}

impl From<rusqlite::Error> for UserStoreError {
    fn from(e: rusqlite::Error) -> Self {
        // UNIQUE constraint on email is the backstop behind the pre-check
        if let rusqlite::Error::SqliteFailure(err, _) = &e {
            if err.code == rusqlite::ErrorCode::ConstraintViolation {
                return UserStoreError::DuplicateEmail;
            }
        }
        UserStoreError::Internal(e.into())
    }
}

/// User storage with SQLite backend
pub struct UserStore {
    db_path: String,
}

impl UserStore {
    /// Create a new user store and initialize the schema.
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
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                full_name TEXT NOT NULL,
                role TEXT NOT NULL,
                specialization TEXT,
                license TEXT,
                company_name TEXT,
                contact_person TEXT,
                address TEXT,
                phone TEXT,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Register a new user from a validated payload. Hashes the password,
    /// never stores it in plain form. Fails with `DuplicateEmail` (and no
    /// write) when the email is already on file.
    pub fn create_user(&self, req: &RegisterRequest) -> Result<User, UserStoreError> {
        let email = req.email.trim().to_lowercase();

        if self.find_by_email(&email)?.is_some() {
            warn!("Registration rejected, email already on file: {}", email);
            return Err(UserStoreError::DuplicateEmail);
        }

        let password_hash = hash(&req.password, DEFAULT_COST)
            .context("Failed to hash password")
            .map_err(UserStoreError::Internal)?;

        let (specialization, license, company_name, contact_person, address, phone) =
            flatten_profile(&req.profile);

        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name: req.full_name.trim().to_string(),
            role: req.profile.role(),
            specialization,
            license,
            company_name,
            contact_person,
            address,
            phone,
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = Connection::open(&self.db_path).map_err(anyhow::Error::from)?;
        conn.execute(
            "INSERT INTO users (id, email, password_hash, full_name, role, specialization,
                                license, company_name, contact_person, address, phone, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                user.id.to_string(),
                user.email,
                user.password_hash,
                user.full_name,
                user.role.as_str(),
                user.specialization,
                user.license,
                user.company_name,
                user.contact_person,
                user.address,
                user.phone,
                user.created_at,
            ],
        )?;

        info!("Registered user: {} ({})", user.email, user.role.as_str());

        Ok(user)
    }

    /// Get a user by email, `None` when no record exists.
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>, UserStoreError> {
        let conn = Connection::open(&self.db_path).map_err(anyhow::Error::from)?;

        let mut stmt = conn
            .prepare(
                "SELECT id, email, password_hash, full_name, role, specialization,
                        license, company_name, contact_person, address, phone, created_at
                 FROM users WHERE email = ?1",
            )
            .map_err(anyhow::Error::from)?;

        let user_result = stmt.query_row(params![email.trim().to_lowercase()], row_to_user);

        match user_result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(anyhow::Error::from(e).into()),
        }
    }

    /// Verify an email/password pair. Returns the matching user only on a
    /// full match; an unknown email and a wrong password are both `None`,
    /// so callers cannot tell the two apart.
    pub fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, UserStoreError> {
        match self.find_by_email(email)? {
            Some(user) => {
                let valid = verify(password, &user.password_hash)
                    .context("Failed to verify password")
                    .map_err(UserStoreError::Internal)?;
                Ok(valid.then_some(user))
            }
            None => Ok(None),
        }
    }

    /// Count stored users, used by tests to assert no-write on conflict.
    pub fn count(&self) -> Result<i64, UserStoreError> {
        let conn = Connection::open(&self.db_path).map_err(anyhow::Error::from)?;
        let count = conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
            .map_err(anyhow::Error::from)?;
        Ok(count)
    }
}

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id_str: String = row.get(0)?;
    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    // A corrupt role tag must fail the read, never downgrade to another role
    let role_str: String = row.get(4)?;
    let role = UserRole::from_str(&role_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown role tag: {}", role_str).into(),
        )
    })?;

    Ok(User {
        id,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        full_name: row.get(3)?,
        role,
        specialization: row.get(5)?,
        license: row.get(6)?,
        company_name: row.get(7)?,
        contact_person: row.get(8)?,
        address: row.get(9)?,
        phone: row.get(10)?,
        created_at: row.get(11)?,
    })
}

fn flatten_profile(
    profile: &RoleProfile,
) -> (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
) {
    match profile.clone() {
        RoleProfile::Patient { phone, address } => (None, None, None, None, address, phone),
        RoleProfile::Doctor {
            specialization,
            license,
            phone,
        } => (specialization, license, None, None, None, phone),
        RoleProfile::Hospital {
            company_name,
            contact_person,
            address,
            phone,
        }
        | RoleProfile::Lab {
            company_name,
            contact_person,
            address,
            phone,
        }
        | RoleProfile::Store {
            company_name,
            contact_person,
            address,
            phone,
        } => (None, None, company_name, contact_person, address, phone),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_store() -> (UserStore, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap();
        let store = UserStore::new(db_path).unwrap();
        (store, temp_file)
    }

    fn patient_request(email: &str) -> RegisterRequest {
        serde_json::from_value(serde_json::json!({
            "email": email,
            "password": "abcdef",
            "fullName": "A B",
            "userType": "patient",
        }))
        .unwrap()
    }

    #[test]
    fn test_create_and_retrieve_user() {
        let (store, _temp) = create_test_store();

        let user = store.create_user(&patient_request("a@x.com")).unwrap();
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.role, UserRole::Patient);
        assert_ne!(user.password_hash, "abcdef"); // never plaintext

        let retrieved = store.find_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(retrieved.id, user.id);
        assert_eq!(retrieved.full_name, "A B");
    }

    #[test]
    fn test_duplicate_email_rejected_without_write() {
        let (store, _temp) = create_test_store();

        store.create_user(&patient_request("a@x.com")).unwrap();
        assert_eq!(store.count().unwrap(), 1);

        let result = store.create_user(&patient_request("a@x.com"));
        assert!(matches!(result, Err(UserStoreError::DuplicateEmail)));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_email_lookup_is_case_insensitive() {
        let (store, _temp) = create_test_store();

        store.create_user(&patient_request("A@X.com")).unwrap();
        assert!(store.find_by_email("a@x.com").unwrap().is_some());

        let result = store.create_user(&patient_request("a@x.COM"));
        assert!(matches!(result, Err(UserStoreError::DuplicateEmail)));
    }

    #[test]
    fn test_verify_credentials_uniform() {
        let (store, _temp) = create_test_store();

        store.create_user(&patient_request("a@x.com")).unwrap();

        // Correct pair
        let user = store.verify_credentials("a@x.com", "abcdef").unwrap();
        assert!(user.is_some());

        // Wrong password and unknown email are indistinguishable
        assert!(store.verify_credentials("a@x.com", "wrong!").unwrap().is_none());
        assert!(store
            .verify_credentials("nobody@x.com", "abcdef")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_corrupt_credential_row_fails_loudly() {
        let (store, temp) = create_test_store();

        // Write a row with a mangled id and an unknown role tag directly
        let conn = Connection::open(temp.path().to_str().unwrap()).unwrap();
        conn.execute(
            "INSERT INTO users (id, email, password_hash, full_name, role, created_at)
             VALUES ('not-a-uuid', 'bad@x.com', 'hash', 'B A D', 'patient', 'now')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO users (id, email, password_hash, full_name, role, created_at)
             VALUES (?1, 'rogue@x.com', 'hash', 'R O', 'superuser', 'now')",
            params![Uuid::new_v4().to_string()],
        )
        .unwrap();

        assert!(store.find_by_email("bad@x.com").is_err());
        assert!(store.find_by_email("rogue@x.com").is_err());
    }

    #[test]
    fn test_doctor_profile_fields_persisted() {
        let (store, _temp) = create_test_store();

        let req: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "doc@x.com",
            "password": "abcdef",
            "fullName": "Dr. D",
            "userType": "doctor",
            "specialization": "cardiology",
            "license": "LIC-42",
        }))
        .unwrap();

        store.create_user(&req).unwrap();
        let user = store.find_by_email("doc@x.com").unwrap().unwrap();
        assert_eq!(user.role, UserRole::Doctor);
        assert_eq!(user.specialization.as_deref(), Some("cardiology"));
        assert_eq!(user.license.as_deref(), Some("LIC-42"));
    }
}
