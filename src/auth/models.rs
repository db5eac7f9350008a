//! Authentication Models
//! User accounts, role tags, JWT claims, and the auth request/response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account as stored in the credential table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub full_name: String,
    pub role: UserRole,
    pub specialization: Option<String>,
    pub license: Option<String>,
    pub company_name: Option<String>,
    pub contact_person: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
}

/// Role tags for RBAC. Each role maps to its own dashboard and route set.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Patient,
    Doctor,
    Hospital,
    Lab,
    Store,
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Patient => "patient",
            UserRole::Doctor => "doctor",
            UserRole::Hospital => "hospital",
            UserRole::Lab => "lab",
            UserRole::Store => "store",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "patient" => Some(UserRole::Patient),
            "doctor" => Some(UserRole::Doctor),
            "hospital" => Some(UserRole::Hospital),
            "lab" => Some(UserRole::Lab),
            "store" => Some(UserRole::Store),
            _ => None,
        }
    }
}

/// JWT Claims payload. Role is embedded so the role check needs no lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user id)
    pub email: String,
    pub role: UserRole,
    pub exp: usize, // expiration timestamp
}

/// Registration request body.
///
/// The role profile is a tagged variant keyed on `userType`: the base fields
/// are always required, while each role branch declares its own extras. This
/// is what lets the validator make a field required for one role only.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(flatten)]
    pub profile: RoleProfile,
}

/// Role-specific registration fields, discriminated by the `userType` tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "userType", rename_all = "lowercase")]
pub enum RoleProfile {
    #[serde(rename_all = "camelCase")]
    Patient {
        #[serde(default)]
        phone: Option<String>,
        #[serde(default)]
        address: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Doctor {
        #[serde(default)]
        specialization: Option<String>,
        #[serde(default)]
        license: Option<String>,
        #[serde(default)]
        phone: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Hospital {
        #[serde(default)]
        company_name: Option<String>,
        #[serde(default)]
        contact_person: Option<String>,
        #[serde(default)]
        address: Option<String>,
        #[serde(default)]
        phone: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Lab {
        #[serde(default)]
        company_name: Option<String>,
        #[serde(default)]
        contact_person: Option<String>,
        #[serde(default)]
        address: Option<String>,
        #[serde(default)]
        phone: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Store {
        #[serde(default)]
        company_name: Option<String>,
        #[serde(default)]
        contact_person: Option<String>,
        #[serde(default)]
        address: Option<String>,
        #[serde(default)]
        phone: Option<String>,
    },
}

impl RoleProfile {
    pub fn role(&self) -> UserRole {
        match self {
            RoleProfile::Patient { .. } => UserRole::Patient,
            RoleProfile::Doctor { .. } => UserRole::Doctor,
            RoleProfile::Hospital { .. } => UserRole::Hospital,
            RoleProfile::Lab { .. } => UserRole::Lab,
            RoleProfile::Store { .. } => UserRole::Store,
        }
    }
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: usize, // seconds until expiration
    pub user: UserResponse,
}

/// User response (sanitized public profile)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_serialization() {
        let doctor = UserRole::Doctor;
        let json = serde_json::to_string(&doctor).unwrap();
        assert_eq!(json, r#""doctor""#);

        let lab: UserRole = serde_json::from_str(r#""lab""#).unwrap();
        assert_eq!(lab, UserRole::Lab);
    }

    #[test]
    fn test_user_role_string_conversion() {
        assert_eq!(UserRole::Patient.as_str(), "patient");
        assert_eq!(UserRole::Store.as_str(), "store");

        assert_eq!(UserRole::from_str("doctor"), Some(UserRole::Doctor));
        assert_eq!(UserRole::from_str("HOSPITAL"), Some(UserRole::Hospital));
        assert_eq!(UserRole::from_str("admin"), None);
    }

    #[test]
    fn test_register_request_tagged_profile() {
        let json = r#"{
            "email": "doc@example.com",
            "password": "secret1",
            "fullName": "Dr. Example",
            "userType": "doctor",
            "specialization": "cardiology"
        }"#;

        let req: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.profile.role(), UserRole::Doctor);
        match &req.profile {
            RoleProfile::Doctor { specialization, .. } => {
                assert_eq!(specialization.as_deref(), Some("cardiology"));
            }
            other => panic!("Expected doctor profile, got {:?}", other),
        }
    }

    #[test]
    fn test_register_request_unknown_role_rejected() {
        let json = r#"{
            "email": "a@x.com",
            "password": "abcdef",
            "fullName": "A B",
            "userType": "wizard"
        }"#;

        assert!(serde_json::from_str::<RegisterRequest>(json).is_err());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            password_hash: "s3cret-hash".to_string(),
            full_name: "A B".to_string(),
            role: UserRole::Patient,
            specialization: None,
            license: None,
            company_name: None,
            contact_person: None,
            address: None,
            phone: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("s3cret-hash"));
    }
}
