// src/types/user.rs
//! Profile payloads exchanged with the backend's `/api/users/me`

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    User,
    Employer,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Option<i64>,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Option<UserRole>,
    pub language: Option<String>,
    // Everything else the backend sends is kept as-is so the stored copy stays complete
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LanguageUpdate {
    pub language: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let json = r#"{
            "id": 7,
            "email": "asha@example.in",
            "full_name": "Asha Rao",
            "role": "EMPLOYER",
            "language": "ta",
            "skills": ["solar", "wind"]
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.role, Some(UserRole::Employer));
        assert_eq!(profile.language.as_deref(), Some("ta"));
        assert!(profile.extra.contains_key("skills"));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["skills"][1], "wind");
    }

    #[test]
    fn test_minimal_profile() {
        let profile: UserProfile = serde_json::from_str(r#"{"email": "x@y.z"}"#).unwrap();
        assert!(profile.language.is_none());
        assert!(profile.role.is_none());
    }
}
