//! Domain records: patients and conversation turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Fixed gender enumeration accepted at registration.
///
/// Wire values are the Spanish forms used by the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculino,
    Femenino,
    Otro,
}

impl Gender {
    /// Parse a caller-supplied gender string.
    ///
    /// Anything outside the fixed enumeration is a validation failure,
    /// not coerced to `Otro`.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value {
            "masculino" => Ok(Gender::Masculino),
            "femenino" => Ok(Gender::Femenino),
            "otro" => Ok(Gender::Otro),
            other => Err(DomainError::InvalidGender(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Masculino => "masculino",
            Gender::Femenino => "femenino",
            Gender::Otro => "otro",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered patient.
///
/// Exactly one record exists per `patient_id`. Re-registration rebinds
/// `session_id`, bumps `consultation_count` and `last_session`, and leaves
/// every demographic field untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub patient_id: String,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub session_id: String,
    pub consultation_count: i32,
    pub created_at: DateTime<Utc>,
    pub last_session: DateTime<Utc>,
}

/// One prompt/response exchange. Immutable once written; history is
/// reconstructed purely by query + sort over `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationTurn {
    pub id: i64,
    pub prompt: String,
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_fixed_enumeration() {
        assert_eq!(Gender::parse("masculino").unwrap(), Gender::Masculino);
        assert_eq!(Gender::parse("femenino").unwrap(), Gender::Femenino);
        assert_eq!(Gender::parse("otro").unwrap(), Gender::Otro);
    }

    #[test]
    fn gender_rejects_values_outside_enumeration() {
        assert!(Gender::parse("male").is_err());
        assert!(Gender::parse("").is_err());
        assert!(Gender::parse("Masculino").is_err());
    }

    #[test]
    fn gender_serializes_lowercase() {
        let json = serde_json::to_string(&Gender::Femenino).unwrap();
        assert_eq!(json, "\"femenino\"");
    }

    #[test]
    fn patient_wire_form_is_camel_case() {
        let patient = Patient {
            patient_id: "P-001".into(),
            name: "Ana".into(),
            age: 34,
            gender: Gender::Femenino,
            email: None,
            phone: None,
            session_id: "s-1".into(),
            consultation_count: 1,
            created_at: Utc::now(),
            last_session: Utc::now(),
        };
        let value = serde_json::to_value(&patient).unwrap();
        assert_eq!(value["patientId"], "P-001");
        assert_eq!(value["consultationCount"], 1);
        assert!(value.get("email").is_none());
    }
}
