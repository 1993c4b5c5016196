use deadpool_postgres::Pool;
use tokio_postgres::Row;

use clara_core::{Gender, Patient};

use crate::error::AppError;

const PATIENT_COLUMNS: &str = "patient_id, name, age, gender, email, phone, \
     session_id, consultation_count, created_at, last_session";

/// A validated registration request, ready for the upsert.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub patient_id: String,
    pub name: String,
    pub age: i32,
    pub gender: Gender,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub session_id: String,
}

/// Repository for patient lookups and registration
#[derive(Clone)]
pub struct PatientRepository {
    pool: Pool,
}

impl PatientRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Look up a patient by external patient identifier
    pub async fn find_by_patient_id(&self, patient_id: &str) -> Result<Option<Patient>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE patient_id = $1").as_str(),
                &[&patient_id],
            )
            .await?;
        row.map(patient_from_row).transpose()
    }

    /// Look up a patient by their currently bound session.
    ///
    /// Session ids are not unique across patients; when two records carry
    /// the same session the store's first match wins (unspecified order).
    pub async fn find_by_session_id(&self, session_id: &str) -> Result<Option<Patient>, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_opt(
                format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE session_id = $1 LIMIT 1")
                    .as_str(),
                &[&session_id],
            )
            .await?;
        row.map(patient_from_row).transpose()
    }

    /// Register a patient, or rebind an existing one to a new session.
    ///
    /// On conflict only `session_id`, `consultation_count` and
    /// `last_session` change; demographics from the request are not
    /// reapplied to an existing record. The conditional upsert makes the
    /// read-modify-write atomic.
    pub async fn register(&self, new: &NewPatient) -> Result<Patient, AppError> {
        let client = self.pool.get().await?;
        let row = client
            .query_one(
                format!(
                    "INSERT INTO patients \
                         (patient_id, name, age, gender, email, phone, session_id) \
                     VALUES ($1, $2, $3, $4, $5, $6, $7) \
                     ON CONFLICT (patient_id) DO UPDATE SET \
                         session_id = EXCLUDED.session_id, \
                         consultation_count = patients.consultation_count + 1, \
                         last_session = now() \
                     RETURNING {PATIENT_COLUMNS}"
                )
                .as_str(),
                &[
                    &new.patient_id,
                    &new.name,
                    &new.age,
                    &new.gender.as_str(),
                    &new.email,
                    &new.phone,
                    &new.session_id,
                ],
            )
            .await?;
        patient_from_row(row)
    }
}

/// Map a patients row to the domain record
fn patient_from_row(row: Row) -> Result<Patient, AppError> {
    let gender: String = row.get("gender");
    let gender = Gender::parse(&gender)
        .map_err(|e| AppError::Internal(format!("Stored gender is invalid: {}", e)))?;

    Ok(Patient {
        patient_id: row.get("patient_id"),
        name: row.get("name"),
        age: row.get("age"),
        gender,
        email: row.get("email"),
        phone: row.get("phone"),
        session_id: row.get("session_id"),
        consultation_count: row.get("consultation_count"),
        created_at: row.get("created_at"),
        last_session: row.get("last_session"),
    })
}
