mod conversations;
mod patients;

pub use conversations::ConversationRepository;
pub use patients::{NewPatient, PatientRepository};

use std::time::Duration;

use deadpool_postgres::{Config, CreatePoolError, Pool, PoolConfig, Runtime};
use tokio_postgres::NoTls;

use crate::error::AppError;

/// Bounded wait for a connection checkout before a store operation fails.
const CHECKOUT_WAIT: Duration = Duration::from_secs(10);

/// Create a connection pool from a database URL.
///
/// The pool is the process-wide store handle: connections are established
/// lazily on first checkout and reused across requests. A checkout waits at
/// most [`CHECKOUT_WAIT`] for an in-flight connection attempt before the
/// operation fails.
pub async fn create_pool(database_url: &str) -> Result<Pool, CreatePoolError> {
    let mut cfg = Config::new();
    cfg.url = Some(database_url.to_string());
    let mut pool_cfg = PoolConfig::default();
    pool_cfg.timeouts.wait = Some(CHECKOUT_WAIT);
    cfg.pool = Some(pool_cfg);
    cfg.create_pool(Some(Runtime::Tokio1), NoTls)
}

/// Create the patient and conversation tables if they do not exist yet.
///
/// Turns are append-only: no UPDATE or DELETE statement over
/// `conversation_turns` exists anywhere in this codebase.
pub async fn init_schema(pool: &Pool) -> Result<(), AppError> {
    let client = pool.get().await?;
    client
        .batch_execute(
            "CREATE TABLE IF NOT EXISTS patients (
                patient_id         TEXT PRIMARY KEY,
                name               TEXT NOT NULL,
                age                INTEGER NOT NULL,
                gender             TEXT NOT NULL,
                email              TEXT,
                phone              TEXT,
                session_id         TEXT NOT NULL,
                consultation_count INTEGER NOT NULL DEFAULT 1,
                created_at         TIMESTAMPTZ NOT NULL DEFAULT now(),
                last_session       TIMESTAMPTZ NOT NULL DEFAULT now()
            );
            CREATE INDEX IF NOT EXISTS patients_session_idx
                ON patients (session_id);

            CREATE TABLE IF NOT EXISTS conversation_turns (
                id         BIGSERIAL PRIMARY KEY,
                prompt     TEXT NOT NULL,
                response   TEXT NOT NULL,
                session_id TEXT,
                patient_id TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            );
            CREATE INDEX IF NOT EXISTS conversation_turns_session_idx
                ON conversation_turns (session_id);
            CREATE INDEX IF NOT EXISTS conversation_turns_patient_idx
                ON conversation_turns (patient_id);",
        )
        .await?;
    Ok(())
}
