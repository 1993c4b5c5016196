//! Chat and patient-registration HTTP handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use clara_core::{
    Gender, Patient, SortOrder, TurnFilter, assemble_context, context::HISTORY_FETCH_LIMIT,
};

use crate::AppState;
use crate::db::{ConversationRepository, NewPatient, PatientRepository};
use crate::error::AppError;

/// Maximum turns returned by a history listing
const HISTORY_LIST_LIMIT: i64 = 50;

/// Request body for chat generation
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    prompt: Option<String>,
    session_id: Option<String>,
}

/// Response body for chat generation
#[derive(Serialize)]
pub struct GenerateResponse {
    response: String,
}

/// POST /chat - Generate an assistant response for one chat turn
///
/// Validates the request, resolves the patient behind the session, assembles
/// the bounded conversation context, invokes the completion gateway, and
/// persists the turn before answering. A persistence failure therefore
/// surfaces as a failed chat turn even though a completion was generated.
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let prompt = body
        .prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("El prompt es requerido".to_string()))?;
    let session_id = body
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest("SessionId es requerido".to_string()))?;

    let pool = state.pool()?.clone();
    let patients = PatientRepository::new(pool.clone());

    let patient = patients
        .find_by_session_id(&session_id)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized(
                "Paciente no registrado. Por favor complete el registro primero.".to_string(),
            )
        })?;

    let gateway = state.ai.as_ref().ok_or_else(|| {
        AppError::Internal("No se ha configurado correctamente la API de OpenAI".to_string())
    })?;

    // Current-session turns merged with the patient's prior sessions; a
    // history failure fails the whole request rather than masking it with
    // an empty window.
    let turns = ConversationRepository::new(pool);
    let filter = TurnFilter::BySessionOrPatient {
        session_id: session_id.clone(),
        patient_id: patient.patient_id.clone(),
    };
    let history = turns
        .query(&filter, SortOrder::Ascending, HISTORY_FETCH_LIMIT)
        .await?;

    let messages = assemble_context(&patient, &history, &prompt);

    tracing::debug!(
        patient_id = %patient.patient_id,
        session_id = %session_id,
        context_messages = messages.len(),
        "Invoking completion gateway"
    );

    let response = gateway
        .complete(&messages)
        .await
        .map_err(AppError::Upstream)?;

    turns
        .append(
            &prompt,
            &response,
            Some(&session_id),
            Some(&patient.patient_id),
        )
        .await?;

    Ok(Json(GenerateResponse { response }))
}

/// Query parameters for the history listing
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct HistoryParams {
    session_id: Option<String>,
    patient_id: Option<String>,
    include_all_sessions: Option<String>,
}

/// GET /chat/history - List stored turns, most recent first
pub async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, AppError> {
    let include_all = params.include_all_sessions.as_deref() == Some("true");
    let filter = TurnFilter::for_history(
        params.session_id.as_deref(),
        params.patient_id.as_deref(),
        include_all,
    );

    let turns = ConversationRepository::new(state.pool()?.clone());
    let listing = turns
        .query(&filter, SortOrder::Descending, HISTORY_LIST_LIMIT)
        .await?;

    Ok(Json(listing))
}

/// Request body for patient registration
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    patient_id: Option<String>,
    name: Option<String>,
    age: Option<i32>,
    gender: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    session_id: Option<String>,
}

/// Response body for patient registration
#[derive(Serialize)]
pub struct RegisterResponse {
    patient: Patient,
    message: String,
}

/// POST /chat/register - Register a patient, or rebind an existing one
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let missing = || AppError::BadRequest("Faltan campos obligatorios".to_string());

    let patient_id = body.patient_id.filter(|v| !v.is_empty()).ok_or_else(missing)?;
    let name = body.name.filter(|v| !v.is_empty()).ok_or_else(missing)?;
    let age = body.age.ok_or_else(missing)?;
    let gender = body.gender.filter(|v| !v.is_empty()).ok_or_else(missing)?;
    let session_id = body.session_id.filter(|v| !v.is_empty()).ok_or_else(missing)?;

    let gender = Gender::parse(&gender)?;

    let patients = PatientRepository::new(state.pool()?.clone());
    let patient = patients
        .register(&NewPatient {
            patient_id,
            name,
            age,
            gender,
            email: body.email,
            phone: body.phone,
            session_id,
        })
        .await?;

    tracing::info!(
        patient_id = %patient.patient_id,
        consultation = patient.consultation_count,
        "Patient registered"
    );

    let message = format!(
        "¡Hola {}! Soy la Dra. Clara, tu asistente médica virtual. \
         ¿En qué puedo ayudarte hoy? 👩‍⚕️",
        patient.name
    );

    Ok(Json(RegisterResponse { patient, message }))
}

/// GET /chat/find/{patientId} - Look up a patient by external identifier
pub async fn find_patient(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let patients = PatientRepository::new(state.pool()?.clone());

    match patients.find_by_patient_id(&patient_id).await? {
        Some(patient) => Ok(Json(patient)),
        None => Err(AppError::NotFound("Paciente no encontrado".to_string())),
    }
}

/// GET /chat/patient/{sessionId} - Look up the patient bound to a session
pub async fn patient_by_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let patients = PatientRepository::new(state.pool()?.clone());

    match patients.find_by_session_id(&session_id).await? {
        Some(patient) => Ok(Json(patient)),
        None => Err(AppError::NotFound("Paciente no registrado".to_string())),
    }
}
