//! Conversation-context assembly for the completion gateway.
//!
//! Builds the exact ordered message list submitted to the language model:
//! one system message carrying the Dra. Clara persona with the patient's
//! identity interpolated, a bounded window of prior exchanges, and the new
//! prompt as the final user message.

use serde::{Deserialize, Serialize};

use crate::models::{ConversationTurn, Patient};

/// Maximum prior turns fetched from the store when assembling context.
pub const HISTORY_FETCH_LIMIT: i64 = 50;

/// Maximum history messages kept in the assembled context
/// (20 messages = the 10 most recent prompt/response exchanges).
pub const CONTEXT_MESSAGE_LIMIT: usize = 20;

/// Fixed sentence the assistant must answer with for off-topic requests.
pub const REFUSAL_SENTENCE: &str =
    "Lo siento, solo puedo ayudarte con temas de salud, medicina y bienestar. 🩺";

/// Message role in the completion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in the completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Build the Dra. Clara system instructions for one patient.
pub fn system_prompt(patient: &Patient) -> String {
    format!(
        "Eres la Dra. Clara, una asistente médica virtual amigable y profesional. \
         Estás atendiendo a {name}, {gender}, {age} años \
         (ID de paciente: {patient_id}, consulta número {count}). \
         Tus respuestas deben ser concisas (máximo 150 palabras), claras, empáticas \
         e incluir emojis relevantes. Usa párrafos cortos para mejor legibilidad. \
         Siempre recuerda que NO puedes dar diagnósticos definitivos y debes \
         recomendar consultar con un médico presencial para casos serios. \
         Solo puedes responder preguntas sobre salud, medicina y bienestar; si el \
         usuario pregunta por cualquier otro tema, responde exactamente: \
         \"{refusal}\"",
        name = patient.name,
        gender = patient.gender,
        age = patient.age,
        patient_id = patient.patient_id,
        count = patient.consultation_count,
        refusal = REFUSAL_SENTENCE,
    )
}

/// Assemble the full message sequence for one chat turn.
///
/// `history` must be in ascending creation order (oldest first), as returned
/// by the conversation store's context query. Only the most recent
/// [`CONTEXT_MESSAGE_LIMIT`] messages of history are kept, truncated from
/// the front so chronological order and prompt/response pairing survive.
///
/// The result always has exactly one leading system message, an even number
/// of alternating user/assistant history messages, and exactly one trailing
/// user message carrying `prompt`.
pub fn assemble_context(
    patient: &Patient,
    history: &[ConversationTurn],
    prompt: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(ChatMessage::system(system_prompt(patient)));

    let keep_turns = CONTEXT_MESSAGE_LIMIT / 2;
    let start = history.len().saturating_sub(keep_turns);
    for turn in &history[start..] {
        messages.push(ChatMessage::user(turn.prompt.clone()));
        messages.push(ChatMessage::assistant(turn.response.clone()));
    }

    messages.push(ChatMessage::user(prompt));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;
    use chrono::{Duration, Utc};

    fn patient() -> Patient {
        Patient {
            patient_id: "P-42".into(),
            name: "Carlos".into(),
            age: 51,
            gender: Gender::Masculino,
            email: None,
            phone: None,
            session_id: "sess-1".into(),
            consultation_count: 3,
            created_at: Utc::now(),
            last_session: Utc::now(),
        }
    }

    fn turns(n: usize) -> Vec<ConversationTurn> {
        let base = Utc::now();
        (0..n)
            .map(|i| ConversationTurn {
                id: i as i64,
                prompt: format!("pregunta {i}"),
                response: format!("respuesta {i}"),
                session_id: Some("sess-1".into()),
                patient_id: Some("P-42".into()),
                created_at: base + Duration::seconds(i as i64),
            })
            .collect()
    }

    #[test]
    fn system_prompt_interpolates_identity() {
        let prompt = system_prompt(&patient());
        assert!(prompt.contains("Carlos"));
        assert!(prompt.contains("masculino"));
        assert!(prompt.contains("51 años"));
        assert!(prompt.contains("P-42"));
        assert!(prompt.contains("consulta número 3"));
        assert!(prompt.contains(REFUSAL_SENTENCE));
    }

    #[test]
    fn empty_history_yields_system_plus_prompt() {
        let messages = assemble_context(&patient(), &[], "me duele la cabeza");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "me duele la cabeza");
    }

    #[test]
    fn single_turn_history_keeps_the_pair() {
        let messages = assemble_context(&patient(), &turns(1), "¿y ahora?");
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "pregunta 0");
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "respuesta 0");
        assert_eq!(messages[3].content, "¿y ahora?");
    }

    #[test]
    fn history_truncates_to_most_recent_ten_exchanges() {
        let messages = assemble_context(&patient(), &turns(30), "nueva consulta");
        // 1 system + 20 history + 1 trailing user
        assert_eq!(messages.len(), 22);
        // Oldest retained exchange is turn 20; chronological order preserved
        assert_eq!(messages[1].content, "pregunta 20");
        assert_eq!(messages[2].content, "respuesta 20");
        assert_eq!(messages[19].content, "pregunta 29");
        assert_eq!(messages[20].content, "respuesta 29");
        assert_eq!(messages[21].content, "nueva consulta");
    }

    #[test]
    fn history_messages_alternate_user_assistant() {
        let messages = assemble_context(&patient(), &turns(7), "x");
        let history = &messages[1..messages.len() - 1];
        assert_eq!(history.len() % 2, 0);
        for pair in history.chunks(2) {
            assert_eq!(pair[0].role, Role::User);
            assert_eq!(pair[1].role, Role::Assistant);
        }
    }

    #[test]
    fn trailing_message_is_always_the_new_prompt() {
        for n in [0, 1, 10, 50] {
            let messages = assemble_context(&patient(), &turns(n), "último");
            let last = messages.last().unwrap();
            assert_eq!(last.role, Role::User);
            assert_eq!(last.content, "último");
            assert_eq!(messages[0].role, Role::System);
            assert_eq!(
                messages.iter().filter(|m| m.role == Role::System).count(),
                1
            );
        }
    }

    #[test]
    fn role_serializes_to_openai_wire_names() {
        let msg = ChatMessage::assistant("hola");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"], "hola");
    }
}
