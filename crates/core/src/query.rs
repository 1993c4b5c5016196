//! Turn-query filters.
//!
//! The history endpoint and the context assembler both read the
//! conversation store through an explicit tagged filter, so the selection
//! semantics stay auditable independently of the HTTP layer.

/// Which turns a conversation-store query matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnFilter {
    /// No filter: every stored turn.
    All,
    /// Turns tagged with this session.
    BySession(String),
    /// Turns tagged with this patient, across all of their sessions.
    ByPatient(String),
    /// Turns matching either tag; used to merge current-session history
    /// with the patient's cross-session history for context assembly.
    BySessionOrPatient {
        session_id: String,
        patient_id: String,
    },
}

/// Result ordering over `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Oldest first; used for context assembly.
    Ascending,
    /// Newest first; used for history listings.
    Descending,
}

impl TurnFilter {
    /// Deterministic filter selection for the history endpoint.
    ///
    /// `includeAllSessions == "true"` with a patient id wins; otherwise a
    /// session id filters by session; otherwise the listing is unfiltered.
    pub fn for_history(
        session_id: Option<&str>,
        patient_id: Option<&str>,
        include_all_sessions: bool,
    ) -> Self {
        match (include_all_sessions, patient_id, session_id) {
            (true, Some(patient), _) => TurnFilter::ByPatient(patient.to_string()),
            (_, _, Some(session)) => TurnFilter::BySession(session.to_string()),
            _ => TurnFilter::All,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn include_all_sessions_with_patient_filters_by_patient() {
        let filter = TurnFilter::for_history(Some("s1"), Some("P1"), true);
        assert_eq!(filter, TurnFilter::ByPatient("P1".into()));
    }

    #[test]
    fn include_all_sessions_without_patient_falls_back_to_session() {
        let filter = TurnFilter::for_history(Some("s1"), None, true);
        assert_eq!(filter, TurnFilter::BySession("s1".into()));
    }

    #[test]
    fn session_only_filters_by_session() {
        let filter = TurnFilter::for_history(Some("s1"), Some("P1"), false);
        assert_eq!(filter, TurnFilter::BySession("s1".into()));
    }

    #[test]
    fn no_parameters_means_unfiltered() {
        assert_eq!(TurnFilter::for_history(None, None, false), TurnFilter::All);
        assert_eq!(TurnFilter::for_history(None, None, true), TurnFilter::All);
    }
}
