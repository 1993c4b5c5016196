use deadpool_postgres::Pool;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

use clara_core::{ConversationTurn, DomainError, SortOrder, TurnFilter};

use crate::error::AppError;

const TURN_COLUMNS: &str = "id, prompt, response, session_id, patient_id, created_at";

/// Repository for the append-only conversation log
#[derive(Clone)]
pub struct ConversationRepository {
    pool: Pool,
}

impl ConversationRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Append one prompt/response exchange to the log
    pub async fn append(
        &self,
        prompt: &str,
        response: &str,
        session_id: Option<&str>,
        patient_id: Option<&str>,
    ) -> Result<ConversationTurn, AppError> {
        if prompt.is_empty() || response.is_empty() {
            return Err(DomainError::EmptyTurn.into());
        }

        let client = self.pool.get().await?;
        let row = client
            .query_one(
                format!(
                    "INSERT INTO conversation_turns (prompt, response, session_id, patient_id) \
                     VALUES ($1, $2, $3, $4) \
                     RETURNING {TURN_COLUMNS}"
                )
                .as_str(),
                &[&prompt, &response, &session_id, &patient_id],
            )
            .await?;
        Ok(turn_from_row(row))
    }

    /// Query turns matching `filter`, sorted by creation time, capped at `limit`
    pub async fn query(
        &self,
        filter: &TurnFilter,
        order: SortOrder,
        limit: i64,
    ) -> Result<Vec<ConversationTurn>, AppError> {
        let statement = query_sql(filter, order);
        let client = self.pool.get().await?;

        let rows = match filter {
            TurnFilter::All => client.query(statement.as_str(), &[&limit]).await?,
            TurnFilter::BySession(session_id) => {
                client
                    .query(statement.as_str(), &[session_id, &limit])
                    .await?
            }
            TurnFilter::ByPatient(patient_id) => {
                client
                    .query(statement.as_str(), &[patient_id, &limit])
                    .await?
            }
            TurnFilter::BySessionOrPatient {
                session_id,
                patient_id,
            } => {
                let params: [&(dyn ToSql + Sync); 3] = [session_id, patient_id, &limit];
                client.query(statement.as_str(), &params).await?
            }
        };

        Ok(rows.into_iter().map(turn_from_row).collect())
    }
}

/// Build the SELECT statement for one filter/order combination
fn query_sql(filter: &TurnFilter, order: SortOrder) -> String {
    let condition = match filter {
        TurnFilter::All => String::new(),
        TurnFilter::BySession(_) => " WHERE session_id = $1".to_string(),
        TurnFilter::ByPatient(_) => " WHERE patient_id = $1".to_string(),
        TurnFilter::BySessionOrPatient { .. } => {
            " WHERE session_id = $1 OR patient_id = $2".to_string()
        }
    };

    let direction = match order {
        SortOrder::Ascending => "ASC",
        SortOrder::Descending => "DESC",
    };

    let limit_param = match filter {
        TurnFilter::All => "$1",
        TurnFilter::BySession(_) | TurnFilter::ByPatient(_) => "$2",
        TurnFilter::BySessionOrPatient { .. } => "$3",
    };

    format!(
        "SELECT {TURN_COLUMNS} FROM conversation_turns{condition} \
         ORDER BY created_at {direction} LIMIT {limit_param}"
    )
}

fn turn_from_row(row: Row) -> ConversationTurn {
    ConversationTurn {
        id: row.get("id"),
        prompt: row.get("prompt"),
        response: row.get("response"),
        session_id: row.get("session_id"),
        patient_id: row.get("patient_id"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_query_orders_and_limits() {
        let sql = query_sql(&TurnFilter::All, SortOrder::Descending);
        assert!(sql.contains("FROM conversation_turns ORDER BY created_at DESC LIMIT $1"));
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn session_filter_binds_first_parameter() {
        let sql = query_sql(&TurnFilter::BySession("s".into()), SortOrder::Descending);
        assert!(sql.contains("WHERE session_id = $1"));
        assert!(sql.ends_with("LIMIT $2"));
    }

    #[test]
    fn patient_filter_binds_first_parameter() {
        let sql = query_sql(&TurnFilter::ByPatient("p".into()), SortOrder::Descending);
        assert!(sql.contains("WHERE patient_id = $1"));
        assert!(sql.ends_with("LIMIT $2"));
    }

    #[test]
    fn disjunction_filter_uses_ascending_order_for_context() {
        let filter = TurnFilter::BySessionOrPatient {
            session_id: "s".into(),
            patient_id: "p".into(),
        };
        let sql = query_sql(&filter, SortOrder::Ascending);
        assert!(sql.contains("WHERE session_id = $1 OR patient_id = $2"));
        assert!(sql.contains("ORDER BY created_at ASC"));
        assert!(sql.ends_with("LIMIT $3"));
    }
}
