//! clara-core: Shared domain types and conversation-context logic
//!
//! This crate provides the types used across the Clara assistant server,
//! including Patient, ConversationTurn, the context assembler, and the
//! turn-query filter. It performs no I/O; the HTTP and storage layers
//! live in `clara-server`.

pub mod context;
pub mod error;
pub mod models;
pub mod query;

pub use context::{ChatMessage, Role, assemble_context, system_prompt};
pub use error::DomainError;
pub use models::{ConversationTurn, Gender, Patient};
pub use query::{SortOrder, TurnFilter};
