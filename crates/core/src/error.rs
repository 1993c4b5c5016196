use thiserror::Error;

/// Domain validation error types
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Faltan campos obligatorios: {0}")]
    MissingField(&'static str),

    #[error("Género inválido: '{0}'. Valores permitidos: masculino, femenino, otro")]
    InvalidGender(String),

    #[error("El prompt y la respuesta no pueden estar vacíos")]
    EmptyTurn,
}
