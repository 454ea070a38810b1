use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The completion provider answered with text that is not the JSON shape
    /// we asked for. `raw` is the unmodified answer, kept for diagnosis.
    #[error("AI response is not valid JSON")]
    InvalidAiResponse { raw: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
