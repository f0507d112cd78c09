#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// Free-text output did not (yet) contain everything needed to build a
    /// complete result. Distinct from a genuine zero.
    #[error("Incomplete data: {0}")]
    ParseIncomplete(String),
}
