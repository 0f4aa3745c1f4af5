#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid credential payload: {0}")]
    Decode(#[from] serde_json::Error),
}
