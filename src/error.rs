use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("Unknown diet: {0}")]
    UnknownDiet(String),

    #[error("Unknown meal pattern: {0}")]
    UnknownPattern(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid {kind} '{id}': {reason}")]
    InvalidRecord {
        kind: &'static str,
        id: String,
        reason: String,
    },
}

impl PlannerError {
    pub(crate) fn invalid_record(kind: &'static str, id: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            kind,
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlannerError>;
