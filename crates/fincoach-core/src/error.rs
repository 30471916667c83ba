use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinCoachError {
    #[error("Unknown coach id: {0}")]
    UnknownCoach(String),

    #[error("Missing required data fields for coach '{coach_id}': {}", missing.join(", "))]
    MissingRequiredFields {
        coach_id: String,
        missing: Vec<String>,
    },

    #[error("Profile store error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FinCoachError {
    fn from(e: serde_json::Error) -> Self {
        FinCoachError::Serialization(e.to_string())
    }
}
