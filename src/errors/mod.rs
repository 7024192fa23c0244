use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanFeedError {
    // Configuration errors
    #[error("Configuration error: {field}: {reason}")]
    Configuration { field: String, reason: String },

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Rendering errors
    #[error("Cannot encode {field} as XML: {reason}")]
    Encoding { field: String, reason: String },

    #[error("Template rendering failed: {0}")]
    Template(#[from] askama::Error),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid plan record: {0}")]
    InvalidRecord(String),

    // Import errors
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // User input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PlanFeedError {
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PlanFeedError::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PlanFeedError::Configuration { .. } | PlanFeedError::MissingEnvVar(_)
        )
    }
}

pub type PlanFeedResult<T> = Result<T, PlanFeedError>;
