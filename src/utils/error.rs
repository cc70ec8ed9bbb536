use thiserror::Error;

#[derive(Error, Debug)]
pub enum CropError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Artifact encoding error: {0}")]
    ArtifactError(#[from] bincode::Error),

    #[error("{message}")]
    ValidationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown {column} category: '{value}'")]
    UnknownCategoryError { column: String, value: String },

    #[error("field lookup failed: '{field}'")]
    FieldLookupError { field: String },

    #[error("Unknown class id: {id}")]
    UnknownClassError { id: usize },

    #[error("Training error: {message}")]
    TrainingError { message: String },

    #[error("Artifact mismatch: {message}")]
    ArtifactMismatchError { message: String },
}

impl CropError {
    pub fn validation(message: impl Into<String>) -> Self {
        CropError::ValidationError {
            message: message.into(),
        }
    }

    pub fn training(message: impl Into<String>) -> Self {
        CropError::TrainingError {
            message: message.into(),
        }
    }

    /// Client errors get a 400 at the HTTP boundary; everything else is a 500.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CropError::ValidationError { .. })
    }
}

pub type Result<T> = std::result::Result<T, CropError>;
