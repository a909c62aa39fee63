use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelicError {
    #[error("Unknown relic definition: {0}")]
    UnknownDefinition(String),

    #[error("Invalid relic definition '{id}': {reason}")]
    InvalidDefinition { id: String, reason: String },

    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Definition load error: {0}")]
    LoadError(#[from] crate::loader::LoadError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RelicError>;
