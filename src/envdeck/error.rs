use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvDeckError {
    /// A required field is missing or malformed.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A uniqueness rule would be broken (name, url, one document per environment).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl EnvDeckError {
    pub fn validation(msg: impl Into<String>) -> Self {
        EnvDeckError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        EnvDeckError::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        EnvDeckError::NotFound(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, EnvDeckError>;
