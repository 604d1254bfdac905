//! Error types for Sworn Chat.

use thiserror::Error;

/// Library-level error type for Sworn Chat operations.
#[derive(Error, Debug)]
pub enum SwornError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    VectorIndex(String),

    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl SwornError {
    /// Short, stable name of the error class, used in user-facing error replies.
    pub fn kind(&self) -> &'static str {
        match self {
            SwornError::Config(_) => "ConfigError",
            SwornError::Embedding(_) => "EmbeddingError",
            SwornError::VectorIndex(_) => "VectorIndexError",
            SwornError::Completion(_) => "CompletionError",
            SwornError::OpenAI(_) => "OpenAIError",
            SwornError::InvalidInput(_) => "InvalidInputError",
            SwornError::Io(_) => "IoError",
            SwornError::TomlParse(_) => "TomlParseError",
        }
    }
}

/// Result type alias for Sworn Chat operations.
pub type Result<T> = std::result::Result<T, SwornError>;
