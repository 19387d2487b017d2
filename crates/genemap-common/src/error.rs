use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeneMapError {
    #[error("Malformed dictionary entry at line {line}: {reason}")]
    MalformedDictionaryEntry { line: usize, reason: String },

    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid mention: {0}")]
    InvalidMention(String),

    #[error("Pattern build error: {0}")]
    Pattern(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GeneMapError>;
