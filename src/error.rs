use thiserror::Error;

/// Central error type for the song-reconstructor-core crate.
#[derive(Debug, Error)]
pub enum ReconstructError {
    // Generic fallback (wraps anyhow)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),

    // Domain-specific variants
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl ReconstructError {
    pub fn config(msg: impl Into<String>) -> Self {
        ReconstructError::Configuration(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        ReconstructError::InvariantViolation(msg.into())
    }
}

// --- Implement From conversions for common errors ---
impl From<std::io::Error> for ReconstructError {
    fn from(e: std::io::Error) -> Self {
        ReconstructError::Anyhow(e.into())
    }
}

impl From<serde_json::Error> for ReconstructError {
    fn from(e: serde_json::Error) -> Self {
        ReconstructError::Anyhow(e.into())
    }
}

impl From<hound::Error> for ReconstructError {
    fn from(e: hound::Error) -> Self {
        ReconstructError::Anyhow(e.into())
    }
}

pub type Result<T> = std::result::Result<T, ReconstructError>;
