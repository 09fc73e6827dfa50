//! Error types for ChatWarden

/// Result type alias using ChatWarden's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for ChatWarden operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// External oracle (classifier or judge) call errors
    #[error("oracle error: {0}")]
    Oracle(String),

    /// Pipeline execution errors
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new oracle error
    pub fn oracle(msg: impl Into<String>) -> Self {
        Self::Oracle(msg.into())
    }

    /// Create a new pipeline error
    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
