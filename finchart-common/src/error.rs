use thiserror::Error;

/// Common error type for FinChart components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Unknown locale: {0}")]
    Locale(String),
}

/// Result type alias using FinChart's Error.
pub type Result<T> = std::result::Result<T, Error>;
