use thiserror::Error;

/// Failures while wiring up the session layer. Remote calls never return
/// this; they resolve to a [`crate::CallOutcome`] instead.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for SessionError {
    fn from(err: config::ConfigError) -> Self {
        SessionError::Configuration(err.to_string())
    }
}
