//! Error types for the catalog client, the record store and the coordinator

use thiserror::Error;

/// Failures talking to the remote catalog
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Catalog returned HTTP {status}")]
    Status { status: u16 },

    #[error("Failed to decode catalog response: {0}")]
    Decode(String),

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<NetworkError>,
    },
}

impl NetworkError {
    /// Whether another attempt has a chance of succeeding
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout => true,
            Self::Status { status } => *status >= 500 || *status == 429,
            Self::InvalidUrl(_) | Self::Decode(_) | Self::RetriesExhausted { .. } => false,
        }
    }
}

/// Failures reading or writing the local record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Media not found: track {track_id}")]
    NotFound { track_id: i64 },
}

/// Invalid configuration values
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: &'static str, message: String },
}

/// Errors seen by the coordination layer
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Query '{query}' is too short (needs more than {min_len} characters)")]
    InvalidQuery { query: String, min_len: usize },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
