use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TiendaError {
    #[error("Config directory not found at {0}. Run 'tiendafix init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not load customer details for '{customer}': {reason}")]
    FetchFailed { customer: String, reason: String },

    #[error("Could not load customer details for '{customer}' (server responded {status})")]
    FetchStatus { customer: String, status: u16 },

    #[error("Unexpected response from customer details endpoint: {0}")]
    InvalidResponse(String),

    /// Fetch failure already recorded by the detail view
    #[error("{0}")]
    DetailUnavailable(String),

    #[error("Customer '{0}' not found")]
    CustomerNotFound(String),

    #[error("Failed to parse fixture file {path}: {source}")]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A filter token that is not one of the accepted values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind} filter '{value}'. Expected one of: {expected}")]
pub struct ParseFilterError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

pub type Result<T> = std::result::Result<T, TiendaError>;
