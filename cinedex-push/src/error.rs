//! Error types for the `cinedex-push` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading inputs or talking to the platform.
#[derive(Debug, Error)]
pub enum PushError {
    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// A TOML configuration file could not be parsed.
    #[error("Invalid TOML in {}: {source}", path.display())]
    Toml {
        /// The offending file.
        path: PathBuf,
        /// The parser error.
        source: toml::de::Error,
    },

    /// JSON input or output could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// One line of a JSONL file is not a valid record.
    #[error("Invalid record at {}:{line}: {source}", path.display())]
    JsonLine {
        /// The file being read.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// The parser error.
        source: serde_json::Error,
    },

    /// A tab-separated verification file could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The request never produced a response (connection, TLS, body decode).
    #[error("Request to {endpoint} failed: {message}")]
    Request {
        /// The endpoint that was called.
        endpoint: String,
        /// A description of the failure.
        message: String,
    },

    /// The platform answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    Status {
        /// The endpoint that was called.
        endpoint: String,
        /// The HTTP status code.
        status: u16,
        /// The raw response body.
        body: String,
    },

    /// A response was missing a field the protocol requires.
    #[error("{endpoint} response is missing `{field}`")]
    MissingField {
        /// The endpoint that was called.
        endpoint: String,
        /// The missing field name.
        field: &'static str,
    },

    /// A header name or value could not be used on an HTTP request.
    #[error("Invalid header `{name}`: {message}")]
    InvalidHeader {
        /// The header name as received.
        name: String,
        /// Why it was rejected.
        message: String,
    },

    /// A record was rejected at the encoder boundary.
    #[error("Encode error: {0}")]
    Encode(String),
}

impl PushError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PushError::Io { path: path.into(), source }
    }

    pub(crate) fn request(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        PushError::Request { endpoint: endpoint.into(), message: source.to_string() }
    }
}

/// A convenience result type for push operations.
pub type Result<T> = std::result::Result<T, PushError>;
