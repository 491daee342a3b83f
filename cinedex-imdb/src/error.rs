//! Error types for the `cinedex-imdb` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while scraping the chart or looking up movie metadata.
#[derive(Debug, Error)]
pub enum ImdbError {
    /// The request never produced a response.
    #[error("Request to {url} failed: {message}")]
    Request {
        /// The requested URL.
        url: String,
        /// A description of the failure.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned {status}")]
    Status {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// A metadata provider could not supply a movie.
    #[error("Metadata provider error ({provider}): {message}")]
    Provider {
        /// The provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The output file could not be written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O failure.
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenience result type for scraping operations.
pub type Result<T> = std::result::Result<T, ImdbError>;
