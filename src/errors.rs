//! Unified error types for the `restcall` crate.
//!
//! This module centralizes all failures that can occur while issuing a
//! request and provides a single top-level [`Error`] enum plus the convenient
//! [`Result`] alias. Errors from lower layers (`reqwest`, URL parsing, JSON
//! encoding/decoding) are mapped into structured variants so callers can
//! handle them precisely.

use thiserror::Error;

// --- Build-Time Error ---

/// Errors that can occur while building a [`RestClient`](crate::RestClient).
#[derive(Debug, Error)]
pub enum BuildError {
    /// Failed to build the HTTP client (reqwest configuration).
    #[error("Failed to build the HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

// --- The Main Operational Error Enum ---

/// The crate's top-level error type.
///
/// It groups failures into high-level categories:
/// - [`Error::Request`] — HTTP transport and marshalling issues
/// - [`Error::Parse`] — URL parsing failures
/// - [`Error::Build`] — construction of the client failed
///
/// Most lower-level errors automatically convert into this enum via `From`.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request/response failed (transport, encoding, decoding).
    #[error("Request failed: {0}")]
    Request(#[from] RequestError),

    /// URL parsing failed while preparing a request.
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] url::ParseError),

    /// Building the client failed (reqwest configuration).
    #[error("Client build failed: {0}")]
    Build(#[from] BuildError),
}

// --- Consolidated Request Error ---

/// Transport and marshalling errors for a single request.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Network/protocol failure from reqwest (DNS, connect, TLS, I/O).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request payload could not be JSON-encoded.
    #[error("JSON encode error: {message}")]
    EncodeJson {
        /// Error message from the JSON serializer.
        message: String,
    },

    /// The response body is not valid JSON at all. Bodies that are valid
    /// JSON but do not match the declared shape are absorbed by the
    /// [`Decoded::Untyped`](crate::Decoded::Untyped) fallback instead.
    #[error("JSON decode error: {message}")]
    DecodeJson {
        /// Error message from the JSON deserializer.
        message: String,
    },
}

/// A specialized `Result` type for `restcall` operations.
pub type Result<T> = std::result::Result<T, Error>;

// Ergonomic "Staircase" From Implementations ---
// A macro to reduce boilerplate for converting base errors into the top-level Error.
macro_rules! impl_from_for_error {
    ($from_type:ty, $to_variant:path) => {
        impl From<$from_type> for Error {
            fn from(err: $from_type) -> Self {
                $to_variant(err.into())
            }
        }
    };
}

// Request Errors
impl_from_for_error!(reqwest::Error, Error::Request);
