//! Error types for HAL client operations.
//!
//! This module defines every error the codec, the link resolver and the HTTP client
//! can report. The [`Result`] type alias provides a convenient shorthand for
//! operations that may fail.
//!
//! # Error Categories
//!
//! | Category | Variants | Retryable |
//! |----------|----------|-----------|
//! | Links | `InvalidLink`, `LinkNotFound` | No |
//! | Codec | `Decode`, `Encode`, `Json` | No |
//! | Resolution | `InvalidUri` | No |
//! | Configuration | `Configuration` | No |
//! | Transport | `Http`, `Timeout`, `Status` | Depends on status |
//!
//! The codec and the resolver never perform I/O, so their errors are deterministic
//! for a given input. Only transport errors are candidates for a retry.
//!
//! # Examples
//!
//! ```
//! use hal_http::HalError;
//!
//! let err = HalError::LinkNotFound("missing-rel".into());
//! assert!(err.to_string().contains("missing-rel"));
//! assert!(!err.is_retryable());
//!
//! assert!(HalError::Timeout.is_retryable());
//! ```

use crate::client::{is_access_denied_status, is_retryable_status};
use thiserror::Error;

/// Result type for HAL operations.
pub type Result<T> = std::result::Result<T, HalError>;

/// Errors that can occur while decoding, encoding, resolving or fetching HAL resources.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HalError {
    /// A link without a link relation was added to a [`LinkCollection`](crate::LinkCollection).
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    /// A required link relation is not present in a link collection.
    #[error("Link not found for rel '{0}'")]
    LinkNotFound(String),

    /// A reserved HAL section (`_links` / `_embedded`) is malformed or does not match
    /// the declared shape of the property bound to `rel`.
    ///
    /// `rel` is the offending link relation, the section name, or `$` for the
    /// document root.
    #[error("Decode error at '{rel}': {message}")]
    Decode {
        /// Link relation (or section) where decoding failed
        rel: String,
        /// What was wrong with it
        message: String,
    },

    /// A resource could not be written as a HAL document.
    #[error("Encode error: {0}")]
    Encode(String),

    /// A link href is not a valid URI after expansion, or its template is malformed.
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// Rel bindings, client settings or a request's headers are invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The HTTP request could not be completed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The server answered with a non-success status code.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The request timed out.
    #[error("Operation timed out")]
    Timeout,

    /// Error raised by caller-supplied code.
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for HalError {
    fn from(err: anyhow::Error) -> Self {
        HalError::Other(err.to_string())
    }
}

impl HalError {
    /// Shorthand for a [`HalError::Decode`] error.
    pub fn decode(rel: impl Into<String>, message: impl Into<String>) -> Self {
        HalError::Decode {
            rel: rel.into(),
            message: message.into(),
        }
    }

    /// Check if this error is retryable.
    ///
    /// Returns `true` for timeouts, transport failures and the statuses 408, 425,
    /// 429, 502, 503 and 504. Codec, resolver and configuration errors are never
    /// retryable.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            HalError::Timeout | HalError::Http(_) => true,
            HalError::Status { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if this is an access denied error (HTTP 401 or 403).
    #[inline]
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        match self {
            HalError::Status { status, .. } => is_access_denied_status(*status),
            _ => false,
        }
    }
}
