//! Error types for the lazylink client.
//!
//! This module contains the error taxonomy used throughout the crate.
//! URL validation failures get their own [`UrlError`] type because they can
//! occur before any client exists; everything a client operation can fail
//! with is collected in [`ApiError`].
//!
//! # Error Handling
//!
//! Transient transport failures (connection refused, timeouts) are *not*
//! part of this taxonomy: `do_get`/`do_post` absorb them into a synthesized
//! 504 response so callers always receive a response-shaped value. Errors
//! here correspond 1:1 to "this specific call cannot proceed".
//!
//! # Example
//!
//! ```rust
//! use lazylink::{ApiError, UrlError};
//!
//! let err = UrlError::NoHost { url: "/api/v2/".to_string() };
//! assert!(err.to_string().contains("no network location"));
//!
//! let err = ApiError::KeyNotFound { key: "name".to_string() };
//! assert!(err.to_string().contains("name"));
//! ```

use thiserror::Error;

/// Errors raised when a URL cannot be normalized or validated.
///
/// These are fatal to the call that produced them; the caller must fix
/// the input URL.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// The URL has no network location (host) component.
    ///
    /// A client cannot be built against a path-only URL.
    #[error("Invalid URL '{url}': no network location")]
    NoHost {
        /// The offending URL.
        url: String,
    },

    /// The URL has no scheme and a port that is neither 80 nor 443,
    /// so the scheme cannot be inferred.
    #[error("Invalid URL '{url}': no scheme with uncommon port")]
    AmbiguousScheme {
        /// The offending URL.
        url: String,
    },
}

/// Unified error type for client operations.
///
/// Use pattern matching to handle specific failure kinds:
///
/// ```rust,ignore
/// match client.load_data("/exercises/1/").await {
///     Ok(resource) => { /* navigate */ }
///     Err(ApiError::Status { status, url }) => {
///         eprintln!("unexpected {status} from {url}");
///     }
///     Err(other) => return Err(other.into()),
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// A URL could not be normalized or validated.
    #[error(transparent)]
    Url(#[from] UrlError),

    /// A requested field is absent, even after attempting a full load
    /// of the owning object.
    ///
    /// Recoverable with [`ObjectResource::get_or`](crate::ObjectResource::get_or).
    #[error("Key '{key}' not found in resource data")]
    KeyNotFound {
        /// The missing key.
        key: String,
    },

    /// Field access was attempted on a resource that is not an object.
    #[error("Cannot access fields on a {kind} resource")]
    NotAnObject {
        /// The kind of resource the access was attempted on.
        kind: &'static str,
    },

    /// A data load returned an HTTP status that is neither 2xx nor 404.
    ///
    /// 404 is "no data" and yields a null resource instead; everything
    /// else non-2xx is fatal for that call.
    #[error("Unexpected HTTP status {status} from '{url}'")]
    Status {
        /// The HTTP status code received.
        status: u16,
        /// The URL that was requested.
        url: String,
    },

    /// A relative URL was supplied but the client has no base URL
    /// configured to resolve it against.
    #[error("Cannot resolve relative URL '{url}' without a base URL")]
    MissingBaseUrl {
        /// The relative URL that could not be resolved.
        url: String,
    },

    /// A local file operation failed while downloading a resource.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}
