//! Error types for the bookfinder library.
//!
//! This module provides a single error type covering every failure mode the
//! library can surface, including:
//! - Network and upstream API errors
//! - Filter and sort order parsing
//! - Configuration and file system access
//!
//! Storage failures on the bookmark path are deliberately absent here:
//! [`crate::store::Store`] recovers from them locally and only logs.
//!
//! # Examples
//!
//! ```
//! use bookfinder::error::BookfinderError;
//!
//! let error = BookfinderError::Http(reqwest::StatusCode::SERVICE_UNAVAILABLE);
//! assert_eq!(error.to_string(), "HTTP 503");
//! ```

use reqwest::StatusCode;
use thiserror::Error;

/// Error type alias used for the [`bookfinder`](crate) crate.
pub type Result<T> = core::result::Result<T, BookfinderError>;

/// Errors that can occur when working with the bookfinder library.
#[derive(Error, Debug)]
pub enum BookfinderError {
  /// A network request failed before a response arrived.
  ///
  /// This can occur when:
  /// - The network is unavailable
  /// - The server is unreachable
  /// - The request times out
  /// - TLS errors occur
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The upstream API answered with a non-2xx status.
  ///
  /// Displays as `HTTP <status>`, which is what users see in the error banner.
  #[error("HTTP {}", .0.as_u16())]
  Http(StatusCode),

  /// The upstream response body could not be decoded as a result page.
  #[error("Failed to decode response: {0}")]
  Decode(String),

  /// The request was deliberately cancelled.
  ///
  /// This is never shown to users; the controller treats it as a silent end of the request.
  #[error("Request cancelled")]
  Cancelled,

  /// JSON serialization or parsing failed outside the fail-soft storage path.
  ///
  /// This occurs when importing a bookmark file that is not a JSON array of entries.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// A configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// A configuration could not be written out as TOML.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// A configured URL is malformed.
  #[error(transparent)]
  Url(#[from] url::ParseError),

  /// The provided search field string couldn't be parsed.
  ///
  /// The string parameter contains the invalid value for debugging.
  #[error("Invalid search field \"{0}\", expected one of: all, title, author, subject, isbn")]
  InvalidField(String),

  /// The provided sort order string couldn't be parsed.
  #[error("Invalid sort order \"{0}\", expected one of: relevance, newest, oldest, editions")]
  InvalidSort(String),

  /// Any other configuration problem.
  #[error("{0}")]
  Config(String),
}

impl BookfinderError {
  /// Whether this error represents a deliberate cancellation rather than a failure.
  pub fn is_cancellation(&self) -> bool { matches!(self, BookfinderError::Cancelled) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_http_error_message() {
    assert_eq!(BookfinderError::Http(StatusCode::NOT_FOUND).to_string(), "HTTP 404");
    assert_eq!(BookfinderError::Http(StatusCode::INTERNAL_SERVER_ERROR).to_string(), "HTTP 500");
  }

  #[test]
  fn test_cancellation_detection() {
    assert!(BookfinderError::Cancelled.is_cancellation());
    assert!(!BookfinderError::Config("nope".into()).is_cancellation());
  }
}
