//! Error type for the `bookfinder` binary.

use bookfinder::error::BookfinderError;
use thiserror::Error;

/// Result alias used throughout the CLI.
pub type Result<T> = core::result::Result<T, BookfinderCliError>;

/// Everything a command can fail with.
#[derive(Error, Debug)]
pub enum BookfinderCliError {
  /// Failure inside the library.
  #[error(transparent)]
  Bookfinder(#[from] BookfinderError),

  /// A prompt could not be shown or read, usually because stdin is not a terminal.
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// Reading stdin or writing to the terminal failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// The search produced no results, only this error message.
  #[error("Search failed: {0}")]
  Search(String),
}
