//! Error types for the Peregrine library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`PeregrineError`] enum.
//!
//! # Examples
//!
//! ```
//! use peregrine::error::{PeregrineError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PeregrineError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Peregrine operations.
#[derive(Error, Debug)]
pub enum PeregrineError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Index-related errors
    #[error("Index error: {0}")]
    Index(String),

    /// Query-related errors (parsing, invalid queries, etc.)
    #[error("Query error: {0}")]
    Query(String),

    /// Embedding-related errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with PeregrineError.
pub type Result<T> = std::result::Result<T, PeregrineError>;

impl PeregrineError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        PeregrineError::Index(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        PeregrineError::Query(msg.into())
    }

    /// Create a new embedding error.
    pub fn embedding<S: Into<String>>(msg: S) -> Self {
        PeregrineError::Embedding(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PeregrineError::Other(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        PeregrineError::Other(format!("Invalid argument: {}", msg.into()))
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        PeregrineError::Other(format!("Internal error: {}", msg.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = PeregrineError::index("Test index error");
        assert_eq!(error.to_string(), "Index error: Test index error");

        let error = PeregrineError::query("Test query error");
        assert_eq!(error.to_string(), "Query error: Test query error");

        let error = PeregrineError::invalid_argument("bad alpha");
        assert_eq!(error.to_string(), "Error: Invalid argument: bad alpha");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let peregrine_error = PeregrineError::from(io_error);

        match peregrine_error {
            PeregrineError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
