//! Crate error type for embedders.
//!
//! Use [`FrameError`] when you want to map typedframe and Polars errors to a
//! single type (e.g. for FFI or CLI) without depending on Polars error types.
//! Row conversion failures carry enough detail (expected vs. actual arity or
//! type) to diagnose a stale or incorrect schema assertion.

use polars::error::PolarsError;
use std::fmt;

/// Unified error type for typedframe operations.
#[derive(Debug)]
pub enum FrameError {
    /// Row length does not match the record's column count.
    Arity { expected: usize, actual: usize },
    /// A cell value could not be converted to its declared type.
    Cell {
        /// Zero-based column position of the offending cell.
        index: usize,
        /// Field name in the target record.
        field: String,
        /// Declared type the cell was expected to be.
        expected: String,
        /// Rendering of the value actually found.
        actual: String,
    },
    /// A wrapped engine frame does not match the record's schema.
    Schema(String),
    /// Resource not found (column, table, file).
    NotFound(String),
    /// User-facing error (invalid input, unsupported operation).
    User(String),
    /// I/O error (file not found, permission, etc.).
    Io(String),
    /// Failure inside the underlying engine, message propagated as-is.
    Engine(String),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Arity { expected, actual } => {
                write!(
                    f,
                    "row arity mismatch: expected {expected} cells, got {actual}"
                )
            }
            FrameError::Cell {
                index,
                field,
                expected,
                actual,
            } => write!(
                f,
                "cell {index} ('{field}'): expected {expected}, got {actual}"
            ),
            FrameError::Schema(s) => write!(f, "schema mismatch: {s}"),
            FrameError::NotFound(s) => write!(f, "not found: {s}"),
            FrameError::User(s) => write!(f, "user error: {s}"),
            FrameError::Io(s) => write!(f, "io error: {s}"),
            FrameError::Engine(s) => write!(f, "engine error: {s}"),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<PolarsError> for FrameError {
    fn from(e: PolarsError) -> Self {
        let msg = e.to_string();
        match &e {
            PolarsError::ColumnNotFound(_) => FrameError::NotFound(msg),
            PolarsError::InvalidOperation(_) => FrameError::User(msg),
            PolarsError::IO { .. } => FrameError::Io(msg),
            _ => FrameError::Engine(msg),
        }
    }
}

impl From<serde_json::Error> for FrameError {
    fn from(e: serde_json::Error) -> Self {
        FrameError::Engine(e.to_string())
    }
}

impl From<std::io::Error> for FrameError {
    fn from(e: std::io::Error) -> Self {
        FrameError::Io(e.to_string())
    }
}
