//! Error types for heatwatch operations.
//!
//! This module defines the main error type [`HeatwatchError`] which represents
//! every failure the library lets escape: transport faults while fetching a
//! listing page, persistence faults while reading or writing the table, decode
//! faults in the table itself, and configuration faults.
//!
//! Field-level and fragment-level extraction faults never show up here. Fields
//! fall back to their defaults and unparsable fragments are skipped by the
//! record assembler (see [`crate::listing::FragmentError`]).
//!
//! # Example
//!
//! ```rust
//! use heatwatch_core::{ErrorKind, HeatwatchError, summarize};
//!
//! match summarize("/nonexistent/heat_pumps.csv", 5) {
//!     Ok(summary) => println!("{} products", summary.total_products),
//!     Err(e) if e.kind() == ErrorKind::Persistence => println!("table unavailable: {}", e),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for heatwatch operations.
#[derive(Error, Debug)]
pub enum HeatwatchError {
    /// HTTP request errors from reqwest.
    ///
    /// This variant wraps network errors, DNS failures, connection issues,
    /// and other HTTP-related problems.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The listing page answered with a non-success status.
    #[error("Listing page returned HTTP status {status}")]
    HttpStatus { status: u16 },

    /// Request timeout.
    ///
    /// Returned when an HTTP request exceeds the configured timeout duration.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A listing selector could not be compiled.
    #[error("Invalid selector for {field}: {reason}")]
    InvalidSelector { field: &'static str, reason: String },

    /// File not found.
    ///
    /// Returned when reading a table or a saved page that doesn't exist.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Filesystem errors while reading or writing a table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structural CSV errors while encoding or decoding a table.
    ///
    /// This includes per-column conversion failures such as a non-numeric
    /// `Rating` cell.
    #[error("Table error: {0}")]
    Csv(#[from] csv::Error),

    /// Monitor configuration errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Coarse classification of a [`HeatwatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fetching the remote page failed.
    Transport,
    /// The table could not be read from or written to disk.
    Persistence,
    /// The table was readable but its contents could not be decoded.
    Decode,
    /// The monitor was configured with unusable values.
    Configuration,
}

impl HeatwatchError {
    /// Returns which kind of failure this error represents.
    pub fn kind(&self) -> ErrorKind {
        match self {
            #[cfg(feature = "fetch")]
            HeatwatchError::HttpError(_) => ErrorKind::Transport,
            HeatwatchError::HttpStatus { .. } | HeatwatchError::Timeout { .. } | HeatwatchError::InvalidUrl(_) => {
                ErrorKind::Transport
            }
            HeatwatchError::FileNotFound(_) | HeatwatchError::Io(_) => ErrorKind::Persistence,
            HeatwatchError::Csv(err) if err.is_io_error() => ErrorKind::Persistence,
            HeatwatchError::Csv(_) => ErrorKind::Decode,
            HeatwatchError::InvalidSelector { .. } | HeatwatchError::ConfigError(_) => ErrorKind::Configuration,
        }
    }
}

/// Result type alias for HeatwatchError.
pub type Result<T> = std::result::Result<T, HeatwatchError>;
