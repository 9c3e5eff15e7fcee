//! Error types for cv-bias-check
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for session and rating operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A decision was recorded after the session already holds every round
    #[error("Session is full: all {capacity} decisions already recorded")]
    SessionFull { capacity: usize },

    /// A report was requested before every round was rated
    #[error("Session incomplete: {collected} of {required} decisions recorded")]
    Incomplete { collected: usize, required: usize },

    /// A rating outside the scale was submitted
    #[error("Rating {value} is outside the scale {min}-{max}")]
    RatingOutOfRange { value: i64, min: u8, max: u8 },

    /// A rating was submitted while no profile was on screen
    #[error("No profile is waiting for a rating")]
    NoPendingProfile,
}

/// Error type for loading and validating profile tables
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error while reading or writing a config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for the expected schema
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A lookup table has no entries
    #[error("Table '{0}' must contain at least one entry")]
    EmptyTable(String),

    /// A table entry or name is empty or only whitespace
    #[error("Table '{0}' contains a blank entry")]
    BlankEntry(String),

    /// No bucket exists for one side of the name-origin partition
    #[error("At least one {0} name bucket is required")]
    MissingOrigin(&'static str),

    /// Refused to overwrite an existing file
    #[error("File already exists: {0}")]
    AlreadyExists(String),
}

/// Error type for exporting a finished session
#[derive(Debug, Error)]
pub enum ExportError {
    /// IO error during export
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization error
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// Export was written by a newer version of this crate
    #[error("Session export version {0} is newer than supported")]
    VersionTooNew(u32),
}

/// Top-level error type
#[derive(Debug, Error)]
pub enum BiasCheckError {
    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Export error
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Result type alias for library operations
pub type BiasResult<T> = Result<T, BiasCheckError>;
