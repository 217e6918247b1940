// src/error.rs

//! Error types for debcollect

use thiserror::Error;

/// Errors raised by the collection and installation flows
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error on the output tree
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested package is unknown to the package index
    #[error("'{0}' not installed")]
    NotFound(String),

    /// Package is known but the index selects no installable version
    #[error("'{0}' has no candidate version")]
    NoCandidate(String),

    /// Output root entry that does not follow the layout convention
    #[error("invalid directory name: {0}")]
    InvalidDirectoryName(String),

    /// Package index query failed
    #[error("Package index error: {0}")]
    Index(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),

    /// Collection manifest could not be written
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// Archive glob failed
    #[error("Glob error: {0}")]
    Glob(String),
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
