//! Error types for detection operations.
//!
//! This module defines [`DetectError`], the error type used throughout the
//! crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Probe and extraction errors are expected outcomes. Collectors return them
//!   as values and the detector degrades the category to its default record.
//! - Persistence errors are logged and swallowed by the store.
//! - `UnknownCategory` and configuration errors are the only variants that
//!   reach callers of the detector.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for detection operations.
#[derive(Debug, Error)]
pub enum DetectError {
    /// The capability backing a probe does not exist on this host.
    #[error("Probe '{probe}' unavailable: {reason}")]
    ProbeUnavailable { probe: String, reason: String },

    /// The capability ran but reported an error.
    #[error("Probe '{probe}' failed: {reason}")]
    ProbeFailed { probe: String, reason: String },

    /// Probe output did not have the expected shape.
    #[error("No match for {field} in {category} output")]
    ExtractionMismatch { category: String, field: String },

    /// Reading or writing the cache file failed.
    #[error("Cache persistence failed at {path}: {message}")]
    Persistence { path: PathBuf, message: String },

    /// The cache file (or one of its entries) could not be decoded.
    #[error("Corrupt cache at {path}: {message}")]
    CacheCorrupt { path: PathBuf, message: String },

    /// No collector is registered for the requested category.
    #[error("Unknown category: {name}")]
    UnknownCategory { name: String },

    /// Failed to parse a configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A duration string such as "24h" could not be parsed.
    #[error("Invalid duration: {value}")]
    InvalidDuration { value: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DetectError {
    /// Whether this error is a probe-level outcome rather than a defect.
    pub fn is_probe_error(&self) -> bool {
        matches!(
            self,
            DetectError::ProbeUnavailable { .. } | DetectError::ProbeFailed { .. }
        )
    }
}

/// Result type alias for detection operations.
pub type Result<T> = std::result::Result<T, DetectError>;
