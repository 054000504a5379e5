// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Bildwerk.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Dimensions;

/// Top-level error type for all Bildwerk operations.
///
/// Everything here is fatal for the current run. Recoverable per-item
/// problems (unpaired masks, size mismatches) are logged and never surface
/// as an error.
#[derive(Debug, Error)]
pub enum BildwerkError {
    // -- External extractor --
    #[error("failed to launch extractor `{program}`: {source}")]
    ExtractorSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("extractor `{program}` exited with {status}: {stderr}")]
    ExtractorFailed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("extractor listing is not valid UTF-8: {0}")]
    ListingEncoding(#[from] std::string::FromUtf8Error),

    #[error("{} does not name a usable output folder", path.display())]
    InvalidPdfName { path: PathBuf },

    // -- Image errors --
    #[error("unreadable image {}: {reason}", path.display())]
    UnreadableImage { path: PathBuf, reason: String },

    #[error("image size mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        expected: Dimensions,
        actual: Dimensions,
    },

    #[error("failed to write image {}: {reason}", path.display())]
    ImageWrite { path: PathBuf, reason: String },

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BildwerkError>;
