// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Trainwerk. Every variant names the pipeline stage
// that produced it.

use thiserror::Error;

/// Top-level error type for all extraction stages.
#[derive(Debug, Error)]
pub enum ExtractionError {
    // -- Acquisition -----------------------------------------------------------
    #[error("text layer extraction failed: {0}")]
    TextLayer(String),

    #[error("page rasterization failed: {0}")]
    Rasterize(String),

    #[error("image enhancement failed: {0}")]
    Enhance(String),

    #[error("text recognition failed: {0}")]
    Recognize(String),

    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    // -- Terminal --------------------------------------------------------------
    #[error("no text could be extracted from the document")]
    NoText,

    #[error("extraction did not finish within {seconds}s")]
    Timeout { seconds: u64 },

    // -- Plumbing --------------------------------------------------------------
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExtractionError {
    /// Stage tag reported alongside the error (`"text-layer"`, `"no-text"`, ...).
    pub fn stage(&self) -> &'static str {
        match self {
            Self::TextLayer(_) => "text-layer",
            Self::Rasterize(_) => "rasterize",
            Self::Enhance(_) => "enhance",
            Self::Recognize(_) => "recognize",
            Self::UnsupportedDocument(_) => "unsupported",
            Self::NoText => "no-text",
            Self::Timeout { .. } => "timeout",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }

    /// Whether this error ends the run with `success = false`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::NoText | Self::Timeout { .. })
    }

    /// `"<stage>: <message>"`, the form stored in `ExtractionResult::errors`.
    pub fn to_error_entry(&self) -> String {
        format!("{}: {}", self.stage(), self)
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ExtractionError>;
