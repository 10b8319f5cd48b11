// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction configuration and per-call options.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Pipeline settings. Every field has a default, so partial JSON files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Direct text shorter than this (trimmed, in chars) triggers the OCR fallback.
    pub min_text_length: usize,
    /// Rasterization resolution in dots per inch.
    pub raster_dpi: u32,
    /// Fixed luma threshold for binarization.
    pub binarize_threshold: u8,
    /// Apply the sharpening filter before binarization.
    pub sharpen: bool,
    /// Recognition profile languages (ISO 639-2).
    pub languages: Vec<String>,
    /// Executable used to rasterize PDF pages.
    pub pdftoppm_binary: String,
    /// Directory holding the OCR models. `None` uses the default cache dir.
    pub ocr_model_dir: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_length: 100,
            raster_dpi: 300,
            binarize_threshold: 128,
            sharpen: true,
            languages: vec!["fra".into(), "eng".into()],
            pdftoppm_binary: "pdftoppm".into(),
            ocr_model_dir: None,
        }
    }
}

impl ExtractionConfig {
    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Caller-supplied options. The pipeline behaves identically for every value;
/// they are carried for the caller's own post-processing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractOptions {
    pub user_id: Option<String>,
    /// Keep the uploaded document after extraction.
    pub preserve_original: bool,
    /// Results are for display only and should not be persisted.
    pub preview_mode: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.min_text_length, 100);
        assert_eq!(config.raster_dpi, 300);
        assert_eq!(config.languages, vec!["fra".to_string(), "eng".to_string()]);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ExtractionConfig = serde_json::from_str(r#"{"min_text_length": 20}"#).unwrap();
        assert_eq!(config.min_text_length, 20);
        assert_eq!(config.raster_dpi, 300);
        assert!(config.sharpen);
    }

    #[test]
    fn options_use_camel_case() {
        let options: ExtractOptions =
            serde_json::from_str(r#"{"userId": "u-1", "previewMode": true}"#).unwrap();
        assert_eq!(options.user_id.as_deref(), Some("u-1"));
        assert!(options.preview_mode);
        assert!(!options.preserve_original);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ExtractionConfig::load("/nonexistent/trainwerk.json").unwrap_err();
        assert_eq!(err.stage(), "io");
    }
}
