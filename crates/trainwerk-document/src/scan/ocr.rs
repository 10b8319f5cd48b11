// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR engine for Trainwerk, backed by the pure-Rust `ocrs` crate with neural
// network models executed via `rten`.
//
// # Feature Gate
//
// This module is only available when the `ocr` feature is enabled:
//
// ```toml
// trainwerk-document = { path = "crates/trainwerk-document", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The engine needs `text-detection.rten` and `text-recognition.rten`. Running
// `ocrs-cli` once downloads both to `$XDG_CACHE_HOME/ocrs` (typically
// `~/.cache/ocrs`), which is where they are looked up by default.

use std::path::{Path, PathBuf};

use ::image::DynamicImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use trainwerk_core::ExtractionConfig;
use trainwerk_core::error::{ExtractionError, Result};
use tracing::{debug, info, instrument};

use crate::scan::recognize::{PageRecognizer, RecognitionProfile};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// `$XDG_CACHE_HOME/ocrs`, falling back to `~/.cache/ocrs`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Locations of the two model files.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Expects `dir` to contain `text-detection.rten` and `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    pub fn from_extraction_config(config: &ExtractionConfig) -> Self {
        match &config.ocr_model_dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::default(),
        }
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(ExtractionError::Recognize(format!(
                    "OCR model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// OCR engine. Model loading is the expensive step, so build one engine and
/// reuse it for every page.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    /// Load models from the paths given in `config`.
    ///
    /// **Important:** `ocrs` and `rten` must be compiled in release mode;
    /// debug builds are 10-100x slower.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;

        info!("Loading OCR models");
        let detection_model = Model::load_file(&config.detection_model_path).map_err(|err| {
            ExtractionError::Recognize(format!(
                "failed to load detection model from {}: {}",
                config.detection_model_path.display(),
                err
            ))
        })?;
        let recognition_model =
            Model::load_file(&config.recognition_model_path).map_err(|err| {
                ExtractionError::Recognize(format!(
                    "failed to load recognition model from {}: {}",
                    config.recognition_model_path.display(),
                    err
                ))
            })?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| {
            ExtractionError::Recognize(format!("failed to initialise OCR engine: {}", err))
        })?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }

    pub fn from_extraction_config(config: &ExtractionConfig) -> Result<Self> {
        Self::new(OcrConfig::from_extraction_config(config))
    }

    /// Recognize all text in an image, lines separated by `\n`.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn recognize_text(&self, image: &DynamicImage) -> Result<String> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            ExtractionError::Recognize(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;

        let input = self.engine.prepare_input(source).map_err(|err| {
            ExtractionError::Recognize(format!("OCR preprocessing failed: {}", err))
        })?;

        let text = self.engine.get_text(&input).map_err(|err| {
            ExtractionError::Recognize(format!("OCR text recognition failed: {}", err))
        })?;

        debug!(lines = text.lines().count(), chars = text.len(), "OCR pass complete");
        Ok(text)
    }
}

impl PageRecognizer for OcrEngine {
    fn recognize(&self, page: &Path, profile: &RecognitionProfile) -> Result<String> {
        // ocrs models are alphabet-based, not per-language; the profile is
        // recorded for diagnostics only.
        debug!(languages = %profile.language_spec(), page = %page.display(), "Recognizing page");
        let decoded = ::image::open(page).map_err(|err| {
            ExtractionError::Recognize(format!("failed to open {}: {}", page.display(), err))
        })?;
        self.recognize_text(&decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_from_dir() {
        let config = OcrConfig::from_dir("/tmp/my-models");
        assert_eq!(
            config.detection_model_path,
            PathBuf::from("/tmp/my-models/text-detection.rten")
        );
        assert_eq!(
            config.recognition_model_path,
            PathBuf::from("/tmp/my-models/text-recognition.rten")
        );
    }

    #[test]
    fn config_follows_extraction_config() {
        let extraction = ExtractionConfig {
            ocr_model_dir: Some(PathBuf::from("/srv/models")),
            ..ExtractionConfig::default()
        };
        let config = OcrConfig::from_extraction_config(&extraction);
        assert!(config.detection_model_path.starts_with("/srv/models"));
    }

    #[test]
    fn validate_missing_models() {
        let err = OcrConfig::from_dir("/nonexistent/path/ocr-models").validate().unwrap_err();
        assert_eq!(err.stage(), "recognize");
    }
}
