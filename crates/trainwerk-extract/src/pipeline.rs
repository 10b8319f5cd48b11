// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction orchestrator: text layer first, OCR fallback when that text is
// too short, then entity extraction, assembly, normalization, and summary.
//
// `extract` never fails: every stage error becomes a warning, an entry in the
// result's error list, or the single terminal `no-text` failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use trainwerk_core::error::{ExtractionError, Result};
use trainwerk_core::{ExtractOptions, ExtractionConfig, ExtractionData, ExtractionResult};
use trainwerk_document::{
    LopdfTextLayer, PageEnhancer, PageRasterizer, PageRecognizer, PdftoppmRasterizer,
    ProgressObserver, RecognitionProfile, TextLayerSource, recognize_pages,
};
use tracing::{error, info, instrument, warn};

use crate::assembler::assemble_workouts;
use crate::normalize::normalize;
use crate::patterns::scan_entities;
use crate::summary::build_summary;

/// Whether the direct text is too short to stand on its own.
pub fn needs_ocr(direct_text: &str, min_text_length: usize) -> bool {
    direct_text.trim().chars().count() < min_text_length
}

/// Direct text first, then recognized text, one newline apart.
pub fn combine_texts(direct: &str, recognized: &str) -> String {
    match (direct.trim().is_empty(), recognized.trim().is_empty()) {
        (false, false) => format!("{direct}\n{recognized}"),
        (false, true) => direct.to_string(),
        (true, false) => recognized.to_string(),
        (true, true) => String::new(),
    }
}

/// Runs the whole pipeline for one document at a time.
///
/// Holds no per-run state, so one `Extractor` (behind an `Arc`) can serve
/// concurrent extractions.
pub struct Extractor {
    config: ExtractionConfig,
    profile: RecognitionProfile,
    text_layer: Box<dyn TextLayerSource>,
    rasterizer: Box<dyn PageRasterizer>,
    enhancer: PageEnhancer,
    recognizer: Box<dyn PageRecognizer>,
    observer: Option<Arc<dyn ProgressObserver>>,
}

impl Extractor {
    /// Build with the default lopdf, `pdftoppm`, and OCR components.
    pub fn new(config: ExtractionConfig) -> Self {
        Self {
            profile: RecognitionProfile::from_config(&config),
            text_layer: Box::new(LopdfTextLayer),
            rasterizer: Box::new(PdftoppmRasterizer::new(config.pdftoppm_binary.clone())),
            enhancer: PageEnhancer::from_config(&config),
            recognizer: default_recognizer(&config),
            observer: None,
            config,
        }
    }

    pub fn with_text_layer(mut self, text_layer: impl TextLayerSource + 'static) -> Self {
        self.text_layer = Box::new(text_layer);
        self
    }

    pub fn with_rasterizer(mut self, rasterizer: impl PageRasterizer + 'static) -> Self {
        self.rasterizer = Box::new(rasterizer);
        self
    }

    pub fn with_enhancer(mut self, enhancer: PageEnhancer) -> Self {
        self.enhancer = enhancer;
        self
    }

    pub fn with_recognizer(mut self, recognizer: impl PageRecognizer + 'static) -> Self {
        self.recognizer = Box::new(recognizer);
        self
    }

    pub fn with_observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract structured records from the document at `path`.
    ///
    /// `options` are carried for the caller's bookkeeping and do not change
    /// what is extracted.
    #[instrument(
        skip(self, options),
        fields(
            path = %path.display(),
            user_id = options.user_id.as_deref().unwrap_or("-"),
            preview = options.preview_mode,
        )
    )]
    pub fn extract(&self, path: &Path, options: &ExtractOptions) -> ExtractionResult {
        let filename = display_filename(path);
        let timestamp = Utc::now();
        let mut errors = Vec::new();

        info!(preserve_original = options.preserve_original, "Starting extraction");

        let raw_text = match self.text_layer.extract_text(path) {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, "Text layer unavailable; falling back to OCR");
                errors.push(err);
                String::new()
            }
        };

        let ocr_text = if needs_ocr(&raw_text, self.config.min_text_length) {
            info!(
                chars = raw_text.trim().chars().count(),
                threshold = self.config.min_text_length,
                "Direct text below threshold; running OCR"
            );
            match self.recognize_document(path) {
                Ok(text) => text,
                Err(err) => {
                    warn!(%err, "OCR fallback failed");
                    errors.push(err);
                    String::new()
                }
            }
        } else {
            String::new()
        };

        let combined = combine_texts(&raw_text, &ocr_text);
        if combined.trim().is_empty() {
            let terminal = ExtractionError::NoText;
            error!(errors = errors.len(), "{terminal}");
            errors.push(terminal);
            return ExtractionResult::failed(filename, timestamp, errors);
        }

        let data = build_data(raw_text, ocr_text, &combined, timestamp);
        info!(
            workouts = data.summary.workout_count,
            metrics = data.summary.metric_count,
            dates = data.dates.len(),
            "Extraction complete"
        );
        ExtractionResult::succeeded(filename, timestamp, data, errors)
    }

    /// Rasterize, enhance, and recognize every page.
    ///
    /// The page images live in a scratch directory owned by this call and are
    /// removed when it returns, whatever the outcome. Fails only when there
    /// were pages and none of them could be recognized.
    fn recognize_document(&self, path: &Path) -> Result<String> {
        let pages = self.rasterizer.rasterize(path, self.config.raster_dpi)?;
        let recognized = recognize_pages(
            &pages,
            &self.enhancer,
            self.recognizer.as_ref(),
            &self.profile,
            self.observer.as_deref(),
        );
        if recognized.pages_total > 0 && recognized.pages_skipped == recognized.pages_total {
            return Err(ExtractionError::Recognize(format!(
                "none of the {} pages could be recognized",
                recognized.pages_total
            )));
        }
        Ok(recognized.text)
    }

    /// [`extract`](Self::extract) on the tokio blocking pool.
    pub async fn extract_async(
        self: Arc<Self>,
        path: impl Into<PathBuf>,
        options: ExtractOptions,
    ) -> ExtractionResult {
        let path = path.into();
        let filename = display_filename(&path);
        let task = tokio::task::spawn_blocking(move || self.extract(&path, &options));
        match task.await {
            Ok(result) => result,
            Err(join_err) => task_failed(filename, join_err),
        }
    }

    /// [`extract_async`](Self::extract_async) with a deadline.
    ///
    /// On expiry a `timeout` failure is returned at once. The blocking task
    /// keeps running to completion and releases its scratch directory then.
    pub async fn extract_with_timeout(
        self: Arc<Self>,
        path: impl Into<PathBuf>,
        options: ExtractOptions,
        limit: Duration,
    ) -> ExtractionResult {
        let path = path.into();
        let filename = display_filename(&path);
        let task = tokio::task::spawn_blocking(move || self.extract(&path, &options));
        match tokio::time::timeout(limit, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => task_failed(filename, join_err),
            Err(_) => {
                let err = ExtractionError::Timeout {
                    seconds: limit.as_secs(),
                };
                warn!(%err, "Extraction abandoned");
                ExtractionResult::failed(filename, Utc::now(), vec![err])
            }
        }
    }
}

fn build_data(
    raw_text: String,
    ocr_text: String,
    combined: &str,
    timestamp: DateTime<Utc>,
) -> ExtractionData {
    let entities = scan_entities(combined, timestamp);
    let workouts = assemble_workouts(combined);
    let normalized = normalize(workouts, entities.metrics, entities.dates);
    let summary = build_summary(&normalized.workouts, &normalized.metrics, &normalized.dates);

    ExtractionData {
        raw_text,
        ocr_text,
        workouts: normalized.workouts,
        metrics: normalized.metrics,
        dates: normalized.dates,
        summary,
    }
}

fn display_filename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn task_failed(filename: String, join_err: tokio::task::JoinError) -> ExtractionResult {
    let err = ExtractionError::Io(std::io::Error::other(format!(
        "extraction task failed: {join_err}"
    )));
    error!(%err, "Extraction task did not complete");
    ExtractionResult::failed(filename, Utc::now(), vec![err])
}

#[cfg(feature = "ocr")]
fn default_recognizer(config: &ExtractionConfig) -> Box<dyn PageRecognizer> {
    match trainwerk_document::OcrEngine::from_extraction_config(config) {
        Ok(engine) => Box::new(engine),
        Err(err) => {
            warn!(%err, "OCR engine unavailable; scanned documents will yield no text");
            Box::new(trainwerk_document::UnavailableRecognizer)
        }
    }
}

#[cfg(not(feature = "ocr"))]
fn default_recognizer(_config: &ExtractionConfig) -> Box<dyn PageRecognizer> {
    Box::new(trainwerk_document::UnavailableRecognizer)
}
