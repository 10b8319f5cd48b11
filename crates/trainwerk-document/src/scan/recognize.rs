// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Recognition adapter: the seam between the pipeline and an OCR engine,
// plus the per-document loop that enhances and recognizes each page in order.

use std::path::Path;

use trainwerk_core::ExtractionConfig;
use trainwerk_core::error::{ExtractionError, Result};
use tracing::{debug, info, instrument, warn};

use crate::pdf::raster::RasterizedPages;
use crate::scan::enhance::PageEnhancer;

/// Languages the recognition engine should expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionProfile {
    pub languages: Vec<String>,
}

impl RecognitionProfile {
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            languages: config.languages.clone(),
        }
    }

    /// Tesseract-style `fra+eng` form, used in logs.
    pub fn language_spec(&self) -> String {
        self.languages.join("+")
    }
}

impl Default for RecognitionProfile {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

/// Runs one recognition pass over one page image.
pub trait PageRecognizer: Send + Sync {
    fn recognize(&self, image: &Path, profile: &RecognitionProfile) -> Result<String>;
}

/// Stand-in used when the crate is built without the `ocr` feature.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableRecognizer;

impl PageRecognizer for UnavailableRecognizer {
    fn recognize(&self, _image: &Path, _profile: &RecognitionProfile) -> Result<String> {
        Err(ExtractionError::Recognize(
            "OCR support is not compiled in (enable the `ocr` feature)".into(),
        ))
    }
}

/// Where a page is in its recognition pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionPhase {
    Started,
    Finished { chars: usize },
    Failed { reason: String },
}

/// One progress event. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionProgress {
    pub page: usize,
    pub total_pages: usize,
    pub phase: RecognitionPhase,
}

/// Receives recognition progress. Implemented for any matching closure.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, progress: &RecognitionProgress);
}

impl<F> ProgressObserver for F
where
    F: Fn(&RecognitionProgress) + Send + Sync,
{
    fn on_progress(&self, progress: &RecognitionProgress) {
        self(progress)
    }
}

/// Concatenated recognition output for a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizedText {
    pub text: String,
    pub pages_total: usize,
    pub pages_recognized: usize,
    pub pages_skipped: usize,
}

/// Line inserted before each page with text, except the first.
pub fn page_marker(page: usize) -> String {
    format!("\n\n--- page {page} ---\n\n")
}

/// Enhance and recognize every page, in page order.
///
/// A page whose enhancement or recognition fails is logged and skipped.
/// Pages that yield only whitespace contribute nothing.
/// Enhanced images are written into the pages' scratch directory.
#[instrument(skip_all, fields(pages = pages.len(), languages = %profile.language_spec()))]
pub fn recognize_pages(
    pages: &RasterizedPages,
    enhancer: &PageEnhancer,
    recognizer: &dyn PageRecognizer,
    profile: &RecognitionProfile,
    observer: Option<&dyn ProgressObserver>,
) -> RecognizedText {
    let total_pages = pages.len();
    let mut result = RecognizedText {
        pages_total: total_pages,
        ..RecognizedText::default()
    };
    let notify = |page: usize, phase: RecognitionPhase| {
        if let Some(observer) = observer {
            observer.on_progress(&RecognitionProgress {
                page,
                total_pages,
                phase,
            });
        }
    };

    info!(total_pages, "Starting recognition");

    for (index, page_path) in pages.pages().iter().enumerate() {
        let page = index + 1;
        notify(page, RecognitionPhase::Started);

        let enhanced = pages.dir().join(format!("enhanced-{page}.png"));
        let page_text = enhancer
            .enhance_page(page_path, &enhanced)
            .and_then(|_| recognizer.recognize(&enhanced, profile));

        match page_text {
            Ok(text) => {
                let chars = text.trim().chars().count();
                if chars == 0 {
                    debug!(page, "Page has no recognizable text");
                } else {
                    debug!(page, chars, "Page recognized");
                    if !result.text.is_empty() {
                        result.text.push_str(&page_marker(page));
                    }
                    result.text.push_str(&text);
                }
                result.pages_recognized += 1;
                notify(page, RecognitionPhase::Finished { chars });
            }
            Err(err) => {
                warn!(page, %err, "Skipping page that failed recognition");
                result.pages_skipped += 1;
                notify(
                    page,
                    RecognitionPhase::Failed {
                        reason: err.to_string(),
                    },
                );
            }
        }
    }

    info!(
        recognized = result.pages_recognized,
        skipped = result.pages_skipped,
        "Recognition complete"
    );
    result
}
