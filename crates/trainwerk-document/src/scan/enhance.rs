// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page enhancement: the fixed filter chain applied to every rasterized page
// before recognition: greyscale, contrast normalization, sharpening,
// binarization.

use std::path::Path;

use trainwerk_core::ExtractionConfig;
use trainwerk_core::error::{ExtractionError, Result};
use tracing::{debug, info, instrument, warn};

use crate::image::processor::ImageProcessor;

/// What [`PageEnhancer::enhance_page`] wrote to the output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhanceOutcome {
    /// The filtered page.
    Enhanced,
    /// A byte copy of the input, because filtering failed.
    CopiedOriginal { reason: String },
}

/// Prepares page images for recognition.
#[derive(Debug, Clone)]
pub struct PageEnhancer {
    /// Luma threshold for the final binarization step.
    binarize_threshold: u8,
    /// Whether the sharpening step runs.
    sharpen: bool,
}

impl PageEnhancer {
    pub fn new(binarize_threshold: u8, sharpen: bool) -> Self {
        Self {
            binarize_threshold,
            sharpen,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.binarize_threshold, config.sharpen)
    }

    /// Run the filter chain on `input` and write the result to `output`.
    ///
    /// Any failure while decoding, filtering, or encoding falls back to
    /// copying `input` unchanged; only a failing copy is an error.
    #[instrument(skip(self), fields(input = %input.display()))]
    pub fn enhance_page(&self, input: &Path, output: &Path) -> Result<EnhanceOutcome> {
        match self.apply_filters(input, output) {
            Ok(()) => {
                debug!(output = %output.display(), "Page enhanced");
                Ok(EnhanceOutcome::Enhanced)
            }
            Err(err) => {
                warn!(%err, "Enhancement failed; recognizing the original page");
                std::fs::copy(input, output).map_err(|copy_err| {
                    ExtractionError::Enhance(format!(
                        "enhancement failed ({}) and copying the original failed: {}",
                        err, copy_err
                    ))
                })?;
                Ok(EnhanceOutcome::CopiedOriginal {
                    reason: err.to_string(),
                })
            }
        }
    }

    fn apply_filters(&self, input: &Path, output: &Path) -> Result<()> {
        let processor = ImageProcessor::open(input)?;
        info!(
            width = processor.width(),
            height = processor.height(),
            "Enhancing page"
        );

        let processor = processor.grayscale().normalize_contrast();
        let processor = if self.sharpen {
            processor.sharpen()
        } else {
            processor
        };
        processor.binarize(self.binarize_threshold).save(output)
    }
}

impl Default for PageEnhancer {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}
