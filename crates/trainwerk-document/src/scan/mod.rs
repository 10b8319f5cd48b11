// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline: page enhancement and optical character recognition (OCR).

pub mod enhance;
pub mod recognize;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use enhance::{EnhanceOutcome, PageEnhancer};
pub use recognize::{PageRecognizer, RecognitionProfile, recognize_pages};

#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;
