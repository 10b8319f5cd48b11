// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// trainwerk-document: Text acquisition for the Trainwerk extraction pipeline.
//
// Provides the direct text-layer reader (lopdf), page rasterization into a
// scoped temporary directory, the page enhancement filter chain, and the
// recognition adapter (ocrs, behind the `ocr` feature).

pub mod detect;
pub mod image;
pub mod pdf;
pub mod scan;

// Re-export the primary items so callers can use `trainwerk_document::PdfReader` etc.
pub use detect::detect_document_type;
pub use self::image::processor::ImageProcessor;
pub use pdf::raster::{PageRasterizer, PdftoppmRasterizer, RasterizedPages};
pub use pdf::reader::{LopdfTextLayer, PdfReader, TextLayerSource};
pub use scan::enhance::{EnhanceOutcome, PageEnhancer};
pub use scan::recognize::{
    PageRecognizer, ProgressObserver, RecognitionPhase, RecognitionProfile, RecognitionProgress,
    RecognizedText, UnavailableRecognizer, recognize_pages,
};

#[cfg(feature = "ocr")]
pub use scan::ocr::OcrEngine;
