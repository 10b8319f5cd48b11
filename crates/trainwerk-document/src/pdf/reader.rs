// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open documents and pull text from their internal text layer
// using the `lopdf` crate.

use std::path::Path;

use lopdf::Document;
use trainwerk_core::error::{ExtractionError, Result};
use tracing::{debug, info, instrument, warn};

use crate::detect::detect_document_type;

/// Source of a document's embedded text.
///
/// The orchestrator only sees this trait so that the fallback decision can be
/// exercised without real PDFs.
pub trait TextLayerSource: Send + Sync {
    /// Return the document's text, or [`ExtractionError::TextLayer`] when it
    /// has no recoverable text layer.
    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Reads existing PDF files.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            ExtractionError::TextLayer(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    // -- Extraction -----------------------------------------------------------

    /// Extract the text layer of every page, in page order.
    ///
    /// Pages whose content streams cannot be decoded are skipped with a
    /// warning. Fails when no page yields any non-whitespace text.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn extract_text(&self) -> Result<String> {
        let mut page_numbers: Vec<u32> = self.document.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();

        let mut text = String::new();
        let mut readable_pages = 0usize;

        for page_number in page_numbers {
            match self.document.extract_text(&[page_number]) {
                Ok(page_text) => {
                    readable_pages += 1;
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                    text.push_str(&page_text);
                }
                Err(err) => {
                    warn!(page_number, %err, "Skipping page with unreadable text layer");
                }
            }
        }

        if text.trim().is_empty() {
            return Err(ExtractionError::TextLayer(format!(
                "document has no text layer ({} of {} pages readable)",
                readable_pages,
                self.page_count()
            )));
        }

        debug!(chars = text.chars().count(), readable_pages, "Text layer extracted");
        Ok(text)
    }
}

/// [`TextLayerSource`] backed by [`PdfReader`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfTextLayer;

impl TextLayerSource for LopdfTextLayer {
    fn extract_text(&self, path: &Path) -> Result<String> {
        let doc_type = detect_document_type(path)?;
        if doc_type.is_image() {
            return Err(ExtractionError::TextLayer(format!(
                "image documents have no text layer ({})",
                doc_type.mime_type()
            )));
        }
        PdfReader::open(path)?.extract_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Build a one-page PDF whose content stream draws `lines` with Helvetica.
    fn pdf_with_text(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 750.into()]),
        ];
        for line in lines {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("Td", vec![0.into(), (-16).into()]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn extracts_text_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, pdf_with_text(&["Seance musculation", "Squat 3 x 10 60kg"])).unwrap();
        let reader = PdfReader::open(&path).unwrap();
        assert_eq!(reader.page_count(), 1);
        let text = reader.extract_text().unwrap();
        assert!(text.contains("musculation"), "got {text:?}");
        assert!(text.contains("Squat"), "got {text:?}");
    }

    #[test]
    fn page_without_text_is_text_layer_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.pdf");
        std::fs::write(&path, pdf_with_text(&[])).unwrap();
        let reader = PdfReader::open(&path).unwrap();
        let err = reader.extract_text().unwrap_err();
        assert_eq!(err.stage(), "text-layer");
    }

    #[test]
    fn garbage_bytes_are_text_layer_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.pdf");
        std::fs::write(&path, b"definitely not a pdf").unwrap();
        let err = PdfReader::open(&path).err().unwrap();
        assert_eq!(err.stage(), "text-layer");
    }

    #[test]
    fn image_documents_have_no_text_layer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        std::fs::write(&path, b"\x89PNG").unwrap();
        let err = LopdfTextLayer.extract_text(&path).unwrap_err();
        assert_eq!(err.stage(), "text-layer");
    }

    #[test]
    fn text_layer_source_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, pdf_with_text(&["Course 5 km"])).unwrap();
        let text = LopdfTextLayer.extract_text(&path).unwrap();
        assert!(text.contains("Course"));
    }
}
