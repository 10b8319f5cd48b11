// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document type detection: file extension first, magic bytes second.

use std::io::Read;
use std::path::Path;

use trainwerk_core::DocumentType;
use trainwerk_core::error::{ExtractionError, Result};
use tracing::debug;

/// Decide how a document should be read.
///
/// A known extension wins. Otherwise the first bytes are sniffed; a file that
/// matches neither is rejected as [`ExtractionError::UnsupportedDocument`].
pub fn detect_document_type(path: &Path) -> Result<DocumentType> {
    if let Some(doc_type) = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentType::from_extension)
    {
        return Ok(doc_type);
    }

    let mut header = [0u8; 8];
    let mut file = std::fs::File::open(path)?;
    let read = file.read(&mut header)?;

    match DocumentType::sniff(&header[..read]) {
        Some(doc_type) => {
            debug!(path = %path.display(), ?doc_type, "Document type sniffed from content");
            Ok(doc_type)
        }
        None => Err(ExtractionError::UnsupportedDocument(format!(
            "{} is neither a PDF nor an image",
            path.display()
        ))),
    }
}
