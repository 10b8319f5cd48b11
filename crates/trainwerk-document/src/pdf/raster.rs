// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterization: render each page of a document to a PNG inside a
// uniquely named temporary directory that is removed when the returned
// handle is dropped.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use trainwerk_core::DocumentType;
use trainwerk_core::error::{ExtractionError, Result};
use tracing::{debug, info, instrument, warn};

use crate::detect::detect_document_type;

const PAGE_PREFIX: &str = "page";

/// Rendered pages of one document.
///
/// Owns the scratch directory: every image in it, including enhanced copies
/// written next to the pages, is deleted when this value is dropped.
#[derive(Debug)]
pub struct RasterizedPages {
    dir: TempDir,
    pages: Vec<PathBuf>,
}

impl RasterizedPages {
    /// Wrap an existing scratch directory and its page images (in page order).
    pub fn new(dir: TempDir, pages: Vec<PathBuf>) -> Self {
        Self { dir, pages }
    }

    /// Allocate an empty, uniquely named scratch directory.
    pub fn scratch_dir() -> Result<TempDir> {
        tempfile::Builder::new()
            .prefix("trainwerk-pages-")
            .tempdir()
            .map_err(|err| {
                ExtractionError::Rasterize(format!("cannot create scratch directory: {}", err))
            })
    }

    /// Page image paths, in page order.
    pub fn pages(&self) -> &[PathBuf] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The scratch directory. Files placed here share its lifetime.
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// Converts a document into page images.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(&self, path: &Path, dpi: u32) -> Result<RasterizedPages>;
}

/// Renders PDFs with poppler's `pdftoppm`; image documents are copied in as
/// their single page.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: String,
}

impl PdftoppmRasterizer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn render_pdf(&self, path: &Path, dpi: u32, dir: &Path) -> Result<()> {
        info!(binary = %self.binary, dpi, "Rasterizing PDF pages");

        let output = Command::new(&self.binary)
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg(path)
            .arg(dir.join(PAGE_PREFIX))
            .output()
            .map_err(|err| {
                ExtractionError::Rasterize(format!("failed to run {}: {}", self.binary, err))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractionError::Rasterize(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn copy_image(&self, path: &Path, dir: &Path) -> Result<()> {
        let image = ::image::open(path).map_err(|err| {
            ExtractionError::Rasterize(format!("failed to decode {}: {}", path.display(), err))
        })?;
        let target = dir.join(format!("{PAGE_PREFIX}-1.png"));
        image.save(&target).map_err(|err| {
            ExtractionError::Rasterize(format!("failed to write {}: {}", target.display(), err))
        })?;
        Ok(())
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl PageRasterizer for PdftoppmRasterizer {
    #[instrument(skip(self), fields(path = %path.display()))]
    fn rasterize(&self, path: &Path, dpi: u32) -> Result<RasterizedPages> {
        let doc_type = detect_document_type(path)
            .map_err(|err| ExtractionError::Rasterize(err.to_string()))?;
        let dir = RasterizedPages::scratch_dir()?;

        match doc_type {
            DocumentType::Pdf => self.render_pdf(path, dpi, dir.path())?,
            DocumentType::Png | DocumentType::Jpeg | DocumentType::Tiff => {
                self.copy_image(path, dir.path())?
            }
        }

        let pages = collect_pages(dir.path())?;
        if pages.is_empty() {
            return Err(ExtractionError::Rasterize("no pages were rendered".into()));
        }

        debug!(pages = pages.len(), dir = %dir.path().display(), "Pages rasterized");
        Ok(RasterizedPages::new(dir, pages))
    }
}

/// List `page-N.png` files in `dir`, ordered by `N`.
///
/// `pdftoppm` zero-pads `N` to the width of the page count, so the number is
/// parsed rather than sorted as text.
fn collect_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut numbered = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("png") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        match page_number(stem) {
            Some(number) => numbered.push((number, path)),
            None => warn!(file = %path.display(), "Ignoring unexpected file in page directory"),
        }
    }
    numbered.sort_by_key(|(number, _)| *number);
    Ok(numbered.into_iter().map(|(_, path)| path).collect())
}

fn page_number(stem: &str) -> Option<u32> {
    stem.strip_prefix(PAGE_PREFIX)?
        .strip_prefix('-')?
        .parse()
        .ok()
}
