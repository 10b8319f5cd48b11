// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: greyscale conversion, contrast normalization, sharpening,
// and fixed-threshold binarization. Operates on in-memory images using the
// `image` and `imageproc` crates.

use image::{DynamicImage, GrayImage};
use imageproc::filter::sharpen3x3;
use trainwerk_core::error::{ExtractionError, Result};
use tracing::{debug, instrument};

/// Image processing pipeline operating on a single in-memory page.
///
/// Each method consumes `self` and returns a new `ImageProcessor` wrapping the
/// transformed image, enabling method chaining.
///
/// ```ignore
/// ImageProcessor::open("page-1.png")?
///     .grayscale()
///     .normalize_contrast()
///     .sharpen()
///     .binarize(128)
///     .save("enhanced-1.png")?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            ExtractionError::Enhance(format!("failed to open {}: {}", path.as_ref().display(), err))
        })?;
        debug!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Filters (consume self, return new Self) ------------------------------

    /// Convert the image to 8-bit greyscale (luma).
    pub fn grayscale(self) -> Self {
        Self {
            image: DynamicImage::ImageLuma8(self.image.to_luma8()),
        }
    }

    /// Stretch the luma range linearly so the darkest pixel maps to 0 and the
    /// brightest to 255. Uniform images are returned unchanged.
    pub fn normalize_contrast(self) -> Self {
        let mut gray = self.image.to_luma8();
        let (min, max) = luma_range(&gray);
        if max <= min {
            return Self {
                image: DynamicImage::ImageLuma8(gray),
            };
        }

        let span = f32::from(max - min);
        for pixel in gray.pixels_mut() {
            let stretched = f32::from(pixel.0[0] - min) * 255.0 / span;
            pixel.0[0] = stretched.round().clamp(0.0, 255.0) as u8;
        }
        debug!(min, max, "Contrast normalized");

        Self {
            image: DynamicImage::ImageLuma8(gray),
        }
    }

    /// Sharpen edges with a 3x3 Laplacian kernel.
    pub fn sharpen(self) -> Self {
        let gray = self.image.to_luma8();
        Self {
            image: DynamicImage::ImageLuma8(sharpen3x3(&gray)),
        }
    }

    /// Pixels darker than `threshold` become black, all others white.
    pub fn binarize(self, threshold: u8) -> Self {
        let mut gray = self.image.to_luma8();
        for pixel in gray.pixels_mut() {
            pixel.0[0] = if pixel.0[0] < threshold { 0 } else { 255 };
        }
        Self {
            image: DynamicImage::ImageLuma8(gray),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            ExtractionError::Enhance(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

/// Darkest and brightest luma values. `(255, 0)` for an empty image.
fn luma_range(gray: &GrayImage) -> (u8, u8) {
    gray.pixels()
        .fold((u8::MAX, u8::MIN), |(min, max), pixel| {
            (min.min(pixel.0[0]), max.max(pixel.0[0]))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    fn gradient(width: u32, low: u8, high: u8) -> GrayImage {
        GrayImage::from_fn(width, 1, |x, _| {
            let step = (high - low) as u32 * x / (width - 1);
            Luma([low + step as u8])
        })
    }

    #[test]
    fn grayscale_produces_luma8() {
        let rgb = RgbImage::from_pixel(4, 4, Rgb([200, 10, 10]));
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(rgb)).grayscale();
        assert!(matches!(out.as_dynamic(), DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn normalize_contrast_stretches_to_full_range() {
        let img = DynamicImage::ImageLuma8(gradient(11, 100, 150));
        let out = ImageProcessor::from_dynamic(img).normalize_contrast().into_dynamic().to_luma8();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(10, 0).0[0], 255);
    }

    #[test]
    fn normalize_contrast_leaves_uniform_image() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 5, Luma([90])));
        let out = ImageProcessor::from_dynamic(img).normalize_contrast().into_dynamic().to_luma8();
        assert!(out.pixels().all(|p| p.0[0] == 90));
    }

    #[test]
    fn binarize_uses_fixed_threshold() {
        let img = DynamicImage::ImageLuma8(gradient(256, 0, 255));
        let out = ImageProcessor::from_dynamic(img).binarize(128).into_dynamic().to_luma8();
        assert_eq!(out.get_pixel(127, 0).0[0], 0);
        assert_eq!(out.get_pixel(128, 0).0[0], 255);
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn sharpen_keeps_dimensions() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(30, 20, Luma([128])));
        let out = ImageProcessor::from_dynamic(img).sharpen();
        assert_eq!((out.width(), out.height()), (30, 20));
    }

    #[test]
    fn open_missing_file_is_enhance_error() {
        let err = ImageProcessor::open("/nonexistent/page-1.png").err().unwrap();
        assert_eq!(err.stage(), "enhance");
    }
}
