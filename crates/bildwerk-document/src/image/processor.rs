// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, luminance extraction, alpha compositing, and PNG
// output for extracted PDF images. Operates on in-memory images using the
// `image` crate.

use std::path::Path;

use bildwerk_core::error::{BildwerkError, Result};
use bildwerk_core::{Dimensions, ImageExtension};
use image::{DynamicImage, GrayImage, ImageFormat, ImageReader};
use tracing::{debug, instrument};

use super::jp2;

/// A single decoded image.
///
/// ```ignore
/// let alpha = ImageProcessor::open("book-005.png")?.luminance();
/// ImageProcessor::open("book-004.jpg")?
///     .with_alpha(&alpha)?
///     .save_png("book-004.png")?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode an image file. The format is sniffed from the content, falling
    /// back to the extension. `.jp2` files are decoded by OpenJPEG.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if ImageExtension::from_path(path) == Some(ImageExtension::Jp2) {
            let processor = Self::from_dynamic(jp2::decode(path)?);
            debug!(width = processor.width(), height = processor.height(), "JPEG 2000 image loaded");
            return Ok(processor);
        }
        let img = ImageReader::open(path)
            .map_err(|err| unreadable(path, err))?
            .with_guessed_format()
            .map_err(|err| unreadable(path, err))?
            .decode()
            .map_err(|err| unreadable(path, err))?;
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

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Single-channel 8-bit luminance of the image.
    pub fn luminance(&self) -> GrayImage {
        self.image.to_luma8()
    }

    /// Replace the alpha channel with `alpha`.
    ///
    /// Grayscale images become gray+alpha; everything else becomes RGBA.
    /// `alpha` must have exactly the image's dimensions.
    #[instrument(skip_all)]
    pub fn with_alpha(self, alpha: &GrayImage) -> Result<Self> {
        let expected = self.dimensions();
        let actual = Dimensions::new(alpha.width(), alpha.height());
        if expected != actual {
            return Err(BildwerkError::DimensionMismatch { expected, actual });
        }

        let image = match &self.image {
            DynamicImage::ImageLuma8(_)
            | DynamicImage::ImageLumaA8(_)
            | DynamicImage::ImageLuma16(_)
            | DynamicImage::ImageLumaA16(_) => {
                let mut gray = self.image.to_luma_alpha8();
                for (pixel, mask) in gray.pixels_mut().zip(alpha.pixels()) {
                    pixel.0[1] = mask.0[0];
                }
                DynamicImage::ImageLumaA8(gray)
            }
            _ => {
                let mut rgba = self.image.to_rgba8();
                for (pixel, mask) in rgba.pixels_mut().zip(alpha.pixels()) {
                    pixel.0[3] = mask.0[0];
                }
                DynamicImage::ImageRgba8(rgba)
            }
        };
        debug!(color = ?image.color(), "Alpha channel applied");
        Ok(Self { image })
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image as PNG regardless of the path's extension.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|err| BildwerkError::ImageWrite {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })
    }
}

/// Read pixel dimensions without decoding pixel data.
///
/// JPEG 2000 files go through the JP2 header parser; everything else through
/// the `image` crate's header parsers.
pub fn read_dimensions(path: &Path) -> Result<Dimensions> {
    if ImageExtension::from_path(path) == Some(ImageExtension::Jp2) {
        let data = std::fs::read(path).map_err(|err| unreadable(path, err))?;
        return jp2::dimensions(&data).ok_or_else(|| BildwerkError::UnreadableImage {
            path: path.to_path_buf(),
            reason: "no JPEG 2000 image header found".into(),
        });
    }

    let (width, height) = ImageReader::open(path)
        .map_err(|err| unreadable(path, err))?
        .with_guessed_format()
        .map_err(|err| unreadable(path, err))?
        .into_dimensions()
        .map_err(|err| unreadable(path, err))?;
    Ok(Dimensions::new(width, height))
}

pub(crate) fn unreadable(path: &Path, err: impl std::fmt::Display) -> BildwerkError {
    BildwerkError::UnreadableImage {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
