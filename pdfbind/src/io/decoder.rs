//! Image decoding.
//!
//! Images are decoded with the `image` crate and flattened to 8 bits per
//! component: grayscale sources stay single-channel, everything else becomes
//! RGB. An alpha channel, when present, is split off so it can be embedded
//! as a soft mask.

use std::path::Path;

use image::{DynamicImage, ImageReader};

use crate::error::{PdfBindError, Result};

/// Color model of decoded pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    /// One byte per pixel.
    Gray,
    /// Three bytes per pixel.
    Rgb,
}

impl ColorModel {
    /// Number of components per pixel.
    pub fn components(&self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
        }
    }

    /// Name of the matching PDF device color space.
    pub fn pdf_color_space(&self) -> &'static str {
        match self {
            Self::Gray => "DeviceGray",
            Self::Rgb => "DeviceRGB",
        }
    }
}

/// A decoded raster image ready to be embedded.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Color model of `pixels`.
    pub color: ColorModel,
    /// Row-major pixel data, 8 bits per component.
    pub pixels: Vec<u8>,
    /// Row-major alpha values, one byte per pixel.
    pub alpha: Option<Vec<u8>>,
}

impl DecodedImage {
    fn from_dynamic(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let is_gray = !image.color().has_color();

        let alpha = image.color().has_alpha().then(|| {
            if is_gray {
                image
                    .to_luma_alpha8()
                    .pixels()
                    .map(|p| p.0[1])
                    .collect::<Vec<u8>>()
            } else {
                image.to_rgba8().pixels().map(|p| p.0[3]).collect()
            }
        });

        let (color, pixels) = if is_gray {
            (ColorModel::Gray, image.into_luma8().into_raw())
        } else {
            (ColorModel::Rgb, image.into_rgb8().into_raw())
        };

        Self {
            width,
            height,
            color,
            pixels,
            alpha,
        }
    }
}

/// Decodes image files from disk.
#[derive(Debug, Clone, Default)]
pub struct ImageDecoder;

impl ImageDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode the image at `path`.
    ///
    /// The format is sniffed from the file content, not the suffix.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::ImageDecodeError`] if the file cannot be read,
    /// its format is not supported, or its content is corrupt.
    pub fn decode(&self, path: &Path) -> Result<DecodedImage> {
        let image = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| PdfBindError::image_decode(path, e.to_string()))?
            .decode()
            .map_err(|e| PdfBindError::image_decode(path, e.to_string()))?;

        Ok(DecodedImage::from_dynamic(image))
    }

    /// Read the pixel dimensions of the image at `path` without decoding it.
    ///
    /// # Errors
    ///
    /// Same as [`decode`](Self::decode).
    pub fn dimensions(&self, path: &Path) -> Result<(u32, u32)> {
        ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| PdfBindError::image_decode(path, e.to_string()))?
            .into_dimensions()
            .map_err(|e| PdfBindError::image_decode(path, e.to_string()))
    }
}
