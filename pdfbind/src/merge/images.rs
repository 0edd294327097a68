//! Turning images into pages.

use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::io::ImageDecoder;
use crate::layout::{PageLayout, Placement};
use crate::merge::document::OutputDocument;

/// Draws one image per page, scaled to fit inside the page margins.
#[derive(Debug, Clone, Default)]
pub struct ImageComposer {
    decoder: ImageDecoder,
}

impl ImageComposer {
    /// Create a new image composer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the image at `path` to `output` as a single new page.
    ///
    /// The page has the output's default size. The image is scaled
    /// uniformly to fit the area inside the margins, centered horizontally,
    /// and placed at the top of that area. Returns the placement used.
    ///
    /// # Errors
    ///
    /// - [`PdfBindError::ImageDecodeError`](crate::PdfBindError::ImageDecodeError)
    ///   if the file cannot be decoded.
    /// - [`PdfBindError::InvalidDimensions`](crate::PdfBindError::InvalidDimensions)
    ///   if the image has no area.
    ///
    /// No page is added on error.
    pub fn compose(&self, path: &Path, output: &mut OutputDocument) -> Result<Placement> {
        let image = self.decoder.decode(path)?;
        let (width, height) = (image.width, image.height);
        let placement = output.layout().place(width as f32, height as f32)?;

        output.append_image_page(image, &placement)?;

        debug!(
            path = %path.display(),
            width,
            height,
            scale = placement.scale,
            "placed image"
        );

        Ok(placement)
    }

    /// Compute where the image at `path` would be drawn, without decoding
    /// its pixels. Returns the pixel size along with the placement.
    ///
    /// # Errors
    ///
    /// Same as [`compose`](Self::compose).
    pub fn plan(&self, path: &Path, layout: &PageLayout) -> Result<((u32, u32), Placement)> {
        let (width, height) = self.decoder.dimensions(path)?;
        let placement = layout.place(width as f32, height as f32)?;
        Ok(((width, height), placement))
    }
}
