//! Page geometry and image placement.
//!
//! All lengths are PDF points (1/72 inch). Placement is a pure computation:
//! an image is scaled uniformly to fit the usable area of a page (the page
//! minus its margins) and centered horizontally. Vertically the image sits at
//! the top of the usable area.

use std::str::FromStr;

use anyhow::{Context, bail};
use serde::Serialize;

use crate::error::{PdfBindError, Result};

/// Default margin on each side of an image page, in points.
pub const DEFAULT_MARGIN: f32 = 25.0;

/// Page dimensions in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    /// Page width.
    pub width: f32,
    /// Page height.
    pub height: f32,
}

impl PageSize {
    /// ISO A4 (210mm × 297mm).
    pub const A4: Self = Self::new(595.0, 842.0);

    /// US Letter (8.5" × 11").
    pub const LETTER: Self = Self::new(612.0, 792.0);

    /// US Legal (8.5" × 14").
    pub const LEGAL: Self = Self::new(612.0, 1008.0);

    /// Create a page size from width and height in points.
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Dimensions left for content once `margins` are taken from each side.
    pub fn usable_area(&self, margins: &Margins) -> (f32, f32) {
        (
            self.width - margins.left - margins.right,
            self.height - margins.top - margins.bottom,
        )
    }

    /// Parse a page size.
    ///
    /// Accepts a named size (`a4`, `letter`, `legal`, case-insensitive) or
    /// explicit dimensions in points written as `WIDTHxHEIGHT`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfbind::layout::PageSize;
    ///
    /// assert_eq!(PageSize::parse("Letter").unwrap(), PageSize::LETTER);
    /// assert_eq!(PageSize::parse("300x400").unwrap(), PageSize::new(300.0, 400.0));
    /// assert!(PageSize::parse("0x400").is_err());
    /// ```
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let s = s.trim().to_lowercase();

        match s.as_str() {
            "a4" => return Ok(Self::A4),
            "letter" => return Ok(Self::LETTER),
            "legal" => return Ok(Self::LEGAL),
            _ => {}
        }

        let Some((width, height)) = s.split_once('x') else {
            bail!("Invalid page size: {s}. Expected a4, letter, legal or WIDTHxHEIGHT");
        };

        let width: f32 = width
            .trim()
            .parse()
            .with_context(|| format!("Invalid page width: {width}"))?;
        let height: f32 = height
            .trim()
            .parse()
            .with_context(|| format!("Invalid page height: {height}"))?;

        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            bail!("Page dimensions must be positive: {width}x{height}");
        }

        Ok(Self::new(width, height))
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

impl FromStr for PageSize {
    type Err = PdfBindError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s).map_err(|err| PdfBindError::invalid_config(format!("{err:#}")))
    }
}

/// Margins around the usable area of a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margins {
    /// Top margin.
    pub top: f32,
    /// Right margin.
    pub right: f32,
    /// Bottom margin.
    pub bottom: f32,
    /// Left margin.
    pub left: f32,
}

impl Margins {
    /// Same margin on all sides.
    pub const fn uniform(margin: f32) -> Self {
        Self {
            top: margin,
            right: margin,
            bottom: margin,
            left: margin,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN)
    }
}

/// Horizontal position of placed content. Images are always centered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    /// Centered on the full page width, ignoring the side margins.
    Center,
}

impl HorizontalAlign {
    /// X coordinate of the left edge of content `width` points wide.
    pub fn x_offset(&self, page: &PageSize, width: f32) -> f32 {
        match self {
            Self::Center => (page.width - width) / 2.0,
        }
    }
}

/// Where and how large an image is drawn on its page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Uniform scale factor applied to the intrinsic size.
    pub scale: f32,
    /// Drawn width in points.
    pub scaled_width: f32,
    /// Drawn height in points.
    pub scaled_height: f32,
    /// Horizontal alignment on the page.
    pub horizontal_align: HorizontalAlign,
}

impl Placement {
    /// Lower-left corner of the drawn image in PDF user space.
    ///
    /// The image top edge sits on the top margin.
    pub fn origin(&self, page: &PageSize, margins: &Margins) -> (f32, f32) {
        let x = self.horizontal_align.x_offset(page, self.scaled_width);
        let y = page.height - margins.top - self.scaled_height;
        (x, y)
    }
}

/// Compute the placement of an image inside a usable area.
///
/// The scale factor is `min(usable_width / image_width, usable_height /
/// image_height)`. It is not clamped, so images smaller than the usable area
/// are enlarged.
///
/// # Errors
///
/// Returns [`PdfBindError::InvalidDimensions`] if either image dimension or
/// either usable dimension is zero, negative or not finite.
///
/// # Examples
///
/// ```
/// use pdfbind::layout::{HorizontalAlign, compute_placement};
///
/// let placement = compute_placement(545.0, 792.0, 100.0, 200.0).unwrap();
/// assert_eq!(placement.scale, 3.96);
/// assert_eq!(placement.horizontal_align, HorizontalAlign::Center);
/// ```
pub fn compute_placement(
    usable_width: f32,
    usable_height: f32,
    image_width: f32,
    image_height: f32,
) -> Result<Placement> {
    check_dimensions(image_width, image_height)?;
    check_dimensions(usable_width, usable_height)?;

    let scale = (usable_width / image_width).min(usable_height / image_height);

    Ok(Placement {
        scale,
        scaled_width: image_width * scale,
        scaled_height: image_height * scale,
        horizontal_align: HorizontalAlign::Center,
    })
}

fn check_dimensions(width: f32, height: f32) -> Result<()> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(PdfBindError::InvalidDimensions { width, height })
    }
}

/// Page size and margins used to place images.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PageLayout {
    /// Size of each image page.
    pub page_size: PageSize,
    /// Margins around the placed image.
    pub margins: Margins,
}

impl PageLayout {
    /// Create a layout.
    pub fn new(page_size: PageSize, margins: Margins) -> Self {
        Self {
            page_size,
            margins,
        }
    }

    /// Place an image of the given intrinsic size on a page of this layout.
    pub fn place(&self, image_width: f32, image_height: f32) -> Result<Placement> {
        let (usable_width, usable_height) = self.page_size.usable_area(&self.margins);
        compute_placement(usable_width, usable_height, image_width, image_height)
    }
}
