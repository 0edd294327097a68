//! Reading sources and writing the merged document.
//!
//! - [`reader`] opens source PDFs.
//! - [`decoder`] decodes raster images.
//! - [`writer`] saves the output PDF.

pub mod decoder;
pub mod reader;
pub mod writer;

pub use decoder::{ColorModel, DecodedImage, ImageDecoder};
pub use reader::{LoadedPdf, PdfReader, format_file_size};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
