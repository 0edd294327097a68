//! Shared helpers for the integration tests.
//!
//! Fixtures are generated on the fly: PDFs with lopdf, images with the
//! image crate. Every source page carries a marker comment in its content
//! stream so tests can tell which page ended up where.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use pdfbind::config::{CompressionLevel, Config};
use pdfbind::merge::{MergeOutcome, MergeReport, Merger};
use tempfile::TempDir;

/// A scratch directory with an input directory and an output path beside it.
pub struct Workspace {
    dir: TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let input = dir.path().join("files");
        std::fs::create_dir(&input).expect("Failed to create input dir");
        let output = dir.path().join("merged_output.pdf");
        Self { dir, input, output }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Configuration for this workspace. Streams are left uncompressed so
    /// page markers can be read back.
    pub fn config(&self) -> Config {
        let mut config = Config::new(&self.input, &self.output);
        config.compression = CompressionLevel::None;
        config.quiet = true;
        config
    }

    /// Write a PDF with `pages` pages of `width`x`height` points.
    ///
    /// Page `n` carries the marker `<name> p<n>`.
    pub fn pdf_with_size(&self, name: &str, pages: usize, width: i64, height: i64) -> PathBuf {
        self.write_pdf(name, pages, width, height, |_, _, _| {})
    }

    pub fn pdf(&self, name: &str, pages: usize) -> PathBuf {
        self.pdf_with_size(name, pages, 612, 792)
    }

    /// Like [`pdf`](Self::pdf), but `patch` may edit page `n` (1-based)
    /// before it is added.
    pub fn pdf_with(
        &self,
        name: &str,
        pages: usize,
        patch: impl FnMut(&mut Document, usize, &mut Dictionary),
    ) -> PathBuf {
        self.write_pdf(name, pages, 612, 792, patch)
    }

    fn write_pdf(
        &self,
        name: &str,
        pages: usize,
        width: i64,
        height: i64,
        mut patch: impl FnMut(&mut Document, usize, &mut Dictionary),
    ) -> PathBuf {
        let path = self.input.join(name);
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let kids: Vec<Object> = (1..=pages)
            .map(|n| {
                let marker = format!("% {name} p{n}\n");
                let content_id =
                    doc.add_object(Stream::new(dictionary! {}, marker.into_bytes()));
                let mut page = dictionary! {
                    "Type" => "Page",
                    "Parent" => pages_id,
                    "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
                    "Contents" => content_id,
                };
                patch(&mut doc, n, &mut page);
                doc.add_object(page).into()
            })
            .collect();

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => pages as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(&path).expect("Failed to write fixture PDF");
        path
    }

    /// Write an RGB image. The encoding follows the file suffix.
    pub fn image(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.input.join(name);
        RgbImage::from_pixel(width, height, Rgb([200, 40, 40]))
            .save(&path)
            .expect("Failed to write fixture image");
        path
    }

    /// Write a PNG with an alpha channel.
    pub fn transparent_png(&self, name: &str, width: u32, height: u32) -> PathBuf {
        let path = self.input.join(name);
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 255, 128]))
            .save_with_format(&path, ImageFormat::Png)
            .expect("Failed to write fixture image");
        path
    }

    pub fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.input.join(name);
        std::fs::write(&path, contents).expect("Failed to write fixture file");
        path
    }
}

/// Run a merge and return its report, panicking on any other outcome.
pub fn merge(config: &Config) -> MergeReport {
    match Merger::new().run(config) {
        Ok(MergeOutcome::Merged(report)) => report,
        other => panic!("Expected a merged report, got {other:?}"),
    }
}

/// Identify every page of the PDF at `path`, in page order.
///
/// Copied pages yield their marker; image pages yield `image WxH` with the
/// pixel size of the embedded image.
pub fn page_signatures(path: &Path) -> Vec<String> {
    let doc = Document::load(path).expect("Failed to load output");
    doc.get_pages()
        .values()
        .map(|&page_id| page_signature(&doc, page_id))
        .collect()
}

fn page_signature(doc: &Document, page_id: ObjectId) -> String {
    let content = doc.get_page_content(page_id).unwrap_or_default();
    let text = String::from_utf8_lossy(&content);

    if let Some(marker) = text.strip_prefix("% ") {
        return marker.trim().to_string();
    }

    match image_size(doc, page_id) {
        Some((w, h)) => format!("image {w}x{h}"),
        None => format!("unknown page {page_id:?}"),
    }
}

fn image_size(doc: &Document, page_id: ObjectId) -> Option<(i64, i64)> {
    let page = doc.get_dictionary(page_id).ok()?;
    let resources = resolve_dict(doc, page.get(b"Resources").ok()?)?;
    let xobjects = resolve_dict(doc, resources.get(b"XObject").ok()?)?;
    let (_, image_ref) = xobjects.iter().next()?;
    let image = doc.get_object(image_ref.as_reference().ok()?).ok()?;
    let dict = &image.as_stream().ok()?.dict;
    Some((
        dict.get(b"Width").ok()?.as_i64().ok()?,
        dict.get(b"Height").ok()?.as_i64().ok()?,
    ))
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a lopdf::Dictionary> {
    match object {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Media box of page `number` (1-based) in the PDF at `path`.
pub fn media_box(path: &Path, number: u32) -> Vec<f32> {
    let doc = Document::load(path).expect("Failed to load output");
    let page_id = doc.get_pages()[&number];
    doc.get_dictionary(page_id)
        .and_then(|page| page.get(b"MediaBox"))
        .and_then(Object::as_array)
        .expect("Page has no MediaBox")
        .iter()
        .map(|v| v.as_float().expect("MediaBox entry is not a number"))
        .collect()
}
