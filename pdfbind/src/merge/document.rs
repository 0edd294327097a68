//! The PDF being assembled.
//!
//! [`OutputDocument`] owns a `lopdf` document with a single flat page tree.
//! Pages are appended in call order and linked into the tree when the
//! document is finished. Copied pages arrive as a [`StagedPages`] batch that
//! is committed as a whole, so a source that fails half way leaves no trace.

use std::collections::BTreeMap;

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::error::Result;
use crate::io::DecodedImage;
use crate::layout::{PageLayout, PageSize, Placement};

/// PDF version written to the output.
pub const PDF_VERSION: &str = "1.5";

const IMAGE_RESOURCE: &str = "Im0";

/// Objects and pages copied from one source, not yet part of the output.
#[derive(Debug, Default)]
pub struct StagedPages {
    objects: BTreeMap<ObjectId, Object>,
    page_ids: Vec<ObjectId>,
}

impl StagedPages {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if an object with this id is already staged.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Stage an object, replacing any previous object with the same id.
    pub fn insert_object(&mut self, id: ObjectId, object: Object) {
        self.objects.insert(id, object);
    }

    /// Stage a page dictionary. Pages are linked in the order they are pushed.
    pub fn push_page(&mut self, id: ObjectId, page: Dictionary) {
        self.objects.insert(id, Object::Dictionary(page));
        self.page_ids.push(id);
    }

    /// Number of staged pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }
}

/// The output document under construction.
#[derive(Debug)]
pub struct OutputDocument {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    layout: PageLayout,
}

impl OutputDocument {
    /// Create an empty document whose image pages use `layout`.
    pub fn new(layout: PageLayout) -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();

        let size = layout.page_size;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
                "MediaBox" => media_box(&size),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            layout,
        }
    }

    /// Page size used for image pages.
    pub fn default_page_size(&self) -> PageSize {
        self.layout.page_size
    }

    /// Page size and margins used for image pages.
    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Ids of the appended pages, in output order.
    pub fn page_ids(&self) -> &[ObjectId] {
        &self.page_ids
    }

    /// Id of the page tree root that copied pages must name as `Parent`.
    pub fn pages_id(&self) -> ObjectId {
        self.pages_id
    }

    /// Smallest object id guaranteed not to collide with existing objects.
    pub fn next_object_id(&self) -> u32 {
        self.doc.max_id + 1
    }

    /// Commit a batch of copied pages.
    ///
    /// Staged ids must come from [`next_object_id`](Self::next_object_id)
    /// onwards.
    pub fn append_pages(&mut self, staged: StagedPages) -> usize {
        let StagedPages { objects, page_ids } = staged;

        if let Some(&(max, _)) = objects.keys().next_back() {
            self.doc.max_id = self.doc.max_id.max(max);
        }
        self.doc.objects.extend(objects);

        let added = page_ids.len();
        self.page_ids.extend(page_ids);
        added
    }

    /// Append one page showing `image` at `placement`.
    ///
    /// The page has the default page size. The image is drawn with its top
    /// edge on the top margin and aligned horizontally as the placement says.
    ///
    /// # Errors
    ///
    /// Returns an error if the page content cannot be encoded.
    pub fn append_image_page(
        &mut self,
        image: DecodedImage,
        placement: &Placement,
    ) -> Result<ObjectId> {
        let DecodedImage {
            width,
            height,
            color,
            pixels,
            alpha,
        } = image;

        let mut image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => color.pdf_color_space(),
            "BitsPerComponent" => 8,
        };

        if let Some(alpha) = alpha {
            let mask_id = self.doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width as i64,
                    "Height" => height as i64,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                alpha,
            ));
            image_dict.set("SMask", mask_id);
        }

        let image_id = self.doc.add_object(Stream::new(image_dict, pixels));

        let size = self.layout.page_size;
        let (x, y) = placement.origin(&size, &self.layout.margins);

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        placement.scaled_width.into(),
                        Object::Real(0.0),
                        Object::Real(0.0),
                        placement.scaled_height.into(),
                        x.into(),
                        y.into(),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = self
            .doc
            .add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => media_box(&size),
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_RESOURCE => image_id,
                },
            },
            "Contents" => content_id,
        });

        self.page_ids.push(page_id);
        Ok(page_id)
    }

    /// Link all appended pages into the page tree and hand out the document.
    pub fn finish(mut self) -> Document {
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let count = kids.len() as i64;

        if let Ok(Object::Dictionary(pages)) = self.doc.get_object_mut(self.pages_id) {
            pages.set("Kids", kids);
            pages.set("Count", count);
        }

        self.doc
    }
}

fn media_box(size: &PageSize) -> Vec<Object> {
    vec![0.into(), 0.into(), size.width.into(), size.height.into()]
}
