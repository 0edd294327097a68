//! Bookmark (outline) management for PDFs.
//!
//! Adds a flat outline with one entry per merged file, each pointing at the
//! first page that file contributed.

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::{PdfBindError, Result};
use crate::merge::metadata::text_string;

/// One outline entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bookmark {
    /// Text shown in the outline.
    pub title: String,
    /// Page the entry jumps to.
    pub page_id: ObjectId,
}

impl Bookmark {
    /// Create a bookmark.
    pub fn new(title: impl Into<String>, page_id: ObjectId) -> Self {
        Self {
            title: title.into(),
            page_id,
        }
    }
}

/// Manager for PDF bookmarks (outlines).
#[derive(Debug, Clone, Default)]
pub struct BookmarkManager;

impl BookmarkManager {
    /// Create a new bookmark manager.
    pub fn new() -> Self {
        Self
    }

    /// Replace the outline of `doc` with `bookmarks`, in the given order.
    ///
    /// Returns the number of entries written. Nothing is written for an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no catalog.
    pub fn add_bookmarks(&self, doc: &mut Document, bookmarks: &[Bookmark]) -> Result<usize> {
        if bookmarks.is_empty() {
            return Ok(0);
        }

        let outline_id = doc.new_object_id();
        let item_ids: Vec<ObjectId> = bookmarks.iter().map(|_| doc.new_object_id()).collect();

        for (i, (bookmark, &item_id)) in bookmarks.iter().zip(&item_ids).enumerate() {
            // [page /XYZ null null null] keeps the reader's current zoom.
            let dest = vec![
                Object::Reference(bookmark.page_id),
                Object::Name(b"XYZ".to_vec()),
                Object::Null,
                Object::Null,
                Object::Null,
            ];

            let mut item = Dictionary::new();
            item.set("Title", text_string(&bookmark.title));
            item.set("Parent", outline_id);
            item.set("Dest", dest);

            if i > 0 {
                item.set("Prev", item_ids[i - 1]);
            }
            if let Some(&next) = item_ids.get(i + 1) {
                item.set("Next", next);
            }

            doc.objects.insert(item_id, Object::Dictionary(item));
        }

        let mut outline = Dictionary::new();
        outline.set("Type", Object::Name(b"Outlines".to_vec()));
        outline.set("Count", item_ids.len() as i64);
        outline.set("First", item_ids[0]);
        outline.set("Last", item_ids[item_ids.len() - 1]);
        doc.objects.insert(outline_id, Object::Dictionary(outline));

        let catalog = doc
            .catalog_mut()
            .map_err(|e| PdfBindError::other(format!("Failed to add bookmarks: {e}")))?;
        catalog.set("Outlines", outline_id);
        catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));

        Ok(item_ids.len())
    }

    /// Check if a document has bookmarks.
    pub fn has_bookmarks(&self, doc: &Document) -> bool {
        doc.catalog()
            .map(|catalog| catalog.has(b"Outlines"))
            .unwrap_or(false)
    }
}
