//! Copying pages from source PDFs into the output.
//!
//! Every page of a source is copied in its original order. A copied page
//! leaves its own page tree behind, so attributes it used to inherit from
//! ancestors (`MediaBox`, `CropBox`, `Resources`, `Rotate`) are written onto
//! the page itself. Objects reachable from the page are copied along with
//! it; links back into the source page tree are not followed. A reference to
//! an object the source does not contain is copied as null.
//!
//! Copies are staged and committed only when all pages of the source made
//! it, so a failing source contributes nothing.

use std::collections::HashSet;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace};

use crate::error::{PdfBindError, Result};
use crate::io::PdfReader;
use crate::merge::document::{OutputDocument, StagedPages};

/// Page attributes a page may inherit from its ancestors.
pub const INHERITABLE_ATTRIBUTES: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Copies all pages of a source PDF into the output document.
#[derive(Debug, Clone, Default)]
pub struct PageTransplanter {
    reader: PdfReader,
}

impl PageTransplanter {
    /// Create a new page transplanter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every page of the PDF at `path` to `output`, in source order.
    ///
    /// Returns the number of pages added. The source is closed before this
    /// returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// - [`PdfBindError::SourceOpenError`] or [`PdfBindError::EncryptedPdf`]
    ///   if the source cannot be opened.
    /// - [`PdfBindError::PageCopyError`] if a page cannot be copied. Later
    ///   pages are not attempted and `output` is left untouched.
    pub fn transplant(&self, path: &Path, output: &mut OutputDocument) -> Result<usize> {
        let mut loaded = self.reader.load(path)?;
        let page_count = loaded.page_count;

        let source = &mut loaded.document;
        let nulled = null_dangling_references(source);
        if nulled > 0 {
            debug!(
                path = %path.display(),
                references = nulled,
                "replaced dangling references with null"
            );
        }
        source.renumber_objects_with(output.next_object_id());
        let pages = source.get_pages();

        let mut staged = StagedPages::new();
        for number in 1..=page_count as u32 {
            let page_id = pages.get(&number).copied().ok_or_else(|| {
                PdfBindError::page_copy(path, number, "page missing from page tree")
            })?;

            copy_page(source, page_id, output.pages_id(), &mut staged)
                .map_err(|reason| PdfBindError::page_copy(path, number, reason))?;

            trace!(page = number, id = ?page_id, "staged page");
        }

        let added = output.append_pages(staged);
        debug!(
            path = %path.display(),
            pages = added,
            load_time = ?loaded.load_time,
            "copied pages"
        );

        Ok(added)
    }
}

/// Stage the page `page_id` of `source` and everything it references.
fn copy_page(
    source: &Document,
    page_id: ObjectId,
    new_parent: ObjectId,
    staged: &mut StagedPages,
) -> std::result::Result<(), String> {
    let mut page = source
        .get_dictionary(page_id)
        .map_err(|e| format!("page object {} {} R: {e}", page_id.0, page_id.1))?
        .clone();

    for key in INHERITABLE_ATTRIBUTES {
        if !page.has(key)
            && let Some(value) = inherited_attribute(source, &page, key)
        {
            page.set(key.to_vec(), value);
        }
    }

    page.remove(b"Parent");
    check_page_structure(source, &page)?;
    copy_references(source, page.iter().map(|(_, value)| value), staged);

    page.set("Parent", new_parent);
    staged.push_page(page_id, page);
    Ok(())
}

/// Find `key` on the nearest ancestor of `page` that defines it.
fn inherited_attribute(source: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut visited = HashSet::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    while let Some(id) = parent {
        if !visited.insert(id) {
            return None;
        }
        let node = source.get_dictionary(id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}

/// Reject a page whose content or resources have the wrong type.
///
/// Both entries are optional and may be null, but a page whose `Contents` is
/// neither a stream nor an array, or whose `Resources` is not a dictionary,
/// cannot be drawn.
fn check_page_structure(source: &Document, page: &Dictionary) -> std::result::Result<(), String> {
    if let Ok(contents) = page.get(b"Contents") {
        match resolve(source, contents) {
            None | Some(Object::Null | Object::Stream(_) | Object::Array(_)) => {}
            _ => return Err("page content is not a stream".to_string()),
        }
    }

    if let Ok(resources) = page.get(b"Resources") {
        match resolve(source, resources) {
            None | Some(Object::Null | Object::Dictionary(_)) => {}
            _ => return Err("page resources are not a dictionary".to_string()),
        }
    }

    Ok(())
}

/// Follow `object` if it is a reference. `None` stands for a missing object.
fn resolve<'a>(source: &'a Document, object: &'a Object) -> Option<&'a Object> {
    match object {
        Object::Reference(id) => source.get_object(*id).ok(),
        other => Some(other),
    }
}

/// Stage every object reachable from `roots` that is not staged yet.
///
/// Page tree nodes are copied without their tree links (`Parent` and, for
/// intermediate nodes, `Kids`), so a reference to another page does not
/// drag the whole source tree along.
fn copy_references<'a>(
    source: &Document,
    roots: impl IntoIterator<Item = &'a Object>,
    staged: &mut StagedPages,
) {
    let mut pending = Vec::new();
    for root in roots {
        collect_references(root, &mut pending);
    }

    while let Some(id) = pending.pop() {
        if staged.contains(id) {
            continue;
        }
        let Some(object) = source.objects.get(&id) else {
            continue;
        };

        let mut object = object.clone();
        detach_from_page_tree(&mut object);

        collect_references(&object, &mut pending);
        staged.insert_object(id, object);
    }
}

/// Replace references to objects missing from `source` with null, which is
/// what a reader makes of them. Returns how many were replaced.
///
/// Must run before renumbering, which leaves such references pointing at
/// whatever object later takes their number.
fn null_dangling_references(source: &mut Document) -> usize {
    let known: HashSet<ObjectId> = source.objects.keys().copied().collect();
    source
        .objects
        .values_mut()
        .map(|object| null_missing(&known, object))
        .sum()
}

fn null_missing(known: &HashSet<ObjectId>, object: &mut Object) -> usize {
    match object {
        Object::Reference(id) => {
            let missing = !known.contains(&*id);
            if missing {
                *object = Object::Null;
            }
            usize::from(missing)
        }
        Object::Array(items) => items.iter_mut().map(|item| null_missing(known, item)).sum(),
        Object::Dictionary(dict) => dict
            .iter_mut()
            .map(|(_, value)| null_missing(known, value))
            .sum(),
        Object::Stream(stream) => stream
            .dict
            .iter_mut()
            .map(|(_, value)| null_missing(known, value))
            .sum(),
        _ => 0,
    }
}

fn collect_references(object: &Object, pending: &mut Vec<ObjectId>) {
    match object {
        Object::Reference(id) => pending.push(*id),
        Object::Array(items) => {
            for item in items {
                collect_references(item, pending);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter() {
                collect_references(value, pending);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter() {
                collect_references(value, pending);
            }
        }
        _ => {}
    }
}

fn detach_from_page_tree(object: &mut Object) {
    let Object::Dictionary(dict) = object else {
        return;
    };

    let node_type = dict
        .get(b"Type")
        .and_then(Object::as_name)
        .map(<[u8]>::to_vec)
        .ok();

    match node_type.as_deref() {
        Some(b"Page") => {
            dict.remove(b"Parent");
        }
        Some(b"Pages") => {
            dict.remove(b"Parent");
            dict.remove(b"Kids");
        }
        _ => {}
    }
}
