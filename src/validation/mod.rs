//! Structural checks on generated documents.
//!
//! The assembler re-parses every document it produces before handing it out.
//! Hosts can use the same inspection to show page information for a blob
//! they received earlier.
//!
//! # Examples
//!
//! ```no_run
//! use img2pdf::validation::inspect_pdf;
//!
//! # fn example(bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let summary = inspect_pdf(bytes)?;
//! println!("PDF {} with {} pages", summary.version, summary.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::{Document, Object, ObjectId};
use serde::{Deserialize, Serialize};

use crate::error::{Img2PdfError, Result};
use crate::utils::format_file_size;

/// Header every PDF file starts with.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// What a parsed document looks like from the outside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    /// PDF version string from the header, e.g. "1.5".
    pub version: String,

    /// Number of pages in the page tree.
    pub page_count: usize,

    /// Page sizes (width, height) in points, in page order.
    pub page_sizes: Vec<(f32, f32)>,

    /// Size of the serialized document in bytes.
    pub byte_size: u64,
}

impl DocumentSummary {
    fn from_document(doc: &Document, byte_size: u64) -> Result<Self> {
        let pages = doc.get_pages();

        let page_sizes = pages
            .values()
            .map(|page_id| {
                media_box_size(doc, *page_id).ok_or_else(|| {
                    Img2PdfError::encoding(format!(
                        "Page object {} {} has no usable MediaBox",
                        page_id.0, page_id.1
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            version: doc.version.clone(),
            page_count: pages.len(),
            page_sizes,
            byte_size,
        })
    }

    /// Format the document size as a human-readable string.
    pub fn format_size(&self) -> String {
        format_file_size(self.byte_size)
    }
}

/// Quick check for the PDF header.
pub fn is_pdf(bytes: &[u8]) -> bool {
    bytes.starts_with(PDF_MAGIC)
}

/// Parse `bytes` as a PDF and summarize its page tree.
///
/// # Errors
///
/// Returns an Encoding error if the bytes are not a parseable PDF, the page
/// tree is empty, or a page lacks a MediaBox.
pub fn inspect_pdf(bytes: &[u8]) -> Result<DocumentSummary> {
    if !is_pdf(bytes) {
        return Err(Img2PdfError::encoding("Output does not start with a PDF header"));
    }

    let doc = Document::load_mem(bytes)
        .map_err(|e| Img2PdfError::encoding(format!("Output cannot be parsed: {e}")))?;

    if doc.get_pages().is_empty() {
        return Err(Img2PdfError::encoding("Output has no pages"));
    }

    DocumentSummary::from_document(&doc, bytes.len() as u64)
}

/// Width and height of a page's MediaBox.
fn media_box_size(doc: &Document, page_id: ObjectId) -> Option<(f32, f32)> {
    let page = doc.get_dictionary(page_id).ok()?;
    let media_box = match page.get(b"MediaBox").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        other => other,
    };

    if let Object::Array(arr) = media_box
        && arr.len() >= 4
    {
        let llx = arr[0].as_float().ok()?;
        let lly = arr[1].as_float().ok()?;
        let urx = arr[2].as_float().ok()?;
        let ury = arr[3].as_float().ok()?;
        return Some((urx - llx, ury - lly));
    }
    None
}
