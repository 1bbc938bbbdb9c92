//! Multi-page document assembly.
//!
//! The [`DocumentAssembler`] owns the object table of the document being
//! built. Pages are appended in call order; [`DocumentAssembler::finalize`]
//! consumes the assembler, writes the page tree, catalog and Info
//! dictionary, and serializes everything to a byte buffer.
//!
//! # Examples
//!
//! ```no_run
//! use img2pdf::assemble::{DocumentAssembler, DocumentInfo};
//! use img2pdf::config::{Orientation, QualityTier};
//! use img2pdf::io::decoder::ImageDecoder;
//! use img2pdf::layout::{resolve_page, PageOptions};
//!
//! # fn example(png: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let image = ImageDecoder::new(QualityTier::High).decode(png)?;
//! let page = resolve_page(
//!     image.source_width,
//!     image.source_height,
//!     Orientation::Auto,
//!     &PageOptions::default(),
//! );
//!
//! let mut assembler = DocumentAssembler::new(DocumentInfo::default());
//! assembler.append_page(&page, image)?;
//! let bytes = assembler.finalize()?;
//! # Ok(())
//! # }
//! ```

use lopdf::{Document, Object, ObjectId, dictionary};
use tracing::debug;

use crate::assemble::metadata::DocumentInfo;
use crate::assemble::page::{EncodedPage, PageEncoder};
use crate::error::{Img2PdfError, Result};
use crate::io::decoder::DecodedImage;
use crate::layout::ResolvedPage;
use crate::validation;

/// PDF version written in the header.
pub const PDF_VERSION: &str = "1.5";

/// Builder for one output document.
pub struct DocumentAssembler {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
    encoder: PageEncoder,
    info: DocumentInfo,
}

impl DocumentAssembler {
    /// Start an empty document.
    pub fn new(info: DocumentInfo) -> Self {
        let mut doc = Document::with_version(PDF_VERSION);
        let pages_id = doc.new_object_id();

        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
            encoder: PageEncoder::new(),
            info,
        }
    }

    /// Number of pages appended so far.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append one page after all previously appended pages.
    ///
    /// # Errors
    ///
    /// Returns an Encoding error if the page objects cannot be written.
    pub fn append_page(&mut self, page: &ResolvedPage, image: DecodedImage) -> Result<EncodedPage> {
        let encoded = self
            .encoder
            .encode(&mut self.doc, self.pages_id, page, image)?;
        self.page_ids.push(encoded.page_id);
        Ok(encoded)
    }

    /// Close the document and serialize it.
    ///
    /// The serialized bytes are parsed again and their page count compared
    /// with the number of appended pages before they are returned.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `EmptyDocument` if no page was appended
    /// - `Encoding` if serialization fails or the output does not parse back
    pub fn finalize(mut self) -> Result<Vec<u8>> {
        if self.page_ids.is_empty() {
            return Err(Img2PdfError::EmptyDocument);
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.page_ids.len() as i64,
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);
        self.info.apply(&mut self.doc);

        self.doc.compress();

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| Img2PdfError::encoding(format!("Failed to serialize document: {e}")))?;

        let summary = validation::inspect_pdf(&bytes)?;
        if summary.page_count != self.page_ids.len() {
            return Err(Img2PdfError::encoding(format!(
                "Serialized document has {} page(s), expected {}",
                summary.page_count,
                self.page_ids.len()
            )));
        }

        debug!(
            pages = summary.page_count,
            size = %summary.format_size(),
            "Finalized document"
        );

        Ok(bytes)
    }
}
