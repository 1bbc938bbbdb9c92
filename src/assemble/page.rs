//! Encoding of a single image page.
//!
//! Every page consists of three objects: the image XObject, a content stream
//! drawing it into its placement rectangle, and the page dictionary tying the
//! two together under the page tree.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use crate::error::{Img2PdfError, Result};
use crate::io::decoder::DecodedImage;
use crate::layout::ResolvedPage;
use crate::utils::round_pt;

/// Object ids written for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedPage {
    /// Page dictionary.
    pub page_id: ObjectId,
    /// Image XObject.
    pub image_id: ObjectId,
    /// Content stream.
    pub content_id: ObjectId,
}

/// Writes pages into a document, handing out unique image resource names.
#[derive(Debug, Default)]
pub struct PageEncoder {
    next_image: u32,
}

impl PageEncoder {
    /// Create an encoder whose first image is named `Im1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one page showing `image` as laid out by `page`.
    ///
    /// The JPEG payload is embedded as is; the stream is flagged so the
    /// document compressor leaves it alone.
    ///
    /// # Errors
    ///
    /// Returns an Encoding error if the content stream cannot be serialized.
    pub fn encode(
        &mut self,
        doc: &mut Document,
        parent_id: ObjectId,
        page: &ResolvedPage,
        image: DecodedImage,
    ) -> Result<EncodedPage> {
        self.next_image += 1;
        let name = format!("Im{}", self.next_image);

        let image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(image.width),
            "Height" => i64::from(image.height),
            "ColorSpace" => image.color.color_space(),
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        };
        let image_id =
            doc.add_object(Stream::new(image_dict, image.payload).with_compression(false));

        let rect = page.image_rect;
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        real(rect.width),
                        0.into(),
                        0.into(),
                        real(rect.height),
                        real(rect.x),
                        real(rect.y),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(name.clone().into_bytes())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content
            .encode()
            .map_err(|e| Img2PdfError::encoding(format!("Content stream for {name}: {e}")))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content_bytes));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => parent_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                real(page.page_width),
                real(page.page_height),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    name.as_str() => image_id,
                },
            },
            "Contents" => content_id,
        });

        Ok(EncodedPage {
            page_id,
            image_id,
            content_id,
        })
    }

    /// Number of pages encoded so far.
    pub fn pages_encoded(&self) -> u32 {
        self.next_image
    }
}

fn real(value: f64) -> Object {
    Object::Real(round_pt(value) as f32)
}
