//! Document information dictionary.
//!
//! Only Title, Creator and Producer are written. Dates are left out so the
//! same input always serializes to the same bytes.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat, dictionary};

use crate::config::GenerationSettings;

/// Name written as Creator and Producer.
pub const PRODUCER: &str = concat!("img2pdf ", env!("CARGO_PKG_VERSION"));

/// Values for the Info dictionary of a generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    /// Document title.
    pub title: Option<String>,
    /// Application that created the content.
    pub creator: String,
    /// Library that produced the file.
    pub producer: String,
}

impl Default for DocumentInfo {
    fn default() -> Self {
        Self {
            title: None,
            creator: PRODUCER.to_string(),
            producer: PRODUCER.to_string(),
        }
    }
}

impl DocumentInfo {
    /// Info for a run with the given settings, titled after the output file.
    pub fn for_settings(settings: &GenerationSettings) -> Self {
        Self {
            title: Some(settings.document_title()),
            ..Default::default()
        }
    }

    /// Add the Info dictionary to `doc` and reference it from the trailer.
    pub fn apply(&self, doc: &mut Document) -> ObjectId {
        let mut info = dictionary! {
            "Creator" => text_string(&self.creator),
            "Producer" => text_string(&self.producer),
        };
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }

        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);
        info_id
    }

    /// Read the Info dictionary back from a parsed document.
    ///
    /// Missing fields come back empty; only fields written by [`apply`](Self::apply)
    /// are guaranteed to decode.
    pub fn read(doc: &Document) -> Option<Self> {
        let info_id = doc.trailer.get(b"Info").and_then(Object::as_reference).ok()?;
        let info = doc.get_dictionary(info_id).ok()?;

        Some(Self {
            title: read_text(info, b"Title"),
            creator: read_text(info, b"Creator").unwrap_or_default(),
            producer: read_text(info, b"Producer").unwrap_or_default(),
        })
    }
}

/// Encode a PDF text string: literal for ASCII, UTF-16BE with BOM otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }

    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn read_text(dict: &Dictionary, key: &[u8]) -> Option<String> {
    let Ok(Object::String(bytes, _)) = dict.get(key) else {
        return None;
    };

    match bytes.strip_prefix(&[0xFE, 0xFF]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units).ok()
        }
        None => String::from_utf8(bytes.clone()).ok(),
    }
}
