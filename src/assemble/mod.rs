//! PDF assembly.
//!
//! - [`page`]: one image page (XObject, content stream, page dictionary)
//! - [`document`]: page tree, catalog and serialization
//! - [`metadata`]: the Info dictionary

pub mod document;
pub mod metadata;
pub mod page;

pub use document::DocumentAssembler;
pub use metadata::DocumentInfo;
pub use page::{EncodedPage, PageEncoder};
