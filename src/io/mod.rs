//! Byte-level input and output.
//!
//! - [`decoder`]: raw image bytes to embeddable rasters
//! - [`writer`]: generated documents to disk

pub mod decoder;
pub mod writer;

pub use decoder::{DecodedImage, ImageDecoder, RasterColor};
pub use writer::{PdfWriter, WriteStatistics};
