//! Image decoding and re-encoding for embedding.
//!
//! Every supported input (JPEG, PNG, WebP) is decoded, optionally downscaled
//! according to the quality tier, and re-encoded as baseline JPEG so that the
//! page encoder can embed it with a single `DCTDecode` filter. At the High
//! tier, 8-bit grayscale or RGB JPEG input is embedded as is after it decodes
//! cleanly. Decoded pixel buffers never leave this module; callers only see
//! the encoded payload.
//!
//! # Examples
//!
//! ```no_run
//! use img2pdf::config::QualityTier;
//! use img2pdf::io::decoder::ImageDecoder;
//!
//! # fn example(bytes: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let decoder = ImageDecoder::new(QualityTier::Medium);
//! let image = decoder.decode(bytes)?;
//! println!("{}x{} -> {} bytes", image.width, image.height, image.payload.len());
//! # Ok(())
//! # }
//! ```

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::debug;

use crate::config::QualityTier;
use crate::error::DecodeError;

/// Input formats accepted by the decoder.
const SUPPORTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::WebP];

/// Color model of an encoded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterColor {
    /// Single channel.
    Gray,
    /// Three channels.
    Rgb,
}

impl RasterColor {
    /// PDF color space name for this color model.
    pub fn color_space(&self) -> &'static str {
        match self {
            Self::Gray => "DeviceGray",
            Self::Rgb => "DeviceRGB",
        }
    }
}

/// An image ready to be embedded in a page.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Width of the original image in pixels.
    pub source_width: u32,
    /// Height of the original image in pixels.
    pub source_height: u32,
    /// Width of the embedded raster in pixels.
    pub width: u32,
    /// Height of the embedded raster in pixels.
    pub height: u32,
    /// Color model of the embedded raster.
    pub color: RasterColor,
    /// JPEG-encoded raster.
    pub payload: Vec<u8>,
}

impl DecodedImage {
    /// Whether the raster was downscaled from the original.
    pub fn was_downscaled(&self) -> bool {
        self.width != self.source_width || self.height != self.source_height
    }
}

/// Decoder applying one quality tier to every image.
#[derive(Debug, Clone, Copy)]
pub struct ImageDecoder {
    tier: QualityTier,
}

impl ImageDecoder {
    /// Create a decoder for the given quality tier.
    pub fn new(tier: QualityTier) -> Self {
        Self { tier }
    }

    /// Quality tier applied by this decoder.
    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    /// Decode `bytes` and re-encode them for embedding.
    ///
    /// The format is sniffed from the content, not from any filename.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the bytes are empty, not a supported
    /// format, corrupt, zero-sized, or cannot be re-encoded.
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }

        let format = image::guess_format(bytes)?;
        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(DecodeError::UnsupportedFormat {
                details: format!("{format:?} images are not supported"),
            });
        }

        let img = image::load_from_memory_with_format(bytes, format)?;
        let (source_width, source_height) = (img.width(), img.height());
        if source_width == 0 || source_height == 0 {
            return Err(DecodeError::ZeroDimensions {
                width: source_width,
                height: source_height,
            });
        }

        if format == ImageFormat::Jpeg
            && self.tier == QualityTier::High
            && let Some(color) = embeddable_jpeg_color(bytes)
        {
            debug!(source_width, source_height, "Embedding JPEG unchanged");
            return Ok(DecodedImage {
                source_width,
                source_height,
                width: source_width,
                height: source_height,
                color,
                payload: bytes.to_vec(),
            });
        }

        let img = match self.tier.max_dimension() {
            Some(max) if source_width.max(source_height) > max => {
                img.resize(max, max, FilterType::Triangle)
            }
            _ => img,
        };

        let (color, payload) = encode_jpeg(&img, self.tier.jpeg_quality())?;

        debug!(
            format = ?format,
            source_width,
            source_height,
            width = img.width(),
            height = img.height(),
            payload_len = payload.len(),
            "Decoded image"
        );

        Ok(DecodedImage {
            source_width,
            source_height,
            width: img.width(),
            height: img.height(),
            color,
            payload,
        })
    }
}

/// Color model of a JPEG that a PDF reader can show from its original bytes.
///
/// Reads the frame header; only 8-bit frames with one or three components
/// qualify. CMYK and anything unparseable return `None`.
fn embeddable_jpeg_color(bytes: &[u8]) -> Option<RasterColor> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        if bytes[pos] != 0xFF {
            return None;
        }
        let marker = bytes[pos + 1];
        match marker {
            // fill byte
            0xFF => {
                pos += 1;
                continue;
            }
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            // scan data or end of image before any frame header
            0xD9 | 0xDA => return None,
            _ => {}
        }

        let len = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            let precision = *bytes.get(pos + 4)?;
            let components = *bytes.get(pos + 9)?;
            return match (precision, components) {
                (8, 1) => Some(RasterColor::Gray),
                (8, 3) => Some(RasterColor::Rgb),
                _ => None,
            };
        }
        pos += 2 + len;
    }

    None
}

/// Encode as JPEG, keeping grayscale images single-channel.
fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<(RasterColor, Vec<u8>), DecodeError> {
    let is_gray = matches!(img, DynamicImage::ImageLuma8(_) | DynamicImage::ImageLuma16(_));

    let mut payload = Vec::new();
    let color = {
        let mut encoder = JpegEncoder::new_with_quality(&mut payload, quality);
        if is_gray {
            encoder
                .encode_image(&img.to_luma8())
                .map_err(reencode_error)?;
            RasterColor::Gray
        } else {
            encoder
                .encode_image(&flatten_onto_white(img))
                .map_err(reencode_error)?;
            RasterColor::Rgb
        }
    };

    Ok((color, payload))
}

/// Composite any alpha channel over a white background.
fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }

    let rgba = img.to_rgba8();
    let mut rgb = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in rgb.pixels_mut().zip(rgba.pixels()) {
        let alpha = u16::from(src[3]);
        for channel in 0..3 {
            let blended = (u16::from(src[channel]) * alpha + 255 * (255 - alpha)) / 255;
            dst[channel] = blended as u8;
        }
    }
    rgb
}

fn reencode_error(err: image::ImageError) -> DecodeError {
    DecodeError::Reencode {
        details: err.to_string(),
    }
}
