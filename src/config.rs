//! Configuration module for img2pdf.
//!
//! This module holds the settings object the host application supplies with
//! every generation request. It handles:
//! - Parsing of orientation, quality and page size choices
//! - Deserialization from the host's JSON settings
//! - Validation of margins
//! - Derivation of the download filename

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Img2PdfError, Result};
use crate::layout::PageOptions;

/// Filename used when the requested one is blank.
pub const DEFAULT_FILENAME: &str = "my-images";

/// Margin around letterboxed images on standard pages, in points.
pub const DEFAULT_MARGIN: f64 = 36.0;

/// Page orientation policy for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Page takes the shape of the image.
    #[default]
    Auto,
    /// Standard page, taller than wide.
    Portrait,
    /// Standard page, wider than tall.
    Landscape,
}

impl Orientation {
    /// Lowercase name as used in settings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Orientation {
    type Err = Img2PdfError;

    /// Parse an orientation from "auto", "portrait" or "landscape".
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(Img2PdfError::invalid_settings(format!(
                "Invalid orientation: {s}. Must be one of: auto, portrait, landscape"
            ))),
        }
    }
}

/// Compression/resolution policy applied when re-encoding images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "QualityRepr")]
pub enum QualityTier {
    /// Aggressive compression and a tight resolution cap.
    Low,
    /// Moderate compression, large images are downscaled.
    Medium,
    /// Near-lossless, original resolution.
    #[default]
    High,
}

impl QualityTier {
    /// Map a compression factor in `[0.0, 1.0]` to a tier.
    ///
    /// Higher factors keep more detail.
    ///
    /// # Errors
    ///
    /// Returns an error if the factor is not a finite number within range.
    pub fn from_factor(factor: f64) -> Result<Self> {
        if !factor.is_finite() || !(0.0..=1.0).contains(&factor) {
            return Err(Img2PdfError::invalid_settings(format!(
                "Invalid quality factor: {factor}. Must be between 0.0 and 1.0"
            )));
        }

        Ok(if factor < 0.5 {
            Self::Low
        } else if factor < 0.85 {
            Self::Medium
        } else {
            Self::High
        })
    }

    /// JPEG quality (1-100) used for embedded rasters.
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            Self::Low => 60,
            Self::Medium => 80,
            Self::High => 95,
        }
    }

    /// Longest allowed edge in pixels, `None` keeps the original resolution.
    pub fn max_dimension(&self) -> Option<u32> {
        match self {
            Self::Low => Some(1600),
            Self::Medium => Some(2400),
            Self::High => None,
        }
    }
}

impl FromStr for QualityTier {
    type Err = Img2PdfError;

    /// Parse a tier from "low", "medium" or "high".
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(Img2PdfError::invalid_settings(format!(
                "Invalid quality: {s}. Must be one of: low, medium, high"
            ))),
        }
    }
}

/// Wire form of a quality tier: a name or a numeric factor.
#[derive(Deserialize)]
#[serde(untagged)]
enum QualityRepr {
    Name(String),
    Factor(f64),
}

impl TryFrom<QualityRepr> for QualityTier {
    type Error = Img2PdfError;

    fn try_from(repr: QualityRepr) -> Result<Self> {
        match repr {
            QualityRepr::Name(name) => name.parse(),
            QualityRepr::Factor(factor) => Self::from_factor(factor),
        }
    }
}

/// Standard page size used by portrait and landscape layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    /// US Letter, 8.5 x 11 in.
    #[default]
    Letter,
    /// ISO A4, 210 x 297 mm.
    A4,
}

impl PageSize {
    /// Portrait dimensions (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            Self::Letter => (612.0, 792.0),
            Self::A4 => (595.28, 841.89),
        }
    }
}

impl FromStr for PageSize {
    type Err = Img2PdfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "letter" => Ok(Self::Letter),
            "a4" => Ok(Self::A4),
            _ => Err(Img2PdfError::invalid_settings(format!(
                "Invalid page size: {s}. Must be one of: letter, a4"
            ))),
        }
    }
}

/// Settings for one generation run.
///
/// Supplied wholesale with each request and never modified during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationSettings {
    /// Requested output filename, with or without the `.pdf` suffix.
    #[serde(alias = "filename")]
    pub output_filename: String,

    /// Orientation for images without their own override.
    #[serde(alias = "orientation")]
    pub global_orientation: Orientation,

    /// Re-encoding policy for all images.
    #[serde(alias = "quality")]
    pub quality_tier: QualityTier,

    /// Standard page size for portrait and landscape pages.
    pub page_size: PageSize,

    /// Margin around letterboxed images, in points.
    pub margin: f64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            output_filename: DEFAULT_FILENAME.to_string(),
            global_orientation: Orientation::default(),
            quality_tier: QualityTier::default(),
            page_size: PageSize::default(),
            margin: DEFAULT_MARGIN,
        }
    }
}

impl GenerationSettings {
    /// Parse and validate settings from JSON.
    ///
    /// Accepts both the full field names and the short `filename`,
    /// `orientation` and `quality` keys. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the settings are invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use img2pdf::config::{GenerationSettings, Orientation, QualityTier};
    ///
    /// let settings = GenerationSettings::from_json(
    ///     r#"{"filename": "holiday", "orientation": "portrait", "quality": "medium"}"#,
    /// ).unwrap();
    /// assert_eq!(settings.global_orientation, Orientation::Portrait);
    /// assert_eq!(settings.quality_tier, QualityTier::Medium);
    /// assert_eq!(settings.download_filename(), "holiday.pdf");
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The margin is negative or not a number
    /// - The margin leaves no room for the image on a standard page
    pub fn validate(&self) -> Result<()> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(Img2PdfError::invalid_settings(format!(
                "Margin must be a non-negative number, got {}",
                self.margin
            )));
        }

        let (width, height) = self.page_size.dimensions();
        if self.margin * 2.0 >= width.min(height) {
            return Err(Img2PdfError::invalid_settings(format!(
                "Margin of {}pt leaves no room on a {}x{}pt page",
                self.margin, width, height
            )));
        }

        Ok(())
    }

    /// Filename to offer the generated document under.
    ///
    /// Whitespace is trimmed, a blank name falls back to
    /// [`DEFAULT_FILENAME`], and `.pdf` is appended unless already present.
    /// Path separators and control characters become `_`, so the result is
    /// always a single path component.
    pub fn download_filename(&self) -> String {
        let name = self.output_filename.trim();
        let name: String = if name.is_empty() {
            DEFAULT_FILENAME.to_string()
        } else {
            name.chars()
                .map(|c| {
                    if c == '/' || c == '\\' || c.is_control() {
                        '_'
                    } else {
                        c
                    }
                })
                .collect()
        };

        if name.to_lowercase().ends_with(".pdf") {
            name
        } else {
            format!("{name}.pdf")
        }
    }

    /// Document title: the download filename without its `.pdf` suffix.
    pub fn document_title(&self) -> String {
        let filename = self.download_filename();
        filename[..filename.len() - ".pdf".len()].to_string()
    }

    /// Page geometry options for the layout resolver.
    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            page_size: self.page_size,
            margin: self.margin,
        }
    }
}
