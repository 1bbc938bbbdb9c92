//! Page geometry for image pages.
//!
//! This module maps an image's pixel dimensions and its effective orientation
//! to a page size and an image placement rectangle. Everything here is pure
//! and works in PDF points (1/72 inch) with the origin at the bottom left.
//!
//! - [`Orientation::Auto`] pages take the image's own aspect ratio, with the
//!   long edge fixed at [`AUTO_LONG_EDGE`]. The image fills the page.
//! - [`Orientation::Portrait`] and [`Orientation::Landscape`] pages use a
//!   standard page size; the image is scaled to fit inside the margins,
//!   preserving its aspect ratio, and centered.
//!
//! # Examples
//!
//! ```
//! use img2pdf::config::Orientation;
//! use img2pdf::layout::{resolve_page, PageOptions};
//!
//! let page = resolve_page(3000, 2000, Orientation::Portrait, &PageOptions::default());
//! assert_eq!((page.page_width, page.page_height), (612.0, 792.0));
//! assert!(page.image_rect.width > page.image_rect.height);
//! ```

use serde::Serialize;

use crate::config::{DEFAULT_MARGIN, Orientation, PageSize};

/// Long edge of an auto-sized page, in points.
pub const AUTO_LONG_EDGE: f64 = 792.0;

/// Smallest content area side kept when margins eat the whole page.
const MIN_CONTENT_SIDE: f64 = 1.0;

/// Axis-aligned rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Page size and image placement for one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPage {
    /// Page width in points.
    pub page_width: f64,
    /// Page height in points.
    pub page_height: f64,
    /// Where the image is drawn.
    pub image_rect: Rect,
}

impl ResolvedPage {
    /// Width divided by height of the page.
    pub fn aspect_ratio(&self) -> f64 {
        self.page_width / self.page_height
    }
}

/// Standard page options for portrait and landscape layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageOptions {
    /// Standard page size.
    pub page_size: PageSize,
    /// Margin on every side, in points.
    pub margin: f64,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            margin: DEFAULT_MARGIN,
        }
    }
}

/// Orientation applied to one image: its override if set, else the global one.
pub fn effective_orientation(image_override: Option<Orientation>, global: Orientation) -> Orientation {
    image_override.unwrap_or(global)
}

/// Resolve the page for an image of `pixel_width` x `pixel_height`.
///
/// Zero dimensions are treated as one pixel so the result is always finite.
pub fn resolve_page(
    pixel_width: u32,
    pixel_height: u32,
    orientation: Orientation,
    options: &PageOptions,
) -> ResolvedPage {
    let image_width = f64::from(pixel_width.max(1));
    let image_height = f64::from(pixel_height.max(1));

    match orientation {
        Orientation::Auto => auto_page(image_width, image_height),
        Orientation::Portrait => {
            let (width, height) = options.page_size.dimensions();
            fitted_page(width, height, options.margin, image_width, image_height)
        }
        Orientation::Landscape => {
            let (width, height) = options.page_size.dimensions();
            fitted_page(height, width, options.margin, image_width, image_height)
        }
    }
}

fn auto_page(image_width: f64, image_height: f64) -> ResolvedPage {
    let (page_width, page_height) = if image_width >= image_height {
        (AUTO_LONG_EDGE, AUTO_LONG_EDGE * image_height / image_width)
    } else {
        (AUTO_LONG_EDGE * image_width / image_height, AUTO_LONG_EDGE)
    };

    ResolvedPage {
        page_width,
        page_height,
        image_rect: Rect {
            x: 0.0,
            y: 0.0,
            width: page_width,
            height: page_height,
        },
    }
}

fn fitted_page(
    page_width: f64,
    page_height: f64,
    margin: f64,
    image_width: f64,
    image_height: f64,
) -> ResolvedPage {
    let content_width = (page_width - 2.0 * margin).max(MIN_CONTENT_SIDE);
    let content_height = (page_height - 2.0 * margin).max(MIN_CONTENT_SIDE);

    let scale = (content_width / image_width).min(content_height / image_height);
    let width = image_width * scale;
    let height = image_height * scale;

    ResolvedPage {
        page_width,
        page_height,
        image_rect: Rect {
            x: (page_width - width) / 2.0,
            y: (page_height - height) / 2.0,
            width,
            height,
        },
    }
}
