//! Page geometry: page sizes and the fit-to-page rule for images.
//!
//! All measurements are PDF points (1/72 inch).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A fixed output page size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// US Letter, 8.5 x 11 in.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    /// ISO A4, 210 x 297 mm.
    pub const A4: PageSize = PageSize {
        width: 595.2756,
        height: 841.8898,
    };

    /// Create a page size from width and height in points.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::LETTER
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "letter" => Ok(Self::LETTER),
            "a4" => Ok(Self::A4),
            other => Err(format!("unknown page size '{}' (expected letter or a4)", other)),
        }
    }
}

/// Placement of an image on a page: lower-left corner and drawn size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedImage {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Scale an image of `pixel_width` x `pixel_height` to fill `page` in one
/// dimension while keeping its aspect ratio, then center it.
///
/// Images relatively wider than the page take the full page width; all
/// others take the full page height.
pub fn fit_to_page(pixel_width: u32, pixel_height: u32, page: PageSize) -> FittedImage {
    let image_aspect = pixel_width as f32 / pixel_height.max(1) as f32;

    let (width, height) = if image_aspect > page.aspect() {
        (page.width, page.width / image_aspect)
    } else {
        (page.height * image_aspect, page.height)
    };

    FittedImage {
        x: (page.width - width) / 2.0,
        y: (page.height - height) / 2.0,
        width,
        height,
    }
}
