use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An axis-aligned rectangle in page-local points (origin top-left, y down).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Page dimension '{0}' must be a finite, non-negative number (got {1})")]
    InvalidDimension(&'static str, f32),
    #[error("No usable height left: page {page_height:.2} - bands {bands:.2} - margins {margins:.2} <= 0")]
    NoUsableHeight {
        page_height: f32,
        bands: f32,
        margins: f32,
    },
    #[error("No usable width left: page {page_width:.2} - margins {margins:.2} <= 0")]
    NoUsableWidth { page_width: f32, margins: f32 },
}

/// Fixed page canvas: size, margin, and the bands reserved at the top for
/// branding and at the bottom for the footer and watermark.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub top_band: f32,
    pub bottom_band: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin: 36.0,
            top_band: 56.0,
            bottom_band: 64.0,
        }
    }

    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
            ..Self::a4()
        }
    }

    /// Checks every dimension and the usable-area invariants.
    pub fn validate(&self) -> Result<(), GeometryError> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("margin", self.margin),
            ("top_band", self.top_band),
            ("bottom_band", self.bottom_band),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GeometryError::InvalidDimension(name, value));
            }
        }
        if self.usable_height() <= 0.0 {
            return Err(GeometryError::NoUsableHeight {
                page_height: self.height,
                bands: self.top_band + self.bottom_band,
                margins: 2.0 * self.margin,
            });
        }
        if self.usable_width() <= 0.0 {
            return Err(GeometryError::NoUsableWidth {
                page_width: self.width,
                margins: 2.0 * self.margin,
            });
        }
        Ok(())
    }

    pub fn usable_height(&self) -> f32 {
        self.height - self.top_band - self.bottom_band - 2.0 * self.margin
    }

    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn page_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The region between the bands and inside the margins where planned
    /// content is placed.
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.margin,
            self.top_band + self.margin,
            self.usable_width(),
            self.usable_height(),
        )
    }

    /// The reserved bottom band, spanning the full page width.
    pub fn footer_rect(&self) -> Rect {
        Rect::new(
            0.0,
            self.height - self.bottom_band,
            self.width,
            self.bottom_band,
        )
    }
}
