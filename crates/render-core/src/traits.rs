use crate::error::RenderError;
use std::io::Write;
use waybill_types::{Color, RasterImage, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// `x` is the left edge of the text.
    #[default]
    Left,
    /// `x` is the horizontal center of the text.
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontFace,
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
    /// Counter-clockwise rotation in degrees around the text origin.
    pub angle: f32,
}

impl TextStyle {
    pub fn regular(size: f32, color: Color) -> Self {
        Self {
            font: FontFace::Regular,
            size,
            color,
            align: TextAlign::Left,
            angle: 0.0,
        }
    }

    pub fn bold(size: f32, color: Color) -> Self {
        Self {
            font: FontFace::Bold,
            ..Self::regular(size, color)
        }
    }

    pub fn centered(self) -> Self {
        Self {
            align: TextAlign::Center,
            ..self
        }
    }

    pub fn rotated(self, angle: f32) -> Self {
        Self { angle, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Color),
    Stroke(Stroke),
}

/// The drawing capability the painter talks to.
///
/// Coordinates are page-local points with the origin at the top-left corner
/// and y growing downwards. Text is positioned by the top of its line box.
pub trait Canvas {
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle)
    -> Result<(), RenderError>;

    fn draw_image(&mut self, image: &RasterImage, rect: Rect) -> Result<(), RenderError>;

    fn draw_rect(&mut self, rect: Rect, paint: Paint) -> Result<(), RenderError>;

    fn draw_line(
        &mut self,
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    ) -> Result<(), RenderError>;

    fn draw_circle(
        &mut self,
        center: (f32, f32),
        radius: f32,
        fill: Color,
    ) -> Result<(), RenderError>;
}

/// The page lifecycle of an output backend.
pub trait DocumentRenderer<W: Write> {
    fn begin_document(&mut self, writer: W) -> Result<(), RenderError>;

    /// Opens a page of `size`, lets `paint` draw on it, then emits it.
    fn render_page(
        &mut self,
        size: Size,
        paint: &mut dyn FnMut(&mut dyn Canvas) -> Result<(), RenderError>,
    ) -> Result<(), RenderError>;

    fn pages_written(&self) -> usize;

    fn finish(self: Box<Self>) -> Result<W, RenderError>;
}
