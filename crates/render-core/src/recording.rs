//! In-memory canvas and renderer that record draw calls instead of producing
//! bytes. Used by tests across the workspace.

use crate::error::RenderError;
use crate::traits::{Canvas, DocumentRenderer, Paint, Stroke, TextStyle};
use std::io::Write;
use waybill_types::{Color, RasterImage, Rect, Size};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Text {
        text: String,
        x: f32,
        y: f32,
        style: TextStyle,
    },
    Image {
        width: u32,
        height: u32,
        rect: Rect,
    },
    Rect {
        rect: Rect,
        paint: Paint,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        stroke: Stroke,
    },
    Circle {
        center: (f32, f32),
        radius: f32,
        fill: Color,
    },
}

/// How image draws fail on a fault-injecting canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFault {
    /// The image is rejected; painting may carry on without it.
    Rejected,
    /// The sink breaks while the image is being written.
    BrokenSink,
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
    image_fault: Option<ImageFault>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// A canvas whose image draws always fail.
    pub fn failing_images() -> Self {
        Self::with_fault(Some(ImageFault::Rejected))
    }

    /// A canvas whose image draws fail with an I/O error.
    pub fn broken_sink_on_images() -> Self {
        Self::with_fault(Some(ImageFault::BrokenSink))
    }

    fn with_fault(image_fault: Option<ImageFault>) -> Self {
        Self {
            calls: Vec::new(),
            image_fault,
        }
    }

    pub fn texts(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.calls
            .iter()
            .any(|call| matches!(call, DrawCall::Text { text, .. } if text == needle))
    }

    pub fn image_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Image { .. }))
            .count()
    }
}

impl Canvas for RecordingCanvas {
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            x,
            y,
            style: *style,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &RasterImage, rect: Rect) -> Result<(), RenderError> {
        match self.image_fault {
            Some(ImageFault::Rejected) => {
                return Err(RenderError::InvalidImage("image drawing disabled".into()));
            }
            Some(ImageFault::BrokenSink) => {
                return Err(RenderError::Io(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "sink closed while writing image",
                )));
            }
            None => {}
        }
        if !image.is_consistent() {
            return Err(RenderError::InvalidImage(format!(
                "{}x{} raster with {} bytes",
                image.width,
                image.height,
                image.pixels.len()
            )));
        }
        self.calls.push(DrawCall::Image {
            width: image.width,
            height: image.height,
            rect,
        });
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, paint: Paint) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Rect { rect, paint });
        Ok(())
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Line { from, to, stroke });
        Ok(())
    }

    fn draw_circle(&mut self, center: (f32, f32), radius: f32, fill: Color) -> Result<(), RenderError> {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            fill,
        });
        Ok(())
    }
}

/// A [`DocumentRenderer`] that keeps each page's draw calls and writes a
/// one-line summary per page to the sink on `finish`.
pub struct RecordingRenderer<W: Write> {
    writer: Option<W>,
    pub pages: Vec<(Size, Vec<DrawCall>)>,
    image_fault: Option<ImageFault>,
}

impl<W: Write> RecordingRenderer<W> {
    pub fn new() -> Self {
        Self {
            writer: None,
            pages: Vec::new(),
            image_fault: None,
        }
    }

    pub fn failing_images() -> Self {
        Self {
            image_fault: Some(ImageFault::Rejected),
            ..Self::new()
        }
    }

    pub fn broken_sink_on_images() -> Self {
        Self {
            image_fault: Some(ImageFault::BrokenSink),
            ..Self::new()
        }
    }
}

impl<W: Write> DocumentRenderer<W> for RecordingRenderer<W> {
    fn begin_document(&mut self, writer: W) -> Result<(), RenderError> {
        self.writer = Some(writer);
        Ok(())
    }

    fn render_page(
        &mut self,
        size: Size,
        paint: &mut dyn FnMut(&mut dyn Canvas) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        let mut canvas = RecordingCanvas::with_fault(self.image_fault);
        paint(&mut canvas)?;
        self.pages.push((size, canvas.calls));
        Ok(())
    }

    fn pages_written(&self) -> usize {
        self.pages.len()
    }

    fn finish(self: Box<Self>) -> Result<W, RenderError> {
        let this = *self;
        let mut writer = this
            .writer
            .ok_or_else(|| RenderError::Other("finish called before begin_document".into()))?;
        for (i, (size, calls)) in this.pages.iter().enumerate() {
            writeln!(
                writer,
                "page {}: {:.2}x{:.2}pt, {} draw call(s)",
                i + 1,
                size.width,
                size.height,
                calls.len()
            )?;
        }
        writer.flush()?;
        Ok(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderer_records_pages_and_summarizes() {
        let mut renderer: Box<RecordingRenderer<Vec<u8>>> = Box::new(RecordingRenderer::new());
        renderer.begin_document(Vec::new()).unwrap();
        renderer
            .render_page(Size::new(100.0, 200.0), &mut |canvas| {
                canvas.draw_text("hello", 1.0, 2.0, &TextStyle::regular(9.0, Color::BLACK))
            })
            .unwrap();
        assert_eq!(renderer.pages_written(), 1);
        let out = String::from_utf8(renderer.finish().unwrap()).unwrap();
        assert_eq!(out, "page 1: 100.00x200.00pt, 1 draw call(s)\n");
    }

    #[test]
    fn rejects_inconsistent_rasters() {
        let mut canvas = RecordingCanvas::new();
        let bad = RasterImage::new(3, 3, vec![0; 4]);
        assert!(canvas.draw_image(&bad, Rect::new(0.0, 0.0, 1.0, 1.0)).is_err());
        assert_eq!(canvas.image_count(), 0);
    }

    #[test]
    fn finish_without_begin_is_an_error() {
        let renderer: Box<RecordingRenderer<Vec<u8>>> = Box::new(RecordingRenderer::new());
        assert!(matches!(renderer.finish(), Err(RenderError::Other(_))));
    }
}
