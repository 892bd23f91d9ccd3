use crate::writer::StreamingPdfWriter;
use lopdf::content::{Content, Operation};
use lopdf::{Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::HashMap;
use std::io::Write;
use waybill_render_core::utils::{estimate_text_width, flip_y};
use waybill_render_core::{Canvas, FontFace, Paint, RenderError, Stroke, TextAlign, TextStyle};
use waybill_types::{Color, RasterImage, Rect};

/// Bezier control-point factor for approximating a quarter circle.
const KAPPA: f32 = 0.552_284_8;
/// Baseline offset below the top of a line box, as a fraction of font size.
const ASCENT: f32 = 0.8;

/// Image XObjects already written, keyed by raster buffer address.
pub(crate) type ImageCache = HashMap<usize, String>;

/// Collects the content operations of one page. Images are written to the
/// sink immediately and referenced by name.
pub struct PdfPageCanvas<'a, W: Write> {
    writer: &'a mut StreamingPdfWriter<W>,
    images: &'a mut ImageCache,
    content: Content,
    page_height: f32,
}

impl<'a, W: Write> PdfPageCanvas<'a, W> {
    pub(crate) fn new(writer: &'a mut StreamingPdfWriter<W>, images: &'a mut ImageCache, page_height: f32) -> Self {
        Self {
            writer,
            images,
            content: Content { operations: Vec::new() },
            page_height,
        }
    }

    pub(crate) fn finish(self) -> Content {
        self.content
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn set_fill_color(&mut self, color: Color) {
        let [r, g, b] = color.to_unit();
        self.push("rg", vec![r.into(), g.into(), b.into()]);
    }

    fn set_stroke(&mut self, stroke: Stroke) {
        let [r, g, b] = stroke.color.to_unit();
        self.push("RG", vec![r.into(), g.into(), b.into()]);
        self.push("w", vec![stroke.width.into()]);
    }

    fn embed_image(&mut self, image: &RasterImage) -> Result<String, RenderError> {
        let key = std::sync::Arc::as_ptr(&image.pixels) as usize;
        if let Some(name) = self.images.get(&key) {
            return Ok(name.clone());
        }
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => image.width as i64,
                "Height" => image.height as i64,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            image.pixels.as_ref().clone(),
        );
        let id: ObjectId = self.writer.write_object(Object::Stream(stream))?;
        let name = format!("Im{}", self.images.len() + 1);
        self.writer.register_xobject(&name, id);
        self.images.insert(key, name.clone());
        Ok(name)
    }
}

impl<W: Write> Canvas for PdfPageCanvas<'_, W> {
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) -> Result<(), RenderError> {
        if text.is_empty() {
            return Ok(());
        }
        let font = match style.font {
            FontFace::Regular => "F1",
            FontFace::Bold => "F2",
        };
        let radians = style.angle.to_radians();
        let (sin, cos) = radians.sin_cos();
        let mut origin_x = x;
        let mut origin_y = flip_y(y + style.size * ASCENT, self.page_height);
        if style.align == TextAlign::Center {
            let half = estimate_text_width(text, style.size, style.font) / 2.0;
            origin_x -= half * cos;
            origin_y -= half * sin;
        }

        self.push("BT", vec![]);
        self.push("Tf", vec![Object::Name(font.as_bytes().to_vec()), style.size.into()]);
        self.set_fill_color(style.color);
        if style.angle == 0.0 {
            self.push("Td", vec![origin_x.into(), origin_y.into()]);
        } else {
            self.push(
                "Tm",
                vec![cos.into(), sin.into(), (-sin).into(), cos.into(), origin_x.into(), origin_y.into()],
            );
        }
        self.push("Tj", vec![Object::String(to_win_ansi(text), StringFormat::Literal)]);
        self.push("ET", vec![]);
        Ok(())
    }

    fn draw_image(&mut self, image: &RasterImage, rect: Rect) -> Result<(), RenderError> {
        if !image.is_consistent() {
            return Err(RenderError::InvalidImage(format!(
                "{}x{} raster with {} bytes",
                image.width,
                image.height,
                image.pixels.len()
            )));
        }
        let name = self.embed_image(image)?;
        let bottom = flip_y(rect.bottom(), self.page_height);
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![rect.width.into(), 0.into(), 0.into(), rect.height.into(), rect.x.into(), bottom.into()],
        );
        self.push("Do", vec![Object::Name(name.into_bytes())]);
        self.push("Q", vec![]);
        Ok(())
    }

    fn draw_rect(&mut self, rect: Rect, paint: Paint) -> Result<(), RenderError> {
        let bottom = flip_y(rect.bottom(), self.page_height);
        let operands = vec![rect.x.into(), bottom.into(), rect.width.into(), rect.height.into()];
        match paint {
            Paint::Fill(color) => {
                self.set_fill_color(color);
                self.push("re", operands);
                self.push("f", vec![]);
            }
            Paint::Stroke(stroke) => {
                self.set_stroke(stroke);
                self.push("re", operands);
                self.push("S", vec![]);
            }
        }
        Ok(())
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Stroke) -> Result<(), RenderError> {
        self.set_stroke(stroke);
        self.push("m", vec![from.0.into(), flip_y(from.1, self.page_height).into()]);
        self.push("l", vec![to.0.into(), flip_y(to.1, self.page_height).into()]);
        self.push("S", vec![]);
        Ok(())
    }

    fn draw_circle(&mut self, center: (f32, f32), radius: f32, fill: Color) -> Result<(), RenderError> {
        let (cx, cy) = (center.0, flip_y(center.1, self.page_height));
        let k = radius * KAPPA;
        self.set_fill_color(fill);
        self.push("m", vec![(cx + radius).into(), cy.into()]);
        let quarters = [
            [cx + radius, cy + k, cx + k, cy + radius, cx, cy + radius],
            [cx - k, cy + radius, cx - radius, cy + k, cx - radius, cy],
            [cx - radius, cy - k, cx - k, cy - radius, cx, cy - radius],
            [cx + k, cy - radius, cx + radius, cy - k, cx + radius, cy],
        ];
        for q in quarters {
            self.push("c", q.iter().map(|v| (*v).into()).collect());
        }
        self.push("f", vec![]);
        Ok(())
    }
}

/// Encodes text for the standard fonts' WinAnsiEncoding. Characters outside
/// the code page become `?`.
pub fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            c if (c as u32) < 0x80 || (0xA0..=0xFF).contains(&(c as u32)) => c as u8,
            _ => b'?',
        })
        .collect()
}
