use crate::canvas::{ImageCache, PdfPageCanvas};
use crate::writer::StreamingPdfWriter;
use log::debug;
use lopdf::{Dictionary, Object, StringFormat, dictionary};
use std::io::Write;
use waybill_render_core::{Canvas, DocumentRenderer, RenderError};
use waybill_types::Size;

const FONTS: [(&str, &str); 2] = [("F1", "Helvetica"), ("F2", "Helvetica-Bold")];

/// A PDF renderer on top of [`StreamingPdfWriter`].
pub struct LopdfRenderer<W: Write> {
    writer: Option<StreamingPdfWriter<W>>,
    images: ImageCache,
    title: Option<String>,
    producer: String,
}

impl<W: Write> Default for LopdfRenderer<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> LopdfRenderer<W> {
    pub fn new() -> Self {
        Self {
            writer: None,
            images: ImageCache::new(),
            title: None,
            producer: format!("waybill {}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Sets the document title written to the info dictionary.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn info_dict(&self) -> Dictionary {
        let mut info = dictionary! {
            "Producer" => Object::String(self.producer.clone().into_bytes(), StringFormat::Literal),
        };
        if let Some(title) = &self.title {
            info.set("Title", Object::String(crate::to_win_ansi(title), StringFormat::Literal));
        }
        info
    }
}

impl<W: Write> DocumentRenderer<W> for LopdfRenderer<W> {
    fn begin_document(&mut self, writer: W) -> Result<(), RenderError> {
        let mut font_dict = Dictionary::new();
        for (internal_name, base_font) in FONTS {
            let single_font_dict = dictionary! {
                "Type" => "Font", "Subtype" => "Type1", "BaseFont" => base_font, "Encoding" => "WinAnsiEncoding",
            };
            font_dict.set(internal_name.as_bytes(), Object::Dictionary(single_font_dict));
        }

        let mut pdf = StreamingPdfWriter::new(writer, "1.7", font_dict)?;
        pdf.set_info(self.info_dict());
        self.writer = Some(pdf);
        Ok(())
    }

    fn render_page(
        &mut self,
        size: Size,
        paint: &mut dyn FnMut(&mut dyn Canvas) -> Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| RenderError::Other("Document not started".into()))?;

        let mut canvas = PdfPageCanvas::new(writer, &mut self.images, size.height);
        paint(&mut canvas)?;
        let content = canvas.finish();
        let operations = content.operations.len();

        let content_id = writer.write_content_stream(content)?;
        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => writer.pages_id,
            "MediaBox" => vec![0.0.into(), 0.0.into(), size.width.into(), size.height.into()],
            "Contents" => content_id,
            "Resources" => writer.resources_id,
        };
        let page_id = writer.write_object(page_dict.into())?;
        writer.add_page(page_id);
        debug!(
            "Wrote page {} ({} operations, {} bytes so far).",
            writer.page_count(),
            operations,
            writer.bytes_written()
        );
        Ok(())
    }

    fn pages_written(&self) -> usize {
        self.writer.as_ref().map_or(0, StreamingPdfWriter::page_count)
    }

    fn finish(self: Box<Self>) -> Result<W, RenderError> {
        let mut renderer = *self;
        if let Some(internal_writer) = renderer.writer.take() {
            let writer = internal_writer.finish()?;
            Ok(writer)
        } else {
            Err(RenderError::Other(
                "Document was never started with begin_document".into(),
            ))
        }
    }
}
