use lopdf::content::Content;
use lopdf::{Dictionary, Object, ObjectId, Stream, dictionary};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Tracks the byte offset of everything written so the cross-reference table
/// can be built without requiring `Seek` on the sink.
struct CountingWriter<W: Write> {
    inner: W,
    written: u64,
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writes a PDF incrementally: page content, page dictionaries and images go
/// to the sink as soon as they are produced. Only the shared resources, the
/// page tree and the catalog wait for `finish`.
pub struct StreamingPdfWriter<W: Write> {
    writer: CountingWriter<W>,
    offsets: BTreeMap<u32, u64>,
    max_id: u32,
    pub catalog_id: ObjectId,
    pub pages_id: ObjectId,
    pub resources_id: ObjectId,
    font_dict: Dictionary,
    xobjects: Dictionary,
    page_ids: Vec<ObjectId>,
    info: Option<Dictionary>,
}

impl<W: Write> StreamingPdfWriter<W> {
    pub fn new(writer: W, version: &str, font_dict: Dictionary) -> io::Result<Self> {
        let mut writer = CountingWriter { inner: writer, written: 0 };
        writer.write_all(format!("%PDF-{}\n%âãÏÓ\n", version).as_bytes())?;

        Ok(Self {
            writer,
            offsets: BTreeMap::new(),
            max_id: 3,
            resources_id: (1, 0),
            pages_id: (2, 0),
            catalog_id: (3, 0),
            font_dict,
            xobjects: Dictionary::new(),
            page_ids: Vec::new(),
            info: None,
        })
    }

    pub fn new_object_id(&mut self) -> ObjectId {
        self.max_id += 1;
        (self.max_id, 0)
    }

    pub fn bytes_written(&self) -> u64 {
        self.writer.written
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Writes `object` to the sink immediately under a fresh id.
    pub fn write_object(&mut self, object: Object) -> io::Result<ObjectId> {
        let id = self.new_object_id();
        self.write_object_at_id(id, &object)?;
        Ok(id)
    }

    fn write_object_at_id(&mut self, id: ObjectId, object: &Object) -> io::Result<()> {
        self.offsets.insert(id.0, self.writer.written);
        internal_writer::write_indirect_object(&mut self.writer, id, object)
    }

    pub fn write_content_stream(&mut self, content: Content) -> io::Result<ObjectId> {
        let bytes = content
            .encode()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
        let stream = Stream::new(dictionary! {}, bytes);
        self.write_object(Object::Stream(stream))
    }

    /// Registers an image XObject under `name` in the shared resources.
    pub fn register_xobject(&mut self, name: &str, id: ObjectId) {
        self.xobjects.set(name.as_bytes(), Object::Reference(id));
    }

    pub fn add_page(&mut self, page_id: ObjectId) {
        self.page_ids.push(page_id);
    }

    pub fn set_info(&mut self, info: Dictionary) {
        self.info = Some(info);
    }

    pub fn finish(mut self) -> io::Result<W> {
        let mut resources = dictionary! { "Font" => Object::Dictionary(self.font_dict.clone()) };
        if !self.xobjects.is_empty() {
            resources.set("XObject", Object::Dictionary(self.xobjects.clone()));
        }
        self.write_object_at_id(self.resources_id, &resources.into())?;

        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => self.page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<Object>>(),
            "Count" => self.page_ids.len() as i64,
        };
        self.write_object_at_id(self.pages_id, &pages_dict.into())?;

        let catalog_dict = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        self.write_object_at_id(self.catalog_id, &catalog_dict.into())?;

        let mut trailer = dictionary! { "Size" => (self.max_id + 1) as i64, "Root" => self.catalog_id };
        if let Some(info) = self.info.take() {
            let info_id = self.write_object(info.into())?;
            trailer.set("Info", info_id);
            trailer.set("Size", (self.max_id + 1) as i64);
        }

        let xref_start = self.writer.written;
        internal_writer::write_xref(&mut self.writer, &self.offsets, self.max_id)?;

        writeln!(self.writer, "trailer")?;
        internal_writer::write_dictionary(&mut self.writer, &trailer)?;
        writeln!(self.writer, "\nstartxref")?;
        writeln!(self.writer, "{}", xref_start)?;
        write!(self.writer, "%%EOF")?;

        self.writer.flush()?;
        Ok(self.writer.inner)
    }
}

mod internal_writer {
    use super::*;
    use lopdf::StringFormat;

    pub fn write_indirect_object<W: Write>(writer: &mut W, id: ObjectId, object: &Object) -> io::Result<()> {
        writeln!(writer, "{} {} obj", id.0, id.1)?;
        write_object(writer, object)?;
        writeln!(writer, "\nendobj")
    }

    pub fn write_object(out: &mut dyn Write, object: &Object) -> io::Result<()> {
        match object {
            Object::Null => out.write_all(b"null"),
            Object::Boolean(value) => write!(out, "{}", value),
            Object::Integer(value) => write!(out, "{}", value),
            Object::Real(value) => write_real(out, *value),
            Object::Name(name) => write_name(out, name),
            Object::String(bytes, StringFormat::Literal) => write_literal(out, bytes),
            Object::String(bytes, StringFormat::Hexadecimal) => {
                out.write_all(b"<")?;
                for byte in bytes {
                    write!(out, "{:02X}", byte)?;
                }
                out.write_all(b">")
            }
            Object::Array(items) => {
                out.write_all(b"[")?;
                let mut first = true;
                for item in items {
                    if !first {
                        out.write_all(b" ")?;
                    }
                    first = false;
                    write_object(out, item)?;
                }
                out.write_all(b"]")
            }
            Object::Dictionary(dict) => write_dictionary(out, dict),
            Object::Stream(stream) => {
                let mut dict = stream.dict.clone();
                dict.set("Length", stream.content.len() as i64);
                write_dictionary(out, &dict)?;
                out.write_all(b"\nstream\n")?;
                out.write_all(&stream.content)?;
                out.write_all(b"\nendstream")
            }
            Object::Reference((id, generation)) => write!(out, "{} {} R", id, generation),
        }
    }

    /// Keys are written in insertion order.
    pub fn write_dictionary(out: &mut dyn Write, dict: &Dictionary) -> io::Result<()> {
        out.write_all(b"<<")?;
        for (key, value) in dict.iter() {
            write_name(out, key)?;
            out.write_all(b" ")?;
            write_object(out, value)?;
            out.write_all(b" ")?;
        }
        out.write_all(b">>")
    }

    /// Bytes outside the regular character set are `#xx`-escaped.
    fn write_name(out: &mut dyn Write, name: &[u8]) -> io::Result<()> {
        let regular = |byte: &u8| (b'!'..=b'~').contains(byte) && !b"()<>[]{}/%#".contains(byte);
        out.write_all(b"/")?;
        if name.iter().all(regular) {
            return out.write_all(name);
        }
        for byte in name {
            if regular(byte) {
                out.write_all(&[*byte])?;
            } else {
                write!(out, "#{:02X}", byte)?;
            }
        }
        Ok(())
    }

    fn write_literal(out: &mut dyn Write, bytes: &[u8]) -> io::Result<()> {
        out.write_all(b"(")?;
        for &byte in bytes {
            match byte {
                b'(' | b')' | b'\\' => out.write_all(&[b'\\', byte])?,
                b'\r' => out.write_all(b"\\r")?,
                _ => out.write_all(&[byte])?,
            }
        }
        out.write_all(b")")
    }

    /// Fixed-point with trailing zeros dropped; PDF has no exponent syntax.
    fn write_real(out: &mut dyn Write, value: impl std::fmt::Display) -> io::Result<()> {
        let text = format!("{:.3}", value);
        out.write_all(text.trim_end_matches('0').trim_end_matches('.').as_bytes())
    }

    /// Every id in `1..=max_id` is written exactly once, so a single
    /// contiguous section starting at the free head entry covers them all.
    pub fn write_xref<W: Write>(writer: &mut W, offsets: &BTreeMap<u32, u64>, max_id: u32) -> io::Result<()> {
        writeln!(writer, "xref")?;
        writeln!(writer, "0 {}", max_id + 1)?;
        writeln!(writer, "0000000000 65535 f ")?;
        for id in 1..=max_id {
            match offsets.get(&id) {
                Some(offset) => writeln!(writer, "{:010} 00000 n ", offset)?,
                None => writeln!(writer, "0000000000 65535 f ")?,
            }
        }
        Ok(())
    }
}
