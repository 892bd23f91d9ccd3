//! The request pipeline: lookup, layout, images, painting, output.
//!
//! Layout and painting are synchronous and run on a blocking task. The
//! barcode and QR images are produced concurrently beforehand; either one
//! failing only removes that image from the document.

use crate::config::GeneratorConfig;
use crate::error::DocumentError;
use chrono::Utc;
use log::{debug, info, warn};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use waybill_layout::{LayoutConfig, RenderPlan, assemble};
use waybill_render_core::{DocumentAssets, DocumentRenderer, PagePainter, RenderError};
use waybill_render_lopdf::LopdfRenderer;
use waybill_source::RecordSource;
use waybill_symbology::{
    BarcodeGenerator, LinearBarcodeGenerator, QrCodeGenerator, QrGenerator, Symbology,
};
use waybill_types::{PageGeometry, RasterImage, ShipmentRecord};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// A finished document held in memory.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub document_id: String,
    pub page_count: usize,
}

/// What a streamed render produced, alongside the sink handed back.
#[derive(Debug)]
pub struct RenderOutcome<W> {
    pub sink: W,
    pub page_count: usize,
    pub decorative_failures: usize,
}

/// A document written to disk by [`DocumentGenerator::generate_to_file`].
#[derive(Debug, Clone)]
pub struct WrittenDocument {
    pub path: PathBuf,
    pub page_count: usize,
    pub decorative_failures: usize,
}

/// Shared stop signal for an in-flight render. Checked before every page.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Raises the flag when dropped while armed, so abandoning a render future
/// also stops the blocking task that paints it.
struct CancelOnDrop {
    flag: CancellationFlag,
    armed: bool,
}

impl CancelOnDrop {
    fn new(flag: CancellationFlag) -> Self {
        Self { flag, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed {
            debug!("Render future dropped; cancelling.");
            self.flag.cancel();
        }
    }
}

pub struct DocumentGenerator {
    source: Arc<dyn RecordSource>,
    barcode: Arc<dyn BarcodeGenerator>,
    qr: Arc<dyn QrGenerator>,
    config: Arc<GeneratorConfig>,
    layout: Arc<LayoutConfig>,
}

impl DocumentGenerator {
    pub fn new(source: Arc<dyn RecordSource>, config: GeneratorConfig) -> Result<Self, DocumentError> {
        config.validate()?;
        let layout = Arc::new(config.layout_config());
        Ok(Self {
            source,
            barcode: Arc::new(LinearBarcodeGenerator::default()),
            qr: Arc::new(QrCodeGenerator::default()),
            config: Arc::new(config),
            layout,
        })
    }

    pub fn with_barcode_generator(mut self, barcode: Arc<dyn BarcodeGenerator>) -> Self {
        self.barcode = barcode;
        self
    }

    pub fn with_qr_generator(mut self, qr: Arc<dyn QrGenerator>) -> Self {
        self.qr = qr;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Finds the record for `code`, honouring the configured case folding.
    pub async fn lookup(&self, code: &str) -> Result<ShipmentRecord, DocumentError> {
        let code = normalize_code(code)?;
        self.source
            .find_by_tracking_number(code, self.config.tracking.case_insensitive_lookup)
            .await?
            .ok_or_else(|| DocumentError::NotFound(code.to_string()))
    }

    /// Renders the whole document into memory.
    pub async fn generate_document(
        &self,
        code: &str,
        geometry: &PageGeometry,
    ) -> Result<GeneratedDocument, DocumentError> {
        let (plan, record) = self.prepare(code, geometry).await?;
        let filename = sanitize_filename(&record.tracking_number);
        let document_id = plan.document_id.clone();
        let outcome = self
            .render(plan, record, Vec::new(), CancellationFlag::new())
            .await?;
        Ok(GeneratedDocument {
            bytes: outcome.sink,
            filename,
            document_id,
            page_count: outcome.page_count,
        })
    }

    /// Streams the document into `sink`, page by page. When `cancel` is raised
    /// no further pages are written and the document is left unfinished.
    pub async fn generate_to_writer<W>(
        &self,
        code: &str,
        geometry: &PageGeometry,
        sink: W,
        cancel: CancellationFlag,
    ) -> Result<RenderOutcome<W>, DocumentError>
    where
        W: Write + Send + 'static,
    {
        let (plan, record) = self.prepare(code, geometry).await?;
        self.render(plan, record, sink, cancel).await
    }

    /// Writes `{tracking number}.pdf` into `out_dir`. Output goes to a
    /// temporary file beside the target and is renamed into place only once
    /// the document is complete, so a failed request leaves nothing behind.
    pub async fn generate_to_file(
        &self,
        code: &str,
        geometry: &PageGeometry,
        out_dir: &Path,
        cancel: CancellationFlag,
    ) -> Result<WrittenDocument, DocumentError> {
        let (plan, record) = self.prepare(code, geometry).await?;
        let path = out_dir.join(sanitize_filename(&record.tracking_number));

        std::fs::create_dir_all(out_dir)?;
        let staging = tempfile::Builder::new()
            .prefix(".waybill-")
            .suffix(".pdf.part")
            .tempfile_in(out_dir)?;
        let outcome = self.render(plan, record, BufWriter::new(staging), cancel).await?;

        let staging = outcome.sink.into_inner().map_err(|e| e.into_error())?;
        staging.persist(&path).map_err(|e| e.error)?;
        debug!("Persisted {}.", path.display());
        Ok(WrittenDocument {
            path,
            page_count: outcome.page_count,
            decorative_failures: outcome.decorative_failures,
        })
    }

    /// Everything that can fail before any byte is written.
    async fn prepare(
        &self,
        code: &str,
        geometry: &PageGeometry,
    ) -> Result<(RenderPlan, ShipmentRecord), DocumentError> {
        normalize_code(code)?;
        geometry
            .validate()
            .map_err(|e| DocumentError::Configuration(e.to_string()))?;
        let record = self.lookup(code).await?;
        let mut plan = assemble(&record, geometry, &self.layout)?;
        plan.stamp(Utc::now().format(TIMESTAMP_FORMAT).to_string());
        Ok((plan, record))
    }

    async fn render<W>(
        &self,
        plan: RenderPlan,
        record: ShipmentRecord,
        sink: W,
        cancel: CancellationFlag,
    ) -> Result<RenderOutcome<W>, DocumentError>
    where
        W: Write + Send + 'static,
    {
        let guard = CancelOnDrop::new(cancel.clone());
        let tracking_url = tracking_url(&self.config, &record.tracking_number);
        let (barcode, qr) = self.encode_images(&record.tracking_number, &tracking_url).await;
        let assets = DocumentAssets {
            barcode,
            qr,
            tracking_url,
        };

        let layout = Arc::clone(&self.layout);
        let title = format!("Shipment {}", record.tracking_number);
        let outcome = tokio::task::spawn_blocking(move || {
            let renderer: Box<dyn DocumentRenderer<W>> = Box::new(LopdfRenderer::new().with_title(title));
            render_document(renderer, sink, &plan, &record, &layout, &assets, &cancel)
        })
        .await??;
        guard.disarm();

        info!(
            "Generated {} page(s) ({} decorative element(s) skipped).",
            outcome.page_count, outcome.decorative_failures
        );
        Ok(outcome)
    }

    async fn encode_images(&self, code: &str, url: &str) -> (Option<RasterImage>, Option<RasterImage>) {
        let barcode = {
            let generator = Arc::clone(&self.barcode);
            let text = code.to_string();
            tokio::task::spawn_blocking(move || generator.encode(&text, Symbology::Code128))
        };
        let qr = {
            let generator = Arc::clone(&self.qr);
            let text = url.to_string();
            tokio::task::spawn_blocking(move || generator.encode(&text))
        };
        let (barcode, qr) = tokio::join!(barcode, qr);
        (
            image_or_warn("barcode", barcode),
            image_or_warn("qr", qr),
        )
    }
}

fn image_or_warn<E: std::fmt::Display>(
    element: &str,
    result: Result<Result<RasterImage, E>, tokio::task::JoinError>,
) -> Option<RasterImage> {
    match result {
        Ok(Ok(image)) => Some(image),
        Ok(Err(e)) => {
            warn!("Omitting {}: {}", element, e);
            None
        }
        Err(e) => {
            warn!("Omitting {}: generator task failed: {}", element, e);
            None
        }
    }
}

/// Drives `renderer` through every page of `plan`.
pub fn render_document<W: Write>(
    mut renderer: Box<dyn DocumentRenderer<W>>,
    sink: W,
    plan: &RenderPlan,
    record: &ShipmentRecord,
    layout: &LayoutConfig,
    assets: &DocumentAssets,
    cancel: &CancellationFlag,
) -> Result<RenderOutcome<W>, RenderError> {
    let painter = PagePainter::new(plan, record, layout, assets);
    let size = plan.geometry.page_size();

    renderer.begin_document(sink)?;
    for page in &plan.pages {
        if cancel.is_cancelled() {
            warn!(
                "Generation of '{}' cancelled after {} of {} page(s).",
                plan.tracking_number,
                renderer.pages_written(),
                plan.page_count()
            );
            return Err(RenderError::Cancelled(renderer.pages_written()));
        }
        renderer.render_page(size, &mut |canvas| painter.paint(page, canvas))?;
    }
    let page_count = renderer.pages_written();
    let sink = renderer.finish()?;
    debug!("Finished document {}.", plan.document_id);

    Ok(RenderOutcome {
        sink,
        page_count,
        decorative_failures: painter.decorative_failures(),
    })
}

fn normalize_code(code: &str) -> Result<&str, DocumentError> {
    let code = code.trim();
    if code.is_empty() {
        return Err(DocumentError::Configuration(
            "tracking number must not be empty".into(),
        ));
    }
    Ok(code)
}

/// `{tracking number}.pdf` with anything outside `[A-Za-z0-9._-]` replaced by `-`.
pub fn sanitize_filename(tracking_number: &str) -> String {
    let stem: String = tracking_number
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!("{}.pdf", stem)
}

/// The link printed under history markers and encoded in the QR code.
pub fn tracking_url(config: &GeneratorConfig, tracking_number: &str) -> String {
    match config.tracking.public_url.as_deref() {
        Some(url) if !url.trim().is_empty() => url.to_string(),
        _ => format!(
            "{}/track?code={}",
            config.tracking.base_url.trim_end_matches('/'),
            percent_encode(tracking_number)
        ),
    }
}

/// Query-component encoding that leaves `!'()*` readable, matching what
/// browsers produce for tracking links.
fn percent_encode(text: &str) -> String {
    const KEPT: [(&str, &str); 5] = [("%21", "!"), ("%27", "'"), ("%28", "("), ("%29", ")"), ("%2A", "*")];
    KEPT.iter()
        .fold(urlencoding::encode(text).into_owned(), |encoded, (escape, ch)| {
            encoded.replace(escape, ch)
        })
}
