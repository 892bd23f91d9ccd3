//! Turns one planned page into canvas calls.
//!
//! The painter never decides where a block goes; the [`RenderPlan`] already
//! did. It only knows how each block looks inside the rectangle it was given.

use crate::error::{DecorativeDrawError, RenderError};
use crate::traits::{Canvas, Paint, Stroke, TextStyle};
use crate::utils::{truncate_chars, wrap_text};
use log::{debug, warn};
use std::cell::Cell;
use waybill_layout::{
    BlockKind, Branding, ContinuationMarker, HeaderKind, LayoutConfig, Page, PagePortion,
    PlacedBlock, RenderPlan, SectionKind,
};
use waybill_types::record::present;
use waybill_types::{Color, HistoryEvent, Package, RasterImage, Rect, ShipmentRecord, ShipmentStatus};

const MISSING: &str = "-";
const DESCRIPTION_CHARS: usize = 40;
const REMARKS_CHARS: usize = 120;

/// Column start positions of the package table, as fractions of the content width.
const PACKAGE_COLUMNS: [(&str, f32); 5] = [
    ("Type", 0.0),
    ("Description", 0.16),
    ("Dimensions", 0.58),
    ("Weight", 0.78),
    ("Qty", 0.9),
];

// Summary sub-layout, relative to the summary block top. Everything it
// draws ends within `SUMMARY_MIN_HEIGHT`.
const TRACKING_BOX_TOP: f32 = 26.0;
const TRACKING_BOX_HEIGHT: f32 = 180.0;
const LINE: f32 = 14.0;

/// Pre-rendered images and links shared by every page of one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssets {
    pub barcode: Option<RasterImage>,
    pub qr: Option<RasterImage>,
    pub tracking_url: String,
}

pub struct PagePainter<'a> {
    plan: &'a RenderPlan,
    record: &'a ShipmentRecord,
    config: &'a LayoutConfig,
    assets: &'a DocumentAssets,
    decorative_failures: Cell<usize>,
}

impl<'a> PagePainter<'a> {
    pub fn new(
        plan: &'a RenderPlan,
        record: &'a ShipmentRecord,
        config: &'a LayoutConfig,
        assets: &'a DocumentAssets,
    ) -> Self {
        Self {
            plan,
            record,
            config,
            assets,
            decorative_failures: Cell::new(0),
        }
    }

    /// Number of decorative elements skipped so far across all painted pages.
    pub fn decorative_failures(&self) -> usize {
        self.decorative_failures.get()
    }

    fn branding(&self) -> &Branding {
        &self.config.branding
    }

    pub fn paint(&self, page: &Page, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        debug!(
            "Painting page {}/{} with {} block(s).",
            page.footer.page_number,
            page.footer.page_count,
            page.blocks.len()
        );
        self.paint_watermark(page, canvas)?;
        self.paint_header(page.header, canvas)?;

        let content = self.plan.geometry.content_rect();
        for block in &page.blocks {
            let area = Rect::new(content.x, content.y + block.y, content.width, block.height);
            self.paint_block(page, block, area, canvas)?;
        }

        self.paint_footer(page, canvas)
    }

    /// Runs a decorative draw. A bad image or draw is logged and counted; an
    /// I/O failure means the sink is broken and still aborts the document.
    fn decorative(
        &self,
        page: &Page,
        element: &'static str,
        result: Result<(), RenderError>,
    ) -> Result<(), RenderError> {
        match result {
            Ok(()) => Ok(()),
            Err(err @ RenderError::Io(_)) => Err(err),
            Err(source) => {
                let err = DecorativeDrawError {
                    element,
                    page: page.footer.page_number,
                    source,
                };
                warn!("{}", err);
                self.decorative_failures.set(self.decorative_failures.get() + 1);
                Ok(())
            }
        }
    }

    fn paint_watermark(&self, page: &Page, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let Some(text) = self.branding().watermark.as_deref() else {
            return Ok(());
        };
        if text.trim().is_empty() {
            return Ok(());
        }
        let size = self.plan.geometry.page_size();
        let style = TextStyle::bold(56.0, self.branding().watermark_color)
            .centered()
            .rotated(45.0);
        let result = canvas.draw_text(text, size.width / 2.0, size.height / 2.0, &style);
        self.decorative(page, "watermark", result)
    }

    fn paint_header(&self, kind: HeaderKind, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let geometry = &self.plan.geometry;
        let brand = self.branding();
        canvas.draw_rect(
            Rect::new(0.0, 0.0, geometry.width, geometry.top_band),
            Paint::Fill(brand.primary),
        )?;
        let x = geometry.margin;
        match kind {
            HeaderKind::Full => {
                canvas.draw_text(&brand.company_name, x, 12.0, &TextStyle::bold(20.0, brand.on_primary))?;
                canvas.draw_text(&brand.tagline, x, 36.0, &TextStyle::regular(10.0, brand.on_primary_muted))
            }
            HeaderKind::Compact => {
                canvas.draw_text(&brand.company_name, x, 14.0, &TextStyle::bold(12.0, brand.on_primary))?;
                canvas.draw_text(
                    &brand.compact_tagline,
                    x,
                    32.0,
                    &TextStyle::regular(8.0, brand.on_primary_muted),
                )
            }
        }
    }

    fn paint_block(
        &self,
        page: &Page,
        block: &PlacedBlock,
        area: Rect,
        canvas: &mut dyn Canvas,
    ) -> Result<(), RenderError> {
        match block.kind {
            BlockKind::Summary => self.paint_summary(page, area, canvas),
            BlockKind::Section {
                section,
                portion,
                continued,
            } => {
                self.paint_heading(section, continued, area, canvas)?;
                match section {
                    SectionKind::Packages => self.paint_package_rows(portion, area, canvas),
                    SectionKind::History => self.paint_history_rows(portion, area, canvas),
                }
            }
            BlockKind::Continuation { section, marker } => {
                self.paint_continuation(section, marker, area, canvas)
            }
            BlockKind::EmptySection(section) => {
                self.paint_heading(section, false, area, canvas)?;
                let note = match section {
                    SectionKind::Packages => "No packages recorded.",
                    SectionKind::History => "No history recorded yet.",
                };
                canvas.draw_text(
                    note,
                    area.x,
                    area.y + self.config.metrics.section_heading_height,
                    &TextStyle::regular(9.0, self.branding().label),
                )
            }
        }
    }

    fn paint_summary(&self, page: &Page, area: Rect, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let brand = self.branding();
        let record = self.record;
        let (x, y0) = (area.x, area.y);
        let left_width = area.width * 0.5 - 10.0;
        let right_x = x + left_width + 20.0;

        canvas.draw_text("SHIPMENT DETAILS", x, y0, &TextStyle::bold(16.0, brand.primary))?;

        let box_top = y0 + TRACKING_BOX_TOP;
        canvas.draw_rect(
            Rect::new(x - 6.0, box_top - 6.0, left_width + 12.0, TRACKING_BOX_HEIGHT + 12.0),
            Paint::Stroke(Stroke {
                color: brand.border,
                width: 1.0,
            }),
        )?;
        canvas.draw_text("TRACKING", x, box_top, &TextStyle::bold(10.0, brand.primary))?;

        let status_color = status_color(&record.status);
        let tracking_rows: [(&str, &str, Option<Color>); 6] = [
            ("Tracking Number:", record.tracking_number.as_str(), None),
            ("Status:", record.status.label(), Some(status_color)),
            ("Expected Delivery:", or_missing(&record.expected_delivery_date), None),
            ("Pickup Date:", or_missing(&record.pickup_date), None),
            ("Pickup Time:", or_missing(&record.pickup_time), None),
            ("Departure:", or_missing(&record.departure_time), None),
        ];
        for (i, (label, value, color)) in tracking_rows.iter().enumerate() {
            let row_y = box_top + LINE + i as f32 * LINE;
            canvas.draw_text(label, x, row_y, &TextStyle::regular(9.0, brand.label))?;
            let value_style = match color {
                Some(c) => TextStyle::bold(9.0, *c),
                None => TextStyle::bold(9.0, brand.value),
            };
            canvas.draw_text(value, x + 96.0, row_y, &value_style)?;
        }

        let codes_top = box_top + TRACKING_BOX_HEIGHT - 80.0;
        if let Some(barcode) = &self.assets.barcode {
            let rect = Rect::new(x, codes_top + 14.0, (left_width - 96.0).max(40.0), 54.0);
            let result = canvas.draw_image(barcode, rect);
            self.decorative(page, "barcode", result)?;
        }
        if let Some(qr) = &self.assets.qr {
            let rect = Rect::new(x + left_width - 80.0, codes_top, 80.0, 80.0);
            let result = canvas.draw_image(qr, rect);
            self.decorative(page, "qr", result)?;
        }

        canvas.draw_text("OVERVIEW", right_x, box_top, &TextStyle::bold(10.0, brand.primary))?;
        let weight = present(&record.weight).map(|w| format!("{} kg", w));
        let package_count = record.package_count_text();
        let overview: [(&str, &str); 8] = [
            ("Origin:", or_missing(&record.origin)),
            ("Destination:", or_missing(&record.destination)),
            ("Carrier:", or_missing(&record.carrier)),
            ("Carrier Ref:", or_missing(&record.carrier_reference_no)),
            ("Service Type:", or_missing(&record.shipment_type)),
            ("Mode:", or_missing(&record.shipment_mode)),
            ("Total Weight:", weight.as_deref().unwrap_or(MISSING)),
            ("Package Count:", package_count.as_str()),
        ];
        for (i, (label, value)) in overview.iter().enumerate() {
            let row_y = box_top + LINE + i as f32 * LINE;
            canvas.draw_text(label, right_x, row_y, &TextStyle::regular(9.0, brand.label))?;
            canvas.draw_text(value, right_x + 80.0, row_y, &TextStyle::bold(9.0, brand.value))?;
        }

        let parties_top = box_top + TRACKING_BOX_HEIGHT + 18.0;
        let party_width = left_width;
        self.paint_party(
            "SHIPPER",
            &record.shipper_name,
            &record.shipper_address,
            x,
            parties_top,
            party_width,
            canvas,
        )?;
        self.paint_party(
            "RECEIVER",
            &record.receiver_name,
            &record.receiver_address,
            right_x,
            parties_top,
            area.right() - right_x,
            canvas,
        )?;

        let details_top = parties_top + 64.0;
        canvas.draw_text("DETAILS", x, details_top, &TextStyle::bold(10.0, brand.primary))?;
        let freight = present(&record.freight_cost).map(|f| format!("${}", f));
        let details = format!(
            "Product: {}  |  Qty: {}  |  Payment: {}  |  Freight: {}",
            or_missing(&record.product_name),
            or_missing(&record.quantity),
            or_missing(&record.payment_mode),
            freight.as_deref().unwrap_or(MISSING),
        );
        canvas.draw_text(&details, x, details_top + LINE, &TextStyle::regular(9.0, brand.value))?;
        if let Some(comments) = present(&record.comments) {
            let line = format!("Comments: {}", truncate_chars(comments, REMARKS_CHARS));
            canvas.draw_text(&line, x, details_top + 2.0 * LINE, &TextStyle::regular(8.0, brand.label))?;
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn paint_party(
        &self,
        title: &str,
        name: &Option<String>,
        address: &Option<String>,
        x: f32,
        y: f32,
        width: f32,
        canvas: &mut dyn Canvas,
    ) -> Result<(), RenderError> {
        let brand = self.branding();
        canvas.draw_text(title, x, y, &TextStyle::bold(10.0, brand.primary))?;
        canvas.draw_text(or_missing(name), x, y + 16.0, &TextStyle::bold(9.0, brand.value))?;
        let address = or_missing(address);
        for (i, line) in wrap_text(address, width, 8.0, 2).iter().enumerate() {
            canvas.draw_text(line, x, y + 30.0 + i as f32 * 10.0, &TextStyle::regular(8.0, brand.label))?;
        }
        Ok(())
    }

    fn paint_heading(
        &self,
        section: SectionKind,
        continued: bool,
        area: Rect,
        canvas: &mut dyn Canvas,
    ) -> Result<(), RenderError> {
        let title = if continued {
            format!("{} (continued)", section.title())
        } else {
            section.title().to_string()
        };
        canvas.draw_text(&title, area.x, area.y + 2.0, &TextStyle::bold(12.0, self.branding().primary))
    }

    fn paint_package_rows(
        &self,
        portion: PagePortion,
        area: Rect,
        canvas: &mut dyn Canvas,
    ) -> Result<(), RenderError> {
        let brand = self.branding();
        let metrics = &self.config.metrics;
        let header_y = area.y + metrics.section_heading_height;
        canvas.draw_rect(
            Rect::new(area.x, header_y, area.width, metrics.table_header_height - 2.0),
            Paint::Fill(brand.primary),
        )?;
        for (label, fraction) in PACKAGE_COLUMNS {
            let col_x = area.x + 4.0 + fraction * area.width;
            canvas.draw_text(label, col_x, header_y + 5.0, &TextStyle::bold(9.0, brand.on_primary))?;
        }

        let rows_top = header_y + metrics.table_header_height;
        let rows = &self.record.packages[portion.start_index..portion.end_index()];
        for (k, package) in rows.iter().enumerate() {
            let row_y = rows_top + k as f32 * metrics.package_row_height;
            if (portion.start_index + k) % 2 == 0 {
                canvas.draw_rect(
                    Rect::new(area.x, row_y, area.width, metrics.package_row_height),
                    Paint::Fill(brand.stripe),
                )?;
            }
            let cells = package_cells(package);
            for ((_, fraction), cell) in PACKAGE_COLUMNS.iter().zip(cells.iter()) {
                let col_x = area.x + 4.0 + fraction * area.width;
                canvas.draw_text(cell, col_x, row_y + 5.0, &TextStyle::regular(9.0, brand.value))?;
            }
        }
        Ok(())
    }

    fn paint_history_rows(
        &self,
        portion: PagePortion,
        area: Rect,
        canvas: &mut dyn Canvas,
    ) -> Result<(), RenderError> {
        let brand = self.branding();
        let metrics = &self.config.metrics;
        let rows_top = area.y + metrics.section_heading_height;
        let row_height = metrics.history_row_height;
        let rows = &self.record.history[portion.start_index..portion.end_index()];
        let marker_x = area.x + 8.0;
        let text_x = area.x + 24.0;

        for (k, event) in rows.iter().enumerate() {
            let row_y = rows_top + k as f32 * row_height;
            if k + 1 < rows.len() {
                canvas.draw_line(
                    (marker_x, row_y + 6.0),
                    (marker_x, row_y + row_height + 6.0),
                    Stroke {
                        color: brand.border,
                        width: 1.5,
                    },
                )?;
            }
            canvas.draw_circle((marker_x, row_y + 6.0), 4.0, brand.primary)?;
            self.paint_history_event(event, text_x, row_y, canvas)?;
        }
        Ok(())
    }

    fn paint_history_event(
        &self,
        event: &HistoryEvent,
        x: f32,
        y: f32,
        canvas: &mut dyn Canvas,
    ) -> Result<(), RenderError> {
        let brand = self.branding();
        canvas.draw_text(or_missing(&event.status), x, y, &TextStyle::bold(10.0, brand.primary))?;

        let mut when = [present(&event.date), present(&event.time)]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if let Some(by) = present(&event.updated_by) {
            if !when.is_empty() {
                when.push_str("  \u{2022}  ");
            }
            when.push_str("by ");
            when.push_str(by);
        }
        if !when.is_empty() {
            canvas.draw_text(&when, x, y + 12.0, &TextStyle::regular(8.0, brand.label))?;
        }

        let location = format!(
            "Location: {}",
            present(&event.location).unwrap_or("Not specified")
        );
        canvas.draw_text(&location, x, y + 22.0, &TextStyle::regular(8.0, brand.value))?;

        if let Some(remarks) = present(&event.remarks) {
            let line = format!("Remarks: {}", truncate_chars(remarks, REMARKS_CHARS));
            canvas.draw_text(&line, x, y + 32.0, &TextStyle::regular(8.0, brand.label))?;
        }
        Ok(())
    }

    fn paint_continuation(
        &self,
        section: SectionKind,
        marker: ContinuationMarker,
        area: Rect,
        canvas: &mut dyn Canvas,
    ) -> Result<(), RenderError> {
        let brand = self.branding();
        let style = TextStyle::regular(9.0, brand.label);
        match section {
            SectionKind::Packages => canvas.draw_text(
                &format!(
                    "+ {} more package(s) available on the tracking page.",
                    marker.omitted
                ),
                area.x + 4.0,
                area.y + 6.0,
                &style,
            ),
            SectionKind::History => {
                canvas.draw_text(
                    &format!("+ {} more history entries. See full tracking:", marker.omitted),
                    area.x + 4.0,
                    area.y + 4.0,
                    &style,
                )?;
                canvas.draw_text(
                    &self.assets.tracking_url,
                    area.x + 4.0,
                    area.y + 16.0,
                    &TextStyle::regular(8.0, brand.primary),
                )
            }
        }
    }

    fn paint_footer(&self, page: &Page, canvas: &mut dyn Canvas) -> Result<(), RenderError> {
        let geometry = &self.plan.geometry;
        let brand = self.branding();
        let band = geometry.footer_rect();
        let x = geometry.margin;

        if page.is_last() {
            canvas.draw_text("Need help?", x, band.y + 4.0, &TextStyle::bold(9.0, brand.primary))?;
            canvas.draw_text(
                &brand.support_line,
                x + 58.0,
                band.y + 5.0,
                &TextStyle::regular(8.0, brand.label),
            )?;
        }

        let rule_y = band.y + 22.0;
        canvas.draw_line(
            (x, rule_y),
            (geometry.width - x, rule_y),
            Stroke {
                color: brand.border,
                width: 0.5,
            },
        )?;

        let footer = &page.footer;
        let mut parts = Vec::with_capacity(4);
        if let Some(ts) = &footer.generated_at {
            parts.push(format!("Document generated: {}", ts));
        }
        parts.push(format!("Tracking: {}", footer.tracking_number));
        parts.push(footer.document_id.clone());
        parts.push(format!("Page {} of {}", footer.page_number, footer.page_count));
        let line = parts.join("  \u{2022}  ");
        canvas.draw_text(
            &line,
            geometry.width / 2.0,
            rule_y + 10.0,
            &TextStyle::regular(8.0, brand.label).centered(),
        )
    }
}

fn or_missing(value: &Option<String>) -> &str {
    present(value).unwrap_or(MISSING)
}

fn package_cells(package: &Package) -> [String; 5] {
    let description = present(&package.description)
        .map(|d| truncate_chars(d, DESCRIPTION_CHARS).to_string())
        .unwrap_or_else(|| MISSING.to_string());
    let weight = present(&package.weight)
        .map(|w| format!("{} kg", w))
        .unwrap_or_else(|| MISSING.to_string());
    [
        or_missing(&package.piece_type).to_string(),
        description,
        or_missing(&package.dimensions).to_string(),
        weight,
        or_missing(&package.quantity).to_string(),
    ]
}

pub(crate) fn status_color(status: &ShipmentStatus) -> Color {
    match status {
        ShipmentStatus::Delivered => Color::rgb(0x28, 0xA7, 0x45),
        ShipmentStatus::InTransit | ShipmentStatus::OutForDelivery => Color::rgb(0x17, 0xA2, 0xB8),
        ShipmentStatus::Other(text) if text.eq_ignore_ascii_case("exception") => {
            Color::rgb(0xDC, 0x35, 0x45)
        }
        _ => Color::rgb(0x6C, 0x75, 0x7D),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawCall, RecordingCanvas};
    use waybill_layout::{SUMMARY_MIN_HEIGHT, assemble};
    use waybill_types::PageGeometry;

    fn record_with(packages: usize, history: usize) -> ShipmentRecord {
        let mut record = ShipmentRecord::new("WB123456");
        record.status = ShipmentStatus::InTransit;
        record.origin = Some("Lagos".into());
        record.weight = Some("12".into());
        record.packages = (0..packages)
            .map(|i| Package {
                piece_type: Some("Box".into()),
                description: Some(format!("Item {} {}", i, "x".repeat(60))),
                ..Default::default()
            })
            .collect();
        record.history = (0..history)
            .map(|i| HistoryEvent {
                status: Some(format!("Scan {}", i)),
                location: if i == 0 { None } else { Some("Hub".into()) },
                remarks: Some("r".repeat(200)),
                ..Default::default()
            })
            .collect();
        record
    }

    fn assets() -> DocumentAssets {
        DocumentAssets {
            barcode: Some(RasterImage::new(4, 2, vec![0; 8])),
            qr: Some(RasterImage::new(2, 2, vec![0; 4])),
            tracking_url: "https://track.example/track?code=WB123456".into(),
        }
    }

    fn paint_all(record: &ShipmentRecord, config: &LayoutConfig, canvas_factory: fn() -> RecordingCanvas) -> (Vec<RecordingCanvas>, usize) {
        let mut plan = assemble(record, &PageGeometry::a4(), config).unwrap();
        plan.stamp("2024-05-01 10:00:00 UTC");
        let assets = assets();
        let painter = PagePainter::new(&plan, record, config, &assets);
        let canvases = plan
            .pages
            .iter()
            .map(|page| {
                let mut canvas = canvas_factory();
                painter.paint(page, &mut canvas).unwrap();
                canvas
            })
            .collect();
        (canvases, painter.decorative_failures())
    }

    #[test]
    fn first_page_has_full_header_summary_and_codes() {
        let record = record_with(2, 2);
        let (pages, failures) = paint_all(&record, &LayoutConfig::default(), RecordingCanvas::new);
        assert_eq!(failures, 0);
        let first = &pages[0];
        assert!(first.contains_text("EXPRESS LOGISTICS"));
        assert!(first.contains_text("Global Logistics Solutions"));
        assert!(first.contains_text("SHIPMENT DETAILS"));
        assert!(first.contains_text("WB123456"));
        assert!(first.contains_text("In Transit"));
        assert!(first.contains_text("12 kg"));
        assert_eq!(first.image_count(), 2);
    }

    #[test]
    fn continuation_pages_use_compact_header_and_no_codes() {
        let record = record_with(0, 30);
        let (pages, _) = paint_all(&record, &LayoutConfig::default(), RecordingCanvas::new);
        assert!(pages.len() > 1);
        let later = &pages[1];
        assert!(later.contains_text("Shipment Packages & History"));
        assert!(!later.contains_text("SHIPMENT DETAILS"));
        assert!(later.contains_text("HISTORY (continued)"));
        assert_eq!(later.image_count(), 0);
    }

    #[test]
    fn truncates_descriptions_and_remarks() {
        let record = record_with(1, 1);
        let (pages, _) = paint_all(&record, &LayoutConfig::default(), RecordingCanvas::new);
        let texts = pages[0].texts();
        let description = texts.iter().find(|t| t.starts_with("Item 0")).unwrap();
        assert_eq!(description.chars().count(), DESCRIPTION_CHARS);
        let remarks = texts.iter().find(|t| t.starts_with("Remarks: ")).unwrap();
        assert_eq!(remarks.chars().count(), "Remarks: ".len() + REMARKS_CHARS);
        assert!(pages[0].contains_text("Location: Not specified"));
    }

    #[test]
    fn zebra_stripes_follow_global_row_index() {
        let record = record_with(4, 0);
        let config = LayoutConfig::default();
        let (pages, _) = paint_all(&record, &config, RecordingCanvas::new);
        let stripes = pages[0]
            .calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Rect { paint: Paint::Fill(color), .. } if *color == config.branding.stripe))
            .count();
        assert_eq!(stripes, 2);
    }

    #[test]
    fn capped_sections_print_markers_and_tracking_url() {
        let record = record_with(20, 25);
        let mut config = LayoutConfig::default();
        config.limits.max_package_rows = Some(5);
        config.limits.max_history_rows = Some(3);
        let (pages, _) = paint_all(&record, &config, RecordingCanvas::new);
        let all: Vec<String> = pages.iter().flat_map(|p| p.texts()).collect();
        assert!(all.iter().any(|t| t == "+ 15 more package(s) available on the tracking page."));
        assert!(all.iter().any(|t| t == "+ 22 more history entries. See full tracking:"));
        assert!(all.iter().any(|t| t == "https://track.example/track?code=WB123456"));
    }

    #[test]
    fn footer_on_every_page_and_help_on_last_only() {
        let record = record_with(0, 30);
        let (pages, _) = paint_all(&record, &LayoutConfig::default(), RecordingCanvas::new);
        let count = pages.len();
        for (i, page) in pages.iter().enumerate() {
            let footer = page
                .texts()
                .into_iter()
                .find(|t| t.starts_with("Document generated: "))
                .unwrap();
            assert!(footer.contains("Tracking: WB123456"));
            assert!(footer.ends_with(&format!("Page {} of {}", i + 1, count)));
            assert_eq!(page.contains_text("Need help?"), i + 1 == count);
        }
    }

    #[test]
    fn empty_record_shows_empty_notes() {
        let record = ShipmentRecord::new("EMPTY1");
        let (pages, _) = paint_all(&record, &LayoutConfig::default(), RecordingCanvas::new);
        assert_eq!(pages.len(), 1);
        assert!(pages[0].contains_text("No packages recorded."));
        assert!(pages[0].contains_text("Package Count:"));
        assert!(pages[0].contains_text("0"));
    }

    #[test]
    fn failing_images_are_skipped_and_counted() {
        let record = record_with(1, 1);
        let (pages, failures) =
            paint_all(&record, &LayoutConfig::default(), RecordingCanvas::failing_images);
        assert_eq!(failures, 2);
        assert_eq!(pages[0].image_count(), 0);
        assert!(pages[0].contains_text("SHIPMENT DETAILS"));
    }

    #[test]
    fn watermark_is_drawn_rotated_when_configured() {
        let record = record_with(0, 0);
        let mut config = LayoutConfig::default();
        config.branding.watermark = Some("COPY".into());
        let (pages, _) = paint_all(&record, &config, RecordingCanvas::new);
        let rotated = pages[0].calls.iter().any(|c| {
            matches!(c, DrawCall::Text { text, style, .. } if text == "COPY" && style.angle == 45.0)
        });
        assert!(rotated);
    }

    #[test]
    fn status_colors() {
        assert_eq!(status_color(&ShipmentStatus::Delivered), Color::rgb(0x28, 0xA7, 0x45));
        assert_eq!(
            status_color(&ShipmentStatus::Other("Exception".into())),
            Color::rgb(0xDC, 0x35, 0x45)
        );
        assert_eq!(status_color(&ShipmentStatus::Processing), Color::rgb(0x6C, 0x75, 0x7D));
    }

    #[test]
    fn broken_sink_while_drawing_codes_aborts_the_page() {
        let record = record_with(1, 1);
        let config = LayoutConfig::default();
        let plan = assemble(&record, &PageGeometry::a4(), &config).unwrap();
        let assets = assets();
        let painter = PagePainter::new(&plan, &record, &config, &assets);

        let mut canvas = RecordingCanvas::broken_sink_on_images();
        let result = painter.paint(&plan.pages[0], &mut canvas);
        assert!(matches!(result, Err(RenderError::Io(_))));
        assert_eq!(painter.decorative_failures(), 0);
        assert!(!canvas.contains_text("OVERVIEW"));
    }

    #[test]
    fn missing_package_fields_render_placeholder() {
        let package = Package {
            piece_type: Some("Box".into()),
            ..Default::default()
        };
        assert_eq!(package_cells(&package), ["Box", "-", "-", "-", "-"]);

        let package = Package {
            quantity: Some("3".into()),
            weight: Some("2.5".into()),
            ..Default::default()
        };
        assert_eq!(package_cells(&package), ["-", "-", "-", "2.5 kg", "3"]);
    }

    #[test]
    fn summary_content_stays_inside_its_block() {
        let mut record = record_with(0, 0);
        record.shipper_address = Some("12 Harbour Road, Apapa Industrial Estate, Lagos ".repeat(4));
        record.receiver_address = Some("Unit 4, Riverside Park, Manchester ".repeat(4));
        record.comments = Some("Handle with care. ".repeat(20));
        let config = LayoutConfig::default();
        let plan = assemble(&record, &PageGeometry::a4(), &config).unwrap();
        let assets = assets();
        let painter = PagePainter::new(&plan, &record, &config, &assets);

        let content = plan.geometry.content_rect();
        let area = Rect::new(content.x, content.y, content.width, config.metrics.summary_height);
        let mut canvas = RecordingCanvas::new();
        painter.paint_summary(&plan.pages[0], area, &mut canvas).unwrap();

        let limit = area.y + SUMMARY_MIN_HEIGHT;
        assert!(canvas.contains_text("DETAILS"));
        for call in &canvas.calls {
            let bottom = match call {
                DrawCall::Text { y, style, .. } => y + style.size,
                DrawCall::Image { rect, .. } | DrawCall::Rect { rect, .. } => rect.bottom(),
                DrawCall::Line { from, to, .. } => from.1.max(to.1),
                DrawCall::Circle { center, radius, .. } => center.1 + radius,
            };
            assert!(bottom <= limit, "{:?} ends at {} past {}", call, bottom, limit);
        }
    }
}
