//! Builds a [`RenderPlan`] for one shipment record.
//!
//! The summary block always opens page one. Packages follow, then history;
//! each section continues on the current page when the planner says its first
//! rows fit there, and otherwise starts on a fresh page.

use crate::config::LayoutConfig;
use crate::plan::{BlockKind, FooterMeta, HeaderKind, Page, PlacedBlock, RenderPlan, SectionKind};
use crate::planner::{PageSpace, PaginationPlanner, SectionPlan};
use crate::LayoutError;
use log::{debug, info};
use sha2::{Digest, Sha256};
use waybill_types::{PageGeometry, ShipmentRecord};

/// Stable document identifier derived from the tracking number alone, so the
/// same shipment always prints the same id regardless of lookup casing.
pub fn document_id(tracking_number: &str) -> String {
    let digest = Sha256::digest(tracking_number.trim().to_uppercase().as_bytes());
    let hex: String = digest[..6].iter().map(|b| format!("{:02X}", b)).collect();
    format!("WB-{}", hex)
}

pub fn assemble(
    record: &ShipmentRecord,
    geometry: &PageGeometry,
    config: &LayoutConfig,
) -> Result<RenderPlan, LayoutError> {
    let tracking_number = record.tracking_number.trim();
    if tracking_number.is_empty() {
        return Err(LayoutError::Configuration(
            "shipment record has no tracking number".into(),
        ));
    }
    geometry.validate()?;
    config.metrics.validate()?;

    let metrics = &config.metrics;
    let usable = geometry.usable_height();
    if metrics.summary_height > usable {
        return Err(LayoutError::Configuration(format!(
            "summary block ({:.2}pt) does not fit the usable page height ({:.2}pt)",
            metrics.summary_height, usable
        )));
    }

    let mut layouter = Layouter::new(usable, metrics.section_gap);
    layouter.place(0, 0.0, metrics.summary_height, BlockKind::Summary);
    layouter.advance(metrics.summary_height);

    let packages = layouter.place_section(
        SectionKind::Packages,
        record.packages.len(),
        metrics.package_row_height,
        metrics.section_heading_height + metrics.table_header_height,
        &PaginationPlanner::new(config.planner_options(config.limits.max_package_rows))?,
        config,
    )?;
    let history = layouter.place_section(
        SectionKind::History,
        record.history.len(),
        metrics.history_row_height,
        metrics.section_heading_height,
        &PaginationPlanner::new(config.planner_options(config.limits.max_history_rows))?,
        config,
    )?;

    let document_id = document_id(tracking_number);
    let page_count = layouter.pages.len();
    let pages = layouter
        .pages
        .into_iter()
        .enumerate()
        .map(|(index, blocks)| Page {
            index,
            header: if index == 0 {
                HeaderKind::Full
            } else {
                HeaderKind::Compact
            },
            blocks,
            footer: FooterMeta {
                page_number: index + 1,
                page_count,
                tracking_number: tracking_number.to_string(),
                document_id: document_id.clone(),
                generated_at: None,
            },
        })
        .collect();

    info!(
        "Assembled {} page(s) for {} ({} package rows, {} history rows)",
        page_count,
        tracking_number,
        packages.shown(),
        history.shown()
    );

    Ok(RenderPlan {
        geometry: *geometry,
        tracking_number: tracking_number.to_string(),
        document_id,
        pages,
        packages,
        history,
    })
}

/// Tracks the pages built so far and the fill level of the last one.
struct Layouter {
    usable: f32,
    gap: f32,
    pages: Vec<Vec<PlacedBlock>>,
    page: usize,
    used: f32,
}

impl Layouter {
    fn new(usable: f32, gap: f32) -> Self {
        Self {
            usable,
            gap,
            pages: vec![Vec::new()],
            page: 0,
            used: 0.0,
        }
    }

    fn remaining(&self) -> f32 {
        (self.usable - self.used).max(0.0)
    }

    fn place(&mut self, page: usize, y: f32, height: f32, kind: BlockKind) {
        while self.pages.len() <= page {
            self.pages.push(Vec::new());
        }
        self.pages[page].push(PlacedBlock { y, height, kind });
    }

    /// Closes a block group ending at `bottom` on the current page.
    fn advance(&mut self, bottom: f32) {
        self.used = bottom + self.gap;
    }

    fn place_section(
        &mut self,
        section: SectionKind,
        len: usize,
        row_height: f32,
        overhead: f32,
        planner: &PaginationPlanner,
        config: &LayoutConfig,
    ) -> Result<SectionPlan, LayoutError> {
        if overhead >= self.usable {
            return Err(LayoutError::Configuration(format!(
                "{} heading ({:.2}pt) leaves no room for rows on a {:.2}pt page",
                section.title(),
                overhead,
                self.usable
            )));
        }

        if len == 0 {
            let height = config.metrics.section_heading_height + config.metrics.empty_note_height;
            if height <= self.remaining() {
                let y = self.used;
                self.place(self.page, y, height, BlockKind::EmptySection(section));
                self.advance(y + height);
            } else {
                debug!("Omitting empty {} section; no room left on page {}", section.title(), self.page + 1);
            }
            return Ok(SectionPlan::default());
        }

        let space = PageSpace {
            page_index: self.page,
            remaining: self.remaining() - overhead,
            capacity: self.usable - overhead,
            at_top: self.used <= 0.0,
        };
        let plan = planner.plan_at(len, row_height, &space)?;

        for (i, portion) in plan.portions.iter().enumerate() {
            let y = if portion.page_index == self.page {
                self.used
            } else {
                0.0
            };
            let height = overhead + portion.row_count as f32 * row_height;
            self.place(
                portion.page_index,
                y,
                height,
                BlockKind::Section {
                    section,
                    portion: *portion,
                    continued: i > 0,
                },
            );
            self.page = portion.page_index;
            self.used = y + height;
        }

        let mut bottom = self.used;
        if let Some(marker) = plan.continuation {
            let height = config.metrics.marker_height;
            self.place(marker.page_index, bottom, height, BlockKind::Continuation { section, marker });
            bottom += height;
        }
        self.advance(bottom);

        Ok(plan)
    }
}
