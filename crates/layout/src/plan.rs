use crate::planner::{ContinuationMarker, PagePortion, SectionPlan};
use waybill_types::PageGeometry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Packages,
    History,
}

impl SectionKind {
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Packages => "PACKAGE DETAILS",
            SectionKind::History => "HISTORY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderKind {
    /// Tall branding band with company name and tagline.
    Full,
    /// Slim band repeated on continuation pages.
    Compact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Summary,
    Section {
        section: SectionKind,
        portion: PagePortion,
        continued: bool,
    },
    Continuation {
        section: SectionKind,
        marker: ContinuationMarker,
    },
    EmptySection(SectionKind),
}

/// A block positioned in the content area. `y` is measured from the top of
/// the content rect, not the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedBlock {
    pub y: f32,
    pub height: f32,
    pub kind: BlockKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FooterMeta {
    pub page_number: usize,
    pub page_count: usize,
    pub tracking_number: String,
    pub document_id: String,
    pub generated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub index: usize,
    pub header: HeaderKind,
    pub blocks: Vec<PlacedBlock>,
    pub footer: FooterMeta,
}

impl Page {
    pub fn is_last(&self) -> bool {
        self.footer.page_number == self.footer.page_count
    }

    pub fn has_summary(&self) -> bool {
        self.blocks.iter().any(|b| b.kind == BlockKind::Summary)
    }

    /// Bottom edge of the lowest block, relative to the content top.
    pub fn content_bottom(&self) -> f32 {
        self.blocks
            .iter()
            .map(|b| b.y + b.height)
            .fold(0.0, f32::max)
    }
}

/// Everything needed to paint one document, page by page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub geometry: PageGeometry,
    pub tracking_number: String,
    pub document_id: String,
    pub pages: Vec<Page>,
    pub packages: SectionPlan,
    pub history: SectionPlan,
}

impl RenderPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Writes the generation timestamp into every footer. Kept apart from
    /// planning so that planning never reads the clock.
    pub fn stamp(&mut self, generated_at: impl Into<String>) {
        let generated_at = generated_at.into();
        for page in &mut self.pages {
            page.footer.generated_at = Some(generated_at.clone());
        }
    }
}
