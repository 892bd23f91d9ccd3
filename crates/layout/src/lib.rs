use thiserror::Error;
use waybill_types::GeometryError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid layout configuration: {0}")]
    Configuration(String),
    #[error("Invalid page geometry: {0}")]
    Geometry(#[from] GeometryError),
}

pub mod assembler;
pub mod config;
pub mod plan;
pub mod planner;

pub use self::assembler::{assemble, document_id};
pub use self::config::{Branding, LayoutConfig, LayoutMetrics, RowLimits, SUMMARY_MIN_HEIGHT};
pub use self::plan::{BlockKind, FooterMeta, HeaderKind, Page, PlacedBlock, RenderPlan, SectionKind};
pub use self::planner::{
    ContinuationMarker, PagePortion, PageSpace, PaginationPlanner, PlannerOptions, SectionPlan,
};

// Re-export geometry so downstream crates plan and paint against one type.
pub use waybill_types::{PageGeometry, Rect, Size};
