use crate::LayoutError;
use crate::planner::PlannerOptions;
use serde::Deserialize;
use waybill_types::Color;

/// Immutable look-and-feel and layout parameters, built once at startup and
/// shared read-only by every document request.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub metrics: LayoutMetrics,
    pub limits: RowLimits,
    pub branding: Branding,
}

/// Height the painted summary block needs: tracking box, parties, details
/// and one comments line.
pub const SUMMARY_MIN_HEIGHT: f32 = 330.0;

/// Fixed heights, in points, of every block the assembler places.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutMetrics {
    /// The tracking box, overview column, shipper/receiver and details rows.
    pub summary_height: f32,
    pub section_heading_height: f32,
    /// Column header row drawn above package rows on every page.
    pub table_header_height: f32,
    pub package_row_height: f32,
    pub history_row_height: f32,
    /// One line stating how many rows were left out.
    pub marker_height: f32,
    pub empty_note_height: f32,
    /// Vertical space left after each block group.
    pub section_gap: f32,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            summary_height: SUMMARY_MIN_HEIGHT,
            section_heading_height: 22.0,
            table_header_height: 20.0,
            package_row_height: 20.0,
            history_row_height: 46.0,
            marker_height: 30.0,
            empty_note_height: 18.0,
            section_gap: 14.0,
        }
    }
}

impl LayoutMetrics {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let rows = [
            ("package_row_height", self.package_row_height),
            ("history_row_height", self.history_row_height),
        ];
        for (name, value) in rows {
            if !value.is_finite() || value <= 0.0 {
                return Err(LayoutError::Configuration(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        let bands = [
            ("summary_height", self.summary_height),
            ("section_heading_height", self.section_heading_height),
            ("table_header_height", self.table_header_height),
            ("marker_height", self.marker_height),
            ("empty_note_height", self.empty_note_height),
            ("section_gap", self.section_gap),
        ];
        for (name, value) in bands {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::Configuration(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if self.summary_height < SUMMARY_MIN_HEIGHT {
            return Err(LayoutError::Configuration(format!(
                "summary_height must be at least {}, got {}",
                SUMMARY_MIN_HEIGHT, self.summary_height
            )));
        }
        Ok(())
    }
}

/// Row caps applied by the planner.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RowLimits {
    pub min_rows_per_page: usize,
    pub max_rows_per_page: Option<usize>,
    /// Hard cap on package rows in one document; the rest is summarized.
    pub max_package_rows: Option<usize>,
    pub max_history_rows: Option<usize>,
}

impl Default for RowLimits {
    fn default() -> Self {
        Self {
            min_rows_per_page: 1,
            max_rows_per_page: None,
            max_package_rows: None,
            max_history_rows: None,
        }
    }
}

impl LayoutConfig {
    pub(crate) fn planner_options(&self, section_cap: Option<usize>) -> PlannerOptions {
        PlannerOptions {
            min_rows_per_page: self.limits.min_rows_per_page,
            max_rows_per_page: self.limits.max_rows_per_page,
            max_rows_per_section: section_cap,
            marker_height: self.metrics.marker_height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub company_name: String,
    pub tagline: String,
    /// Subtitle used in the slim header of continuation pages.
    pub compact_tagline: String,
    pub support_line: String,
    pub watermark: Option<String>,
    pub primary: Color,
    pub on_primary: Color,
    pub on_primary_muted: Color,
    pub label: Color,
    pub value: Color,
    pub stripe: Color,
    pub border: Color,
    pub watermark_color: Color,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            company_name: "EXPRESS LOGISTICS".to_string(),
            tagline: "Global Logistics Solutions".to_string(),
            compact_tagline: "Shipment Packages & History".to_string(),
            support_line: "support@express-logistics.example".to_string(),
            watermark: None,
            primary: Color::rgb(0x00, 0x33, 0x66),
            on_primary: Color::WHITE,
            on_primary_muted: Color::rgb(0xE6, 0xEE, 0xF8),
            label: Color::gray(0x66),
            value: Color::gray(0x33),
            stripe: Color::rgb(0xF8, 0xF9, 0xFA),
            border: Color::rgb(0xE8, 0xED, 0xF3),
            watermark_color: Color::rgb(0xEE, 0xF2, 0xF7),
        }
    }
}
