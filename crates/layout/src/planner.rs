//! Splits a list of fixed-height rows across pages.
//!
//! The planner never looks at row contents, only at how many rows there are,
//! how tall each one is, and how much vertical space each page offers. Its
//! output is a list of [`PagePortion`]s that partition the shown rows in
//! order, plus an optional [`ContinuationMarker`] when a row cap cut the list
//! short.

use crate::LayoutError;
use log::debug;

/// A run of consecutive rows placed on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePortion {
    pub page_index: usize,
    pub start_index: usize,
    pub row_count: usize,
}

impl PagePortion {
    pub fn end_index(&self) -> usize {
        self.start_index + self.row_count
    }
}

/// Stands in for rows that were not planned because of a section cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContinuationMarker {
    /// Page holding the last shown row; the marker is drawn right below it.
    pub page_index: usize,
    pub shown: usize,
    pub omitted: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SectionPlan {
    pub portions: Vec<PagePortion>,
    /// The section could not start in the space left on the current page.
    pub break_before: bool,
    pub continuation: Option<ContinuationMarker>,
}

impl SectionPlan {
    pub fn is_empty(&self) -> bool {
        self.portions.is_empty()
    }

    pub fn shown(&self) -> usize {
        self.portions.iter().map(|p| p.row_count).sum()
    }

    pub fn last_page(&self) -> Option<usize> {
        self.portions.last().map(|p| p.page_index)
    }

    pub fn page_count(&self) -> usize {
        match (self.portions.first(), self.portions.last()) {
            (Some(first), Some(last)) => last.page_index - first.page_index + 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerOptions {
    /// Rows forced onto a page even when they overflow it; also the least
    /// number of rows worth starting a section with part-way down a page.
    pub min_rows_per_page: usize,
    pub max_rows_per_page: Option<usize>,
    /// Hard cap on rows planned for the whole section.
    pub max_rows_per_section: Option<usize>,
    /// Space reserved under the last row for the continuation marker.
    pub marker_height: f32,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            min_rows_per_page: 1,
            max_rows_per_page: None,
            max_rows_per_section: None,
            marker_height: 0.0,
        }
    }
}

/// Where a section starts: the page, the height left on it, and the height a
/// fresh page offers to this section's rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpace {
    pub page_index: usize,
    pub remaining: f32,
    pub capacity: f32,
    /// Nothing has been placed on `page_index` yet.
    pub at_top: bool,
}

impl PageSpace {
    pub fn fresh(page_index: usize, capacity: f32) -> Self {
        Self {
            page_index,
            remaining: capacity,
            capacity,
            at_top: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaginationPlanner {
    options: PlannerOptions,
}

impl PaginationPlanner {
    pub fn new(options: PlannerOptions) -> Result<Self, LayoutError> {
        if options.min_rows_per_page == 0 {
            return Err(LayoutError::Configuration(
                "min_rows_per_page must be at least 1; a page that holds no rows cannot make progress"
                    .into(),
            ));
        }
        if let Some(max) = options.max_rows_per_page {
            if max < options.min_rows_per_page {
                return Err(LayoutError::Configuration(format!(
                    "max_rows_per_page ({}) is below min_rows_per_page ({})",
                    max, options.min_rows_per_page
                )));
            }
        }
        if options.max_rows_per_section == Some(0) {
            return Err(LayoutError::Configuration(
                "max_rows_per_section must be at least 1".into(),
            ));
        }
        if !options.marker_height.is_finite() || options.marker_height < 0.0 {
            return Err(LayoutError::Configuration(format!(
                "marker_height must be non-negative, got {}",
                options.marker_height
            )));
        }
        Ok(Self { options })
    }

    pub fn options(&self) -> &PlannerOptions {
        &self.options
    }

    /// Rows a page of `available` height holds: at least the configured
    /// minimum, at most the configured maximum.
    pub fn rows_per_page(&self, row_height: f32, available: f32) -> usize {
        self.fitting_rows(row_height, available)
            .max(self.options.min_rows_per_page)
            .min(self.options.max_rows_per_page.unwrap_or(usize::MAX))
    }

    fn fitting_rows(&self, row_height: f32, available: f32) -> usize {
        let fit = (available.max(0.0) / row_height).floor() as usize;
        fit.min(self.options.max_rows_per_page.unwrap_or(usize::MAX))
    }

    /// Plans `len` rows starting at the top of page 0.
    pub fn plan(
        &self,
        len: usize,
        row_height: f32,
        available_height: f32,
    ) -> Result<SectionPlan, LayoutError> {
        self.plan_at(len, row_height, &PageSpace::fresh(0, available_height))
    }

    /// Plans `len` rows starting wherever `space` says the current page is.
    pub fn plan_at(
        &self,
        len: usize,
        row_height: f32,
        space: &PageSpace,
    ) -> Result<SectionPlan, LayoutError> {
        if !row_height.is_finite() || row_height <= 0.0 {
            return Err(LayoutError::Configuration(format!(
                "row height must be positive, got {}",
                row_height
            )));
        }
        if !space.capacity.is_finite() || space.capacity < 0.0 {
            return Err(LayoutError::Configuration(format!(
                "available height must be non-negative, got {}",
                space.capacity
            )));
        }
        if !space.remaining.is_finite() {
            return Err(LayoutError::Configuration(format!(
                "remaining height must be finite, got {}",
                space.remaining
            )));
        }
        if len == 0 {
            return Ok(SectionPlan::default());
        }

        let shown = self
            .options
            .max_rows_per_section
            .map_or(len, |cap| len.min(cap));
        let reserve = if shown < len {
            self.options.marker_height
        } else {
            0.0
        };
        let full_page_rows = self.rows_per_page(row_height, space.capacity - reserve);

        let (mut page, first_page_rows, break_before) = if space.at_top {
            let rows = self.rows_per_page(row_height, space.remaining - reserve);
            (space.page_index, rows, false)
        } else {
            let fit = self.fitting_rows(row_height, space.remaining - reserve);
            if fit >= self.options.min_rows_per_page {
                (space.page_index, fit, false)
            } else {
                (space.page_index + 1, full_page_rows, true)
            }
        };
        debug_assert!(first_page_rows >= 1 && full_page_rows >= 1);

        let mut portions = Vec::new();
        let mut start = 0;
        let mut capacity = first_page_rows;
        while start < shown {
            let row_count = capacity.min(shown - start);
            portions.push(PagePortion {
                page_index: page,
                start_index: start,
                row_count,
            });
            start += row_count;
            if start < shown {
                page += 1;
                capacity = full_page_rows;
            }
        }

        let continuation = (shown < len).then(|| ContinuationMarker {
            page_index: page,
            shown,
            omitted: len - shown,
        });

        debug!(
            "Planned {} of {} rows over {} page(s) ({} per full page, break before: {})",
            shown,
            len,
            portions.len(),
            full_page_rows,
            break_before
        );

        Ok(SectionPlan {
            portions,
            break_before,
            continuation,
        })
    }
}
