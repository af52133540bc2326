//! Element measurement.
//!
//! Layout needs the size of every element before it can place the next one.
//! A rendering engine knows the exact glyph metrics; [`EstimatedMetrics`]
//! approximates them closely enough for relative layout.

use tableau_core::Size2D;

use crate::element::{ElementContent, GridValue};

/// Measures the intrinsic size of leaf content, in scene units.
///
/// Arrows, lines and groups are sized by the layout from their endpoints or
/// members and are never passed here.
pub trait Metrics {
    fn measure(&self, content: &ElementContent) -> Size2D;
}

/// Font-size-proportional estimates calibrated on a 48pt reference font.
#[derive(Debug, Clone)]
pub struct EstimatedMetrics {
    /// Average glyph advance at 48pt, in scene units.
    pub char_width: f64,
    /// Line height at 48pt, in scene units.
    pub line_height: f64,
    /// Vertical distance between grid rows.
    pub row_spacing: f64,
    /// Horizontal room taken by each bracket of a grid.
    pub bracket_width: f64,
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self {
            char_width: 0.3,
            line_height: 0.55,
            row_spacing: 0.8,
            bracket_width: 0.25,
        }
    }
}

const REFERENCE_FONT_SIZE: f64 = 48.0;

/// How a grid cell is printed: integers without a fraction, others as written.
pub fn format_cell(value: &GridValue) -> String {
    match value.as_number() {
        Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
        Some(n) => format!("{}", n),
        None => match value {
            GridValue::Text(s) => s.clone(),
            GridValue::Number(n) => format!("{}", n),
        },
    }
}

impl EstimatedMetrics {
    fn text_size(&self, text: &str, font_size: f64) -> Size2D {
        let scale = font_size / REFERENCE_FONT_SIZE;
        let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        Size2D::new(
            widest as f64 * self.char_width * scale,
            lines as f64 * self.line_height * scale,
        )
    }
}

impl Metrics for EstimatedMetrics {
    fn measure(&self, content: &ElementContent) -> Size2D {
        match content {
            ElementContent::Text { text, font_size } => self.text_size(text, *font_size),
            ElementContent::Grid { rows, h_buff } => {
                let cols = rows.first().map_or(0, |r| r.len());
                let widest = rows
                    .iter()
                    .flatten()
                    .map(|v| format_cell(v).chars().count())
                    .max()
                    .unwrap_or(0);
                let cell = self.text_size(&"0".repeat(widest), REFERENCE_FONT_SIZE);
                let width = if cols == 0 {
                    0.0
                } else {
                    (cols as f64 - 1.0) * h_buff + cell.width
                };
                let height = if rows.is_empty() {
                    0.0
                } else {
                    (rows.len() as f64 - 1.0) * self.row_spacing + cell.height
                };
                Size2D::new(width + 2.0 * self.bracket_width, height + 0.2)
            }
            ElementContent::Sphere { radius } => Size2D::new(2.0 * radius, 2.0 * radius),
            ElementContent::Axes {
                x_range, y_range, ..
            } => Size2D::new(x_range[1] - x_range[0], y_range[1] - y_range[0]),
            ElementContent::Arrow { .. }
            | ElementContent::Line { .. }
            | ElementContent::Group { .. } => Size2D::default(),
        }
    }
}
