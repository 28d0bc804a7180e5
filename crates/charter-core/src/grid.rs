// File: crates/charter-core/src/grid.rs
// Summary: Grid allocation (rows x cols with ratios and spacing).

use crate::error::{ChartError, Result};
use crate::geometry::RectF;

/// Partition of a rectangle into `rows x cols` cells. Spacing between cells is a
/// fraction of the average cell size, matching the usual subplot convention.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub width_ratios: Vec<f32>,
    pub height_ratios: Vec<f32>,
    pub wspace: f32,
    pub hspace: f32,
}

impl GridSpec {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(ChartError::InvalidLayout(format!("grid must have at least one cell, got {rows}x{cols}")));
        }
        Ok(Self { rows, cols, width_ratios: vec![1.0; cols], height_ratios: vec![1.0; rows], wspace: 0.0, hspace: 0.0 })
    }

    pub fn with_width_ratios(mut self, ratios: &[f32]) -> Result<Self> {
        self.width_ratios = check_ratios("width", ratios, self.cols)?;
        Ok(self)
    }

    pub fn with_height_ratios(mut self, ratios: &[f32]) -> Result<Self> {
        self.height_ratios = check_ratios("height", ratios, self.rows)?;
        Ok(self)
    }

    pub fn with_spacing(mut self, wspace: f32, hspace: f32) -> Self {
        self.wspace = wspace.max(0.0);
        self.hspace = hspace.max(0.0);
        self
    }

    /// Column edges `(left, right)` inside `bounds`.
    pub fn column_edges(&self, bounds: &RectF) -> Vec<(f32, f32)> {
        edges(bounds.left, bounds.width(), &self.width_ratios, self.wspace)
    }

    /// Row edges `(top, bottom)` inside `bounds`.
    pub fn row_edges(&self, bounds: &RectF) -> Vec<(f32, f32)> {
        edges(bounds.top, bounds.height(), &self.height_ratios, self.hspace)
    }

    /// Sub-rectangle covering `[row, row+row_span) x [col, col+col_span)`.
    /// Spans are clamped to the grid; overlapping requests are not checked.
    pub fn span(&self, bounds: &RectF, row: usize, col: usize, row_span: usize, col_span: usize) -> RectF {
        let cols = self.column_edges(bounds);
        let rows = self.row_edges(bounds);
        let c0 = col.min(self.cols - 1);
        let c1 = (col + col_span.max(1) - 1).min(self.cols - 1).max(c0);
        let r0 = row.min(self.rows - 1);
        let r1 = (row + row_span.max(1) - 1).min(self.rows - 1).max(r0);
        RectF::from_ltrb(cols[c0].0, rows[r0].0, cols[c1].1, rows[r1].1)
    }

    /// Smallest single cell produced inside `bounds`, as (width, height).
    pub fn min_cell(&self, bounds: &RectF) -> (f32, f32) {
        let w = self.column_edges(bounds).iter().map(|(a, b)| b - a).fold(f32::INFINITY, f32::min);
        let h = self.row_edges(bounds).iter().map(|(a, b)| b - a).fold(f32::INFINITY, f32::min);
        (w, h)
    }
}

fn check_ratios(what: &str, ratios: &[f32], expected: usize) -> Result<Vec<f32>> {
    if ratios.len() != expected {
        return Err(ChartError::InvalidLayout(format!("{what} ratios: expected {expected} values, got {}", ratios.len())));
    }
    if ratios.iter().any(|r| !(r.is_finite() && *r > 0.0)) {
        return Err(ChartError::InvalidLayout(format!("{what} ratios must be positive: {ratios:?}")));
    }
    Ok(ratios.to_vec())
}

fn edges(origin: f32, total: f32, ratios: &[f32], space: f32) -> Vec<(f32, f32)> {
    let n = ratios.len() as f32;
    // total = n * cell + (n - 1) * space * cell, where cell is the average cell size.
    let cell = total / (n + space * (n - 1.0));
    let gap = space * cell;
    let sum: f32 = ratios.iter().sum();
    let mut out = Vec::with_capacity(ratios.len());
    let mut pos = origin;
    for r in ratios {
        let size = cell * n * r / sum;
        out.push((pos, pos + size));
        pos += size + gap;
    }
    out
}
