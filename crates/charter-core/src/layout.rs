// File: crates/charter-core/src/layout.rs
// Summary: Dashboard layout description, presets, margin reservation and shared legend placement.
// Notes:
// - Margins are fractions of the figure as (left, bottom, right, top), y growing upwards.
// - The automatic pass sizes margins from the measured title and legend; if it cannot
//   produce a usable grid, the fixed fractions for the legend position are used instead.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ChartError, Result};
use crate::geometry::RectF;
use crate::grid::GridSpec;

/// Smallest grid cell (px) the automatic margin pass accepts.
pub const MIN_CELL_PX: f32 = 48.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Top,
    Bottom,
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpec {
    pub rows: usize,
    pub cols: usize,
    pub width_ratios: Option<Vec<f32>>,
    pub height_ratios: Option<Vec<f32>>,
    pub shared_legend: bool,
    pub legend_position: LegendPosition,
    /// Inches.
    #[serde(alias = "figsize")]
    pub figure_size: (f32, f32),
    /// Falls back to `Settings::dpi` when unset.
    pub dpi: Option<u32>,
    /// Top of the dashboard title as a figure fraction.
    pub title_y: f32,
    pub hspace: f32,
    pub wspace: f32,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            rows: 1,
            cols: 2,
            width_ratios: None,
            height_ratios: None,
            shared_legend: true,
            legend_position: LegendPosition::Top,
            figure_size: (16.0, 6.0),
            dpi: None,
            title_y: 0.98,
            hspace: 0.3,
            wspace: 0.3,
        }
    }
}

pub const LAYOUT_PRESETS: [&str; 7] =
    ["default", "side_by_side", "stacked", "wide_left", "wide_right", "grid_2x2", "traffic_latency"];

impl LayoutSpec {
    pub fn grid_of(rows: usize, cols: usize) -> Self {
        Self { rows, cols, ..Self::default() }
    }

    pub fn preset(name: &str) -> Result<Self> {
        let d = Self::default();
        let spec = match name.trim().to_ascii_lowercase().as_str() {
            "default" => d,
            "side_by_side" => Self { rows: 1, cols: 2, figure_size: (16.0, 6.0), ..d },
            "stacked" => Self { rows: 2, cols: 1, figure_size: (12.0, 10.0), ..d },
            "wide_left" => Self { width_ratios: Some(vec![2.0, 1.0]), ..d },
            "wide_right" => Self { width_ratios: Some(vec![1.0, 2.0]), ..d },
            "grid_2x2" => Self { rows: 2, cols: 2, figure_size: (14.0, 10.0), ..d },
            "traffic_latency" => Self { figure_size: (18.0, 6.0), width_ratios: Some(vec![2.5, 1.0]), ..d },
            _ => {
                return Err(ChartError::UnknownLayout { name: name.to_string(), available: LAYOUT_PRESETS.join(", ") });
            }
        };
        Ok(spec)
    }

    pub fn with_legend(mut self, position: LegendPosition) -> Self {
        self.shared_legend = true;
        self.legend_position = position;
        self
    }

    pub fn without_legend(mut self) -> Self {
        self.shared_legend = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let (w, h) = self.figure_size;
        if !(w > 0.0 && h > 0.0) {
            return Err(ChartError::InvalidLayout(format!("figure size must be positive, got {w}x{h}")));
        }
        if self.dpi == Some(0) {
            return Err(ChartError::InvalidLayout("dpi must be positive".into()));
        }
        if !(self.title_y > 0.0 && self.title_y <= 1.0) {
            return Err(ChartError::InvalidLayout(format!("title_y must be in (0, 1], got {}", self.title_y)));
        }
        self.grid().map(|_| ())
    }

    pub fn grid(&self) -> Result<GridSpec> {
        let mut g = GridSpec::new(self.rows, self.cols)?.with_spacing(self.wspace, self.hspace);
        if let Some(r) = &self.width_ratios { g = g.with_width_ratios(r)?; }
        if let Some(r) = &self.height_ratios { g = g.with_height_ratios(r)?; }
        Ok(g)
    }

    pub fn pixel_size(&self, dpi: u32) -> (u32, u32) {
        let (w, h) = self.figure_size;
        ((w * dpi as f32).round().max(1.0) as u32, (h * dpi as f32).round().max(1.0) as u32)
    }
}

/// Fixed content fractions `(left, bottom, right, top)` for a legend position.
pub fn reserved_fractions(legend: Option<LegendPosition>, has_title: bool) -> [f32; 4] {
    let mut rect = match legend {
        Some(LegendPosition::Top) => [0.05, 0.05, 0.95, 0.88],
        Some(LegendPosition::Bottom) => [0.05, 0.12, 0.95, 0.92],
        Some(LegendPosition::Right) => [0.05, 0.05, 0.85, 0.92],
        None => [0.05, 0.05, 0.95, 0.95],
    };
    if has_title {
        rect[3] = rect[3].min(0.92);
    }
    rect
}

/// Inputs of a margin computation, all in pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct MarginRequest {
    pub width: f32,
    pub height: f32,
    /// Legend box size when a shared legend is drawn.
    pub legend: Option<(LegendPosition, f32, f32)>,
    /// Height of the title text band when a title is drawn.
    pub title_height: Option<f32>,
    /// Top of the title, as a figure fraction.
    pub title_y: f32,
    pub pad: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Margins {
    pub content: RectF,
    /// Top-left corner of the legend box.
    pub legend_origin: Option<(f32, f32)>,
    pub fallback: bool,
}

impl MarginRequest {
    fn title_bottom(&self) -> f32 {
        match self.title_height {
            Some(h) => (1.0 - self.title_y) * self.height + h,
            None => 0.0,
        }
    }

    /// Content rectangle sized from the measured title and legend, or `None` when
    /// the result would not hold a usable grid.
    pub fn auto(&self, grid: &GridSpec) -> Option<Margins> {
        let pad = self.pad;
        let base = RectF::from_fractions(self.width, self.height, reserved_fractions(None, false));
        let mut content = base;
        let title_bottom = self.title_bottom();
        content.top = content.top.max(title_bottom + pad);
        let mut legend_origin = None;
        if let Some((pos, lw, lh)) = self.legend {
            if lw + 2.0 * pad > self.width || lh + 2.0 * pad > self.height { return None; }
            match pos {
                LegendPosition::Top => {
                    let top = title_bottom.max(pad) + pad * 0.5;
                    legend_origin = Some(((self.width - lw) * 0.5, top));
                    content.top = content.top.max(top + lh + pad);
                }
                LegendPosition::Bottom => {
                    let top = self.height - pad - lh;
                    legend_origin = Some(((self.width - lw) * 0.5, top));
                    content.bottom = content.bottom.min(top - pad);
                }
                LegendPosition::Right => {
                    let left = self.width - pad - lw;
                    content.right = content.right.min(left - pad);
                    legend_origin = Some((left, content.center_y() - lh * 0.5));
                }
            }
        }
        if content.is_empty() { return None; }
        let (cw, ch) = grid.min_cell(&content);
        if cw < MIN_CELL_PX || ch < MIN_CELL_PX { return None; }
        Some(Margins { content, legend_origin, fallback: false })
    }

    /// Fixed-fraction content rectangle for the legend position.
    pub fn explicit(&self) -> Margins {
        let pos = self.legend.map(|(p, _, _)| p);
        let frac = reserved_fractions(pos, self.title_height.is_some());
        let content = RectF::from_fractions(self.width, self.height, frac);
        let legend_origin = self.legend.map(|(pos, lw, lh)| match pos {
            LegendPosition::Top => {
                let band_top = self.title_bottom().max(self.pad);
                ((self.width - lw) * 0.5, band_top.min((content.top - lh).max(0.0)))
            }
            LegendPosition::Bottom => ((self.width - lw) * 0.5, (self.height - self.pad - lh).max(content.bottom)),
            LegendPosition::Right => ((self.width - self.pad - lw).max(content.right), content.center_y() - lh * 0.5),
        });
        Margins { content, legend_origin, fallback: true }
    }

    /// Automatic margins, falling back to [`MarginRequest::explicit`].
    pub fn resolve(&self, grid: &GridSpec) -> Margins {
        match self.auto(grid) {
            Some(m) => m,
            None => {
                debug!(width = self.width, height = self.height, "automatic margins failed, using explicit fractions");
                self.explicit()
            }
        }
    }
}
