// File: crates/charter-core/src/charts/mod.rs
// Summary: Per-panel render context and dispatch over chart kinds.
// Notes:
// - A panel renders into its own context and hands back primitives, legend entries
//   and per-series summaries; it never sees another panel's state.

pub mod bar;
pub mod line;
pub mod timeseries;

use crate::axis::{draw_axes, widest_label, Axis};
use crate::error::{ChartError, Result};
use crate::figure::{PanelSummary, Primitive, SeriesSummary, TextAlign};
use crate::geometry::{Insets, RectF};
use crate::legend::{LegendEntry, LegendGlyph};
use crate::panel::{PanelData, PanelSpec};
use crate::reduction::{ReductionConfig, ReductionOptions};
use crate::scale::PlotScale;
use crate::settings::Settings;
use crate::style::Style;
use crate::theme::{with_alpha, Theme};

use skia_safe as skia;

/// Optional panel-level text.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanelLabels<'a> {
    pub title: Option<&'a str>,
    pub x_label: Option<&'a str>,
    pub y_label: Option<&'a str>,
}

impl<'a> PanelLabels<'a> {
    pub fn of(spec: &'a PanelSpec) -> Self {
        Self { title: spec.title.as_deref(), x_label: spec.x_label.as_deref(), y_label: spec.y_label.as_deref() }
    }
}

/// Result of rendering one panel.
#[derive(Clone, Debug)]
pub struct PanelOutput {
    pub primitives: Vec<Primitive>,
    /// Entries in the order the panel drew them; may repeat labels across panels.
    pub legend: Vec<LegendEntry>,
    pub summary: PanelSummary,
}

pub struct PanelRenderContext<'a> {
    pub theme: &'a Theme,
    pub settings: &'a Settings,
    /// Pixels per typographic point (dpi / 72).
    pub px_per_pt: f32,
    pub cell: RectF,
    labels: PanelLabels<'a>,
    plot: RectF,
    primitives: Vec<Primitive>,
    legend: Vec<LegendEntry>,
    series: Vec<SeriesSummary>,
}

impl<'a> PanelRenderContext<'a> {
    pub fn new(theme: &'a Theme, settings: &'a Settings, cell: RectF, px_per_pt: f32, labels: PanelLabels<'a>) -> Self {
        Self {
            theme,
            settings,
            px_per_pt,
            cell,
            labels,
            plot: cell,
            primitives: Vec::new(),
            legend: Vec::new(),
            series: Vec::new(),
        }
    }

    #[inline]
    pub fn pt(&self, v: f32) -> f32 { v * self.px_per_pt }

    pub fn line_width(&self) -> f32 { self.pt(self.theme.line_width) }

    pub fn reduction_config(&self, opts: &ReductionOptions) -> ReductionConfig {
        opts.resolve(self.settings)
    }

    /// Fix the plot rectangle for these axes, draw grid, spines and ticks, and
    /// return the data -> pixel scale.
    pub fn axes(&mut self, x: &Axis, y: &Axis, show_grid: bool) -> PlotScale {
        let t = self.theme;
        let tick_px = self.pt(t.tick_font_size);
        let label_px = self.pt(t.label_font_size);
        let title_px = self.pt(t.title_font_size);
        let pad = self.pt(6.0);
        let tick_len = self.pt(3.5);

        let y_max = ((self.cell.height() / (tick_px * 3.0)) as usize).clamp(2, 8);
        let y_ticks = y.ticks(y_max);
        let mut insets = Insets::new(
            pad + widest_label(&y_ticks, tick_px) + tick_len + tick_px * 0.4,
            pad + tick_px * 1.5,
            pad + if self.labels.title.is_some() { title_px * 1.6 } else { tick_px * 0.5 },
            pad + tick_len + tick_px * 1.5,
        );
        if self.labels.y_label.is_some() { insets.left += label_px * 1.4; }
        if self.labels.x_label.is_some() { insets.bottom += label_px * 1.6; }
        self.plot = self.cell.inset(&insets);

        let mut x_ticks = x.ticks(8);
        let room = widest_label(&x_ticks, tick_px) + tick_px * 1.5;
        let fit = (self.plot.width() / room.max(1.0)).floor() as usize;
        if fit < x_ticks.len() {
            x_ticks = x.ticks(fit.max(2));
        }

        let scale = PlotScale::new(&self.plot, x, y);
        let decorations = draw_axes(&self.plot, &scale, &x_ticks, &y_ticks, t, self.px_per_pt, show_grid);
        self.primitives.extend(decorations);
        scale
    }

    /// Series content, clipped to the plot; rasterized content goes into one bitmap layer.
    pub fn draw(&mut self, items: Vec<Primitive>, rasterized: bool) {
        if items.is_empty() { return; }
        let p = if rasterized {
            Primitive::Raster { bounds: self.plot, items }
        } else {
            Primitive::Clip { rect: self.plot, items }
        };
        self.primitives.push(p);
    }

    pub fn draw_unclipped(&mut self, p: Primitive) {
        self.primitives.push(p);
    }

    pub fn legend_entry(&mut self, label: impl Into<String>, glyph: LegendGlyph) {
        self.legend.push(LegendEntry::new(label, glyph));
    }

    pub fn record(&mut self, summary: SeriesSummary) {
        self.series.push(summary);
    }

    fn apply_labels(&mut self) {
        let t = self.theme;
        let pad = self.pt(6.0);
        if let Some(title) = self.labels.title {
            let size = self.pt(t.title_font_size);
            self.primitives.push(Primitive::Text {
                text: title.to_string(),
                x: self.plot.center_x(),
                y: self.cell.top + pad + size,
                size,
                color: t.title,
                align: TextAlign::Center,
                rotated: false,
            });
        }
        let size = self.pt(t.label_font_size);
        if let Some(xl) = self.labels.x_label {
            self.primitives.push(Primitive::Text {
                text: xl.to_string(),
                x: self.plot.center_x(),
                y: self.cell.bottom - pad - size * 0.3,
                size,
                color: t.text,
                align: TextAlign::Center,
                rotated: false,
            });
        }
        if let Some(yl) = self.labels.y_label {
            self.primitives.push(Primitive::Text {
                text: yl.to_string(),
                x: self.cell.left + pad + size,
                y: self.plot.center_y(),
                size,
                color: t.text,
                align: TextAlign::Center,
                rotated: true,
            });
        }
    }

    pub fn finish(mut self) -> PanelOutput {
        self.apply_labels();
        PanelOutput {
            primitives: self.primitives,
            legend: self.legend,
            summary: PanelSummary { cell: self.cell, plot: self.plot, series: self.series },
        }
    }
}

/// Render one validated panel into `cell`. The style variant selects the renderer.
pub fn render_panel(
    index: usize,
    spec: &PanelSpec,
    style: &Style,
    theme: &Theme,
    settings: &Settings,
    cell: RectF,
    px_per_pt: f32,
) -> Result<PanelOutput> {
    let mut ctx = PanelRenderContext::new(theme, settings, cell, px_per_pt, PanelLabels::of(spec));
    match (style, &spec.data) {
        (Style::Bar(s), PanelData::Bar(d)) => bar::render(&mut ctx, s, d)?,
        (Style::Line(s), PanelData::Line(d)) => line::render(&mut ctx, s, d)?,
        (Style::TimeSeries(s), PanelData::TimeSeries(d)) => timeseries::render(&mut ctx, s, d)?,
        (style, data) => {
            return Err(ChartError::KindMismatch { index, kind: style.kind().to_string(), data: data.kind().to_string() });
        }
    }
    Ok(ctx.finish())
}

// ---- shared stroke helpers ---------------------------------------------------

/// How one series line is stroked.
#[derive(Clone, Debug, Default)]
pub struct StrokeOptions {
    pub width: f32,
    pub dash: Option<Vec<f32>>,
    pub smooth: bool,
    pub stepped: bool,
    /// Fill between the line and y = 0 with this opacity.
    pub fill_alpha: Option<f32>,
    /// Marker radius in px when markers are drawn.
    pub marker_radius: Option<f32>,
}

/// Runs of consecutive finite points; NaN values break the line.
pub fn finite_runs(points: &[(f64, f64)]) -> Vec<Vec<(f64, f64)>> {
    let mut runs = Vec::new();
    let mut cur = Vec::new();
    for &(x, y) in points {
        if x.is_finite() && y.is_finite() {
            cur.push((x, y));
        } else if !cur.is_empty() {
            runs.push(std::mem::take(&mut cur));
        }
    }
    if !cur.is_empty() { runs.push(cur); }
    runs
}

/// Steps centred between samples.
pub fn step_mid(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let Some(&first) = points.first() else { return Vec::new() };
    let mut out = Vec::with_capacity(points.len() * 2);
    out.push(first);
    for w in points.windows(2) {
        let m = (w[0].0 + w[1].0) * 0.5;
        out.push((m, w[0].1));
        out.push((m, w[1].1));
    }
    if let Some(&last) = points.last() {
        if points.len() > 1 { out.push(last); }
    }
    out
}

const SMOOTH_BUDGET: usize = 20_000;

/// Uniform Catmull-Rom curve through every point. Needs more than three points.
pub fn catmull_rom(points: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let n = points.len();
    if n <= 3 { return points.to_vec(); }
    let steps = (SMOOTH_BUDGET / n).clamp(1, 10);
    let mut out = Vec::with_capacity((n - 1) * steps + 1);
    for i in 0..n - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(n - 1)];
        for s in 0..steps {
            let t = s as f64 / steps as f64;
            let (t2, t3) = (t * t, t * t * t);
            let f = |a: f64, b: f64, c: f64, d: f64| {
                0.5 * (2.0 * b + (c - a) * t + (2.0 * a - 5.0 * b + 4.0 * c - d) * t2 + (3.0 * b - a - 3.0 * c + d) * t3)
            };
            out.push((f(p0.0, p1.0, p2.0, p3.0), f(p0.1, p1.1, p2.1, p3.1)));
        }
    }
    out.push(points[n - 1]);
    out
}

/// Line (and optional fill and markers) for one series in data coordinates.
pub fn stroke_series(points: &[(f64, f64)], scale: &PlotScale, color: skia::Color, opts: &StrokeOptions) -> Vec<Primitive> {
    let mut out = Vec::new();
    let runs = finite_runs(points);
    for run in &runs {
        let path = if opts.stepped {
            step_mid(run)
        } else if opts.smooth {
            catmull_rom(run)
        } else {
            run.clone()
        };
        let px: Vec<(f32, f32)> = path.iter().map(|&(x, y)| scale.map(x, y)).collect();
        if let (Some(alpha), Some(first), Some(last)) = (opts.fill_alpha, path.first(), path.last()) {
            let mut poly = px.clone();
            poly.push(scale.map(last.0, 0.0));
            poly.push(scale.map(first.0, 0.0));
            out.push(Primitive::Polygon { points: poly, fill: with_alpha(color, alpha) });
        }
        out.push(Primitive::Polyline { points: px, color, width: opts.width, dash: opts.dash.clone() });
    }
    if let Some(radius) = opts.marker_radius {
        let marks: Vec<(f32, f32)> = runs.iter().flatten().map(|&(x, y)| scale.map(x, y)).collect();
        if !marks.is_empty() {
            out.push(Primitive::Markers { points: marks, color, radius });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_splits_runs() {
        let pts = [(0.0, 1.0), (1.0, f64::NAN), (2.0, 2.0), (3.0, 3.0)];
        let runs = finite_runs(&pts);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1], vec![(2.0, 2.0), (3.0, 3.0)]);
    }

    #[test]
    fn steps_change_at_midpoints() {
        let s = step_mid(&[(0.0, 1.0), (2.0, 3.0)]);
        assert_eq!(s, vec![(0.0, 1.0), (1.0, 1.0), (1.0, 3.0), (2.0, 3.0)]);
    }

    #[test]
    fn catmull_rom_passes_through_samples() {
        let pts = [(0.0, 0.0), (1.0, 2.0), (2.0, 1.0), (3.0, 4.0), (4.0, 0.0)];
        let smooth = catmull_rom(&pts);
        assert!(smooth.len() > pts.len());
        assert_eq!(smooth.first(), Some(&(0.0, 0.0)));
        assert_eq!(smooth.last(), Some(&(4.0, 0.0)));
        assert!(smooth.contains(&(2.0, 1.0)));
    }
}
