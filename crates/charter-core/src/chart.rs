// File: crates/charter-core/src/chart.rs
// Summary: Single-chart API: one panel rendered into its own figure with an in-plot legend.

use std::path::Path;

use crate::charts::render_panel;
use crate::error::Result;
use crate::figure::RenderedFigure;
use crate::geometry::{Insets, RectF};
use crate::legend::{dedup_entries, LegendBox};
use crate::panel::{PanelData, PanelSpec};
use crate::settings::Settings;
use crate::style::StyleRegistry;
use crate::theme::Theme;

pub struct Chart {
    pub spec: PanelSpec,
    pub theme: Theme,
    /// Inches; `Settings::figure_size` when unset.
    pub figure_size: Option<(f32, f32)>,
    pub dpi: Option<u32>,
    pub show_legend: bool,
}

impl Chart {
    pub fn new(data: PanelData) -> Self {
        Self { spec: PanelSpec::new(data), theme: Theme::default(), figure_size: None, dpi: None, show_legend: true }
    }

    pub fn from_spec(spec: PanelSpec) -> Self {
        Self { spec, theme: Theme::default(), figure_size: None, dpi: None, show_legend: true }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self { self.theme = theme; self }
    pub fn with_size(mut self, width_in: f32, height_in: f32) -> Self { self.figure_size = Some((width_in, height_in)); self }
    pub fn with_dpi(mut self, dpi: u32) -> Self { self.dpi = Some(dpi); self }

    /// Compose the chart in memory.
    pub fn render(&self, styles: &StyleRegistry, settings: &Settings) -> Result<RenderedFigure> {
        let style = styles.get(self.spec.kind, &self.spec.style)?;
        self.spec.validate(0)?;

        let dpi = self.dpi.unwrap_or(settings.dpi).max(1);
        let (wi, hi) = self.figure_size.unwrap_or(settings.figure_size);
        let width = (wi * dpi as f32).round().max(1.0) as u32;
        let height = (hi * dpi as f32).round().max(1.0) as u32;
        let px_per_pt = dpi as f32 / 72.0;

        let pad = 8.0 * px_per_pt;
        let frame = RectF::from_ltwh(0.0, 0.0, width as f32, height as f32);
        let cell = frame.inset(&Insets::new(pad, pad, pad, pad));
        let out = render_panel(0, &self.spec, style, &self.theme, settings, cell, px_per_pt)?;

        let mut primitives = out.primitives;
        let entries = if self.show_legend { dedup_entries(out.legend) } else { Vec::new() };
        let mut legend_rect = None;
        if !entries.is_empty() {
            let b = LegendBox::measure(&entries, self.theme.legend_font_size * px_per_pt, 1);
            let plot = out.summary.plot;
            let inner = 4.0 * px_per_pt;
            let (x, y) = ((plot.right - b.width - inner).max(plot.left), plot.top + inner);
            primitives.extend(b.draw(&entries, x, y, &self.theme));
            legend_rect = Some(RectF::from_ltwh(x, y, b.width, b.height));
        }

        Ok(RenderedFigure {
            width,
            height,
            background: self.theme.background,
            primitives,
            legend: entries,
            legend_rect,
            content_rect: cell,
            margin_fallback: false,
            panels: vec![out.summary],
        })
    }

    /// Render to a PNG file at `path`.
    pub fn render_to_png(&self, styles: &StyleRegistry, settings: &Settings, path: impl AsRef<Path>) -> Result<()> {
        self.render(styles, settings)?.render_to_png(path)
    }
}
