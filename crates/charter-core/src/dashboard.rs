// File: crates/charter-core/src/dashboard.rs
// Summary: Multi-panel composition: grid allocation, per-panel render, shared legend and title.
// Notes:
// - Every panel is validated before anything is drawn.
// - Legend entries are merged in panel order; the first glyph seen for a label wins.
// - Panels render into the fixed-fraction content rect first; if the automatic margins
//   pick a different rect, panels are rendered again into it.

use tracing::debug;

use crate::charts::{render_panel, PanelOutput};
use crate::error::{ChartError, Result};
use crate::figure::{Primitive, RenderedFigure, TextAlign};
use crate::geometry::RectF;
use crate::grid::GridSpec;
use crate::layout::{reserved_fractions, LayoutSpec, LegendPosition, MarginRequest};
use crate::legend::{LegendBox, LegendCollector};
use crate::panel::PanelSpec;
use crate::settings::Settings;
use crate::style::{Style, StyleRegistry};
use crate::theme::Theme;

/// Composes dashboards against a read-only style registry and settings.
/// Holds no per-render state, so one composer can serve many threads.
#[derive(Clone, Copy, Debug)]
pub struct Composer<'a> {
    styles: &'a StyleRegistry,
    settings: &'a Settings,
}

impl<'a> Composer<'a> {
    pub fn new(styles: &'a StyleRegistry, settings: &'a Settings) -> Self {
        Self { styles, settings }
    }

    /// Resolve styles and check data shapes and grid bounds for every panel.
    pub fn validate(&self, panels: &[PanelSpec], grid: &GridSpec) -> Result<Vec<&'a Style>> {
        let mut styles = Vec::with_capacity(panels.len());
        for (i, p) in panels.iter().enumerate() {
            let style = self.styles.get(p.kind, &p.style)?;
            p.validate(i)?;
            if p.row_end() > grid.rows || p.col_end() > grid.cols {
                return Err(ChartError::PanelOutOfGrid {
                    index: i,
                    row: p.grid_row,
                    row_end: p.row_end(),
                    col: p.grid_col,
                    col_end: p.col_end(),
                    rows: grid.rows,
                    cols: grid.cols,
                });
            }
            styles.push(style);
        }
        for (i, a) in panels.iter().enumerate() {
            for (j, b) in panels.iter().enumerate().skip(i + 1) {
                let rows = a.grid_row < b.row_end() && b.grid_row < a.row_end();
                let cols = a.grid_col < b.col_end() && b.grid_col < a.col_end();
                if rows && cols {
                    debug!(first = i, second = j, "panels overlap; later panel draws on top");
                }
            }
        }
        Ok(styles)
    }

    pub fn compose(
        &self,
        panels: &[PanelSpec],
        layout: &LayoutSpec,
        theme: &Theme,
        title: Option<&str>,
    ) -> Result<RenderedFigure> {
        layout.validate()?;
        let grid = layout.grid()?;
        let styles = self.validate(panels, &grid)?;

        let dpi = layout.dpi.unwrap_or(self.settings.dpi);
        let (width, height) = layout.pixel_size(dpi);
        let (w, h) = (width as f32, height as f32);
        let px_per_pt = dpi as f32 / 72.0;

        let legend_pos = layout.shared_legend.then_some(layout.legend_position);
        let explicit = RectF::from_fractions(w, h, reserved_fractions(legend_pos, title.is_some()));
        let mut outputs = self.render_all(panels, &styles, &grid, explicit, theme, px_per_pt)?;

        let mut collector = LegendCollector::new();
        for o in &outputs {
            collector.extend(o.legend.iter().cloned());
        }
        let entries = if layout.shared_legend { collector.finish() } else { Vec::new() };

        let legend_px = theme.legend_font_size * px_per_pt;
        let legend_box = (!entries.is_empty()).then(|| {
            let ncol = match layout.legend_position {
                LegendPosition::Right => 1,
                _ => entries.len(),
            };
            LegendBox::measure(&entries, legend_px, ncol)
        });
        let title_px = (theme.title_font_size + 2.0) * px_per_pt;
        let request = MarginRequest {
            width: w,
            height: h,
            legend: legend_box.as_ref().map(|b| (layout.legend_position, b.width, b.height)),
            title_height: title.map(|_| title_px * 1.3),
            title_y: layout.title_y,
            pad: 8.0 * px_per_pt,
        };
        let margins = request.resolve(&grid);
        if margins.content != explicit {
            outputs = self.render_all(panels, &styles, &grid, margins.content, theme, px_per_pt)?;
        }

        let mut primitives = Vec::new();
        let mut summaries = Vec::with_capacity(outputs.len());
        for o in outputs {
            primitives.extend(o.primitives);
            summaries.push(o.summary);
        }

        let mut legend_rect = None;
        if let (Some(b), Some((x, y))) = (&legend_box, margins.legend_origin) {
            primitives.extend(b.draw(&entries, x, y, theme));
            legend_rect = Some(RectF::from_ltwh(x, y, b.width, b.height));
        }
        if let Some(t) = title {
            primitives.push(Primitive::Text {
                text: t.to_string(),
                x: w * 0.5,
                y: (1.0 - layout.title_y) * h + title_px,
                size: title_px,
                color: theme.title,
                align: TextAlign::Center,
                rotated: false,
            });
        }

        debug!(
            panels = panels.len(),
            width,
            height,
            legend_entries = entries.len(),
            fallback = margins.fallback,
            "composed dashboard"
        );
        Ok(RenderedFigure {
            width,
            height,
            background: theme.background,
            primitives,
            legend: entries,
            legend_rect,
            content_rect: margins.content,
            margin_fallback: margins.fallback,
            panels: summaries,
        })
    }

    fn render_all(
        &self,
        panels: &[PanelSpec],
        styles: &[&Style],
        grid: &GridSpec,
        content: RectF,
        theme: &Theme,
        px_per_pt: f32,
    ) -> Result<Vec<PanelOutput>> {
        panels
            .iter()
            .zip(styles)
            .enumerate()
            .map(|(i, (p, style))| {
                let cell = grid.span(&content, p.grid_row, p.grid_col, p.row_span, p.col_span);
                render_panel(i, p, style, theme, self.settings, cell, px_per_pt)
            })
            .collect()
    }
}
