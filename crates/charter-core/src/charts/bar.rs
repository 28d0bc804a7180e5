// File: crates/charter-core/src/charts/bar.rs
// Summary: Bar panels: single, grouped and stacked bars, vertical or horizontal.

use crate::axis::Axis;
use crate::error::Result;
use crate::figure::{Primitive, SeriesSummary, TextAlign};
use crate::geometry::RectF;
use crate::legend::LegendGlyph;
use crate::panel::BarData;
use crate::scale::PlotScale;
use crate::style::{BarStyle, Orientation};
use crate::theme::with_alpha;

use super::PanelRenderContext;

/// One bar in data coordinates: category position, thickness, and value span.
struct Bar {
    pos: f64,
    thickness: f64,
    base: f64,
    value: f64,
}

pub fn render(ctx: &mut PanelRenderContext<'_>, style: &BarStyle, data: &BarData) -> Result<()> {
    let n = data.labels.len();
    let k = data.series.len();
    if n == 0 || k == 0 { return Ok(()); }

    // A lone unnamed series is colored per category and has no legend entry.
    let single = k == 1 && data.series[0].name.is_none();
    let stacked = !single && style.stacked;
    let width = style.bar_width.clamp(0.05, 1.0) as f64;

    let mut bars: Vec<Vec<Bar>> = Vec::with_capacity(k);
    let mut bottom = vec![0.0f64; n];
    for (si, s) in data.series.iter().enumerate() {
        let mut row = Vec::with_capacity(n);
        for (ci, &v) in s.values.iter().enumerate().take(n) {
            let bar = if single || stacked {
                Bar { pos: ci as f64, thickness: width, base: if stacked { bottom[ci] } else { 0.0 }, value: v }
            } else {
                let w = width / k as f64;
                let offset = (si as f64 - k as f64 / 2.0 + 0.5) * w;
                Bar { pos: ci as f64 + offset, thickness: w, base: 0.0, value: v }
            };
            if stacked && v.is_finite() { bottom[ci] += v; }
            row.push(bar);
        }
        bars.push(row);
    }

    let extents = bars.iter().flatten().flat_map(|b| [b.base, b.base + b.value]);
    let value_axis = Axis::fit(extents).with_baseline(0.0);
    let category_axis = Axis::category(data.labels.clone());
    let horizontal = style.orientation == Orientation::Horizontal;
    let scale = if horizontal {
        ctx.axes(&value_axis, &category_axis, true)
    } else {
        ctx.axes(&category_axis, &value_axis, true)
    };

    let edge = style.edge_color.map(|c| (c, ctx.pt(style.edge_width)));
    let tick_px = ctx.pt(ctx.theme.tick_font_size);
    let mut items = Vec::new();
    let mut value_labels = Vec::new();
    for (si, row) in bars.iter().enumerate() {
        let series_color = ctx.theme.color(si);
        for (ci, b) in row.iter().enumerate() {
            if !b.value.is_finite() { continue; }
            let color = if single { ctx.theme.color(ci) } else { series_color };
            let rect = bar_rect(b, &scale, horizontal);
            items.push(Primitive::Rect { rect, fill: Some(with_alpha(color, style.alpha)), stroke: edge });
            if style.show_values {
                value_labels.push(value_label(b.value, &rect, horizontal, b.value < 0.0, tick_px, ctx.theme.text));
            }
        }
        if !single {
            if let Some(name) = &data.series[si].name {
                ctx.legend_entry(name.clone(), LegendGlyph::patch(with_alpha(series_color, style.alpha)));
            }
        }
        ctx.record(SeriesSummary {
            label: data.series[si].name.clone(),
            original_len: row.len(),
            rendered_len: row.len(),
            rasterized: false,
            markers: false,
        });
    }
    ctx.draw(items, false);
    for l in value_labels {
        ctx.draw_unclipped(l);
    }
    Ok(())
}

fn bar_rect(b: &Bar, scale: &PlotScale, horizontal: bool) -> RectF {
    let (p0, p1) = (b.pos - b.thickness / 2.0, b.pos + b.thickness / 2.0);
    let (v0, v1) = (b.base, b.base + b.value);
    let ((ax, ay), (bx, by)) = if horizontal {
        (scale.map(v0, p0), scale.map(v1, p1))
    } else {
        (scale.map(p0, v0), scale.map(p1, v1))
    };
    RectF::from_ltrb(ax.min(bx), ay.min(by), ax.max(bx), ay.max(by))
}

fn value_label(v: f64, rect: &RectF, horizontal: bool, negative: bool, size: f32, color: skia_safe::Color) -> Primitive {
    let text = format!("{v:.1}");
    let gap = size * 0.3;
    let (x, y, align) = match (horizontal, negative) {
        (false, false) => (rect.center_x(), rect.top - gap, TextAlign::Center),
        (false, true) => (rect.center_x(), rect.bottom + gap + size, TextAlign::Center),
        (true, false) => (rect.right + gap, rect.center_y() + size * 0.35, TextAlign::Left),
        (true, true) => (rect.left - gap, rect.center_y() + size * 0.35, TextAlign::Right),
    };
    Primitive::Text { text, x, y, size, color, align, rotated: false }
}
