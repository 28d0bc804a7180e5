// File: crates/charter-core/src/legend.rs
// Summary: Legend entries, first-wins deduplication across panels, and legend box layout.

use indexmap::IndexMap;
use skia_safe as skia;

use crate::figure::{estimate_text_width, Primitive, TextAlign};
use crate::geometry::RectF;
use crate::theme::{with_alpha, Theme};

/// How an entry is drawn in the legend box.
#[derive(Clone, Debug, PartialEq)]
pub enum GlyphShape {
    Line { width: f32, dash: Option<Vec<f32>> },
    Patch,
    Marker,
}

/// Visual handle of a legend entry: the glyph of the series that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendGlyph {
    pub shape: GlyphShape,
    pub color: skia::Color,
}

impl LegendGlyph {
    pub fn line(color: skia::Color, width: f32, dash: Option<Vec<f32>>) -> Self {
        Self { shape: GlyphShape::Line { width, dash }, color }
    }
    pub fn patch(color: skia::Color) -> Self {
        Self { shape: GlyphShape::Patch, color }
    }
    pub fn marker(color: skia::Color) -> Self {
        Self { shape: GlyphShape::Marker, color }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub glyph: LegendGlyph,
}

impl LegendEntry {
    pub fn new(label: impl Into<String>, glyph: LegendGlyph) -> Self {
        Self { label: label.into(), glyph }
    }
}

/// Ordered label -> glyph map. The first glyph seen for a label is kept.
#[derive(Clone, Debug, Default)]
pub struct LegendCollector {
    entries: IndexMap<String, LegendGlyph>,
}

impl LegendCollector {
    pub fn new() -> Self { Self::default() }

    /// Returns `true` if the label was new.
    pub fn push(&mut self, entry: LegendEntry) -> bool {
        if self.entries.contains_key(&entry.label) { return false; }
        self.entries.insert(entry.label, entry.glyph);
        true
    }

    pub fn extend<I: IntoIterator<Item = LegendEntry>>(&mut self, entries: I) {
        for e in entries {
            self.push(e);
        }
    }

    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn finish(self) -> Vec<LegendEntry> {
        self.entries.into_iter().map(|(label, glyph)| LegendEntry { label, glyph }).collect()
    }
}

/// Deduplicate by label in first-seen order.
pub fn dedup_entries<I: IntoIterator<Item = LegendEntry>>(entries: I) -> Vec<LegendEntry> {
    let mut c = LegendCollector::new();
    c.extend(entries);
    c.finish()
}

/// Measured legend box: entries laid out row-major in `ncol` columns.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendBox {
    pub font_px: f32,
    pub ncol: usize,
    pub col_widths: Vec<f32>,
    pub width: f32,
    pub height: f32,
}

impl LegendBox {
    fn glyph_len(&self) -> f32 { self.font_px * 2.0 }
    fn gap(&self) -> f32 { self.font_px * 0.8 }
    fn pad(&self) -> f32 { self.font_px * 0.5 }
    fn row_h(&self) -> f32 { self.font_px * 1.6 }

    pub fn measure(entries: &[LegendEntry], font_px: f32, ncol: usize) -> Self {
        let ncol = ncol.clamp(1, entries.len().max(1));
        let mut b = Self { font_px, ncol, col_widths: vec![0.0; ncol], width: 0.0, height: 0.0 };
        let item = b.glyph_len() + b.gap();
        for (i, e) in entries.iter().enumerate() {
            let w = item + estimate_text_width(&e.label, font_px);
            let c = i % ncol;
            b.col_widths[c] = b.col_widths[c].max(w);
        }
        let rows = entries.len().div_ceil(ncol).max(1);
        b.width = 2.0 * b.pad() + b.col_widths.iter().sum::<f32>() + b.gap() * (ncol as f32 - 1.0);
        b.height = 2.0 * b.pad() + rows as f32 * b.row_h();
        b
    }

    /// Primitives for a framed legend whose top-left corner is at `(left, top)`.
    pub fn draw(&self, entries: &[LegendEntry], left: f32, top: f32, theme: &Theme) -> Vec<Primitive> {
        let frame = RectF::from_ltwh(left, top, self.width, self.height);
        let mut out = vec![Primitive::Rect {
            rect: frame,
            fill: Some(with_alpha(theme.background, 0.9)),
            stroke: Some((theme.grid, 1.0)),
        }];
        let mut col_x = Vec::with_capacity(self.ncol);
        let mut x = left + self.pad();
        for w in &self.col_widths {
            col_x.push(x);
            x += w + self.gap();
        }
        let glyph_len = self.glyph_len();
        for (i, e) in entries.iter().enumerate() {
            let x0 = col_x[i % self.ncol];
            let cy = top + self.pad() + (i / self.ncol) as f32 * self.row_h() + self.row_h() * 0.5;
            match &e.glyph.shape {
                GlyphShape::Line { width, dash } => out.push(Primitive::Line {
                    from: (x0, cy),
                    to: (x0 + glyph_len, cy),
                    color: e.glyph.color,
                    width: *width,
                    dash: dash.clone(),
                }),
                GlyphShape::Patch => out.push(Primitive::Rect {
                    rect: RectF::from_ltwh(x0, cy - self.font_px * 0.35, glyph_len, self.font_px * 0.7),
                    fill: Some(e.glyph.color),
                    stroke: None,
                }),
                GlyphShape::Marker => out.push(Primitive::Markers {
                    points: vec![(x0 + glyph_len * 0.5, cy)],
                    color: e.glyph.color,
                    radius: self.font_px * 0.35,
                }),
            }
            out.push(Primitive::Text {
                text: e.label.clone(),
                x: x0 + glyph_len + self.gap(),
                y: cy + self.font_px * 0.35,
                size: self.font_px,
                color: theme.text,
                align: TextAlign::Left,
                rotated: false,
            });
        }
        out
    }
}
