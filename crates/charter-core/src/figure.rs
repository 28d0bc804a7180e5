// File: crates/charter-core/src/figure.rs
// Summary: RenderedFigure display list and its Skia CPU raster backend (RGBA / PNG).
// Notes:
// - Composition only builds primitives; nothing touches a Skia surface until one of
//   the `render_to_*` methods is called, so figures can be built on any thread.
// - `Primitive::Raster` is flattened into an offscreen bitmap before compositing.

use std::io::Cursor;
use std::path::Path;

use skia_safe as skia;

use crate::error::{ChartError, Result};
use crate::geometry::RectF;
use crate::legend::LegendEntry;

/// Layout-time width estimate for `text` at `size` px. Layout never needs a font
/// manager, so composed figures are identical across machines.
pub fn estimate_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.6
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Rect { rect: RectF, fill: Option<skia::Color>, stroke: Option<(skia::Color, f32)> },
    Line { from: (f32, f32), to: (f32, f32), color: skia::Color, width: f32, dash: Option<Vec<f32>> },
    Polyline { points: Vec<(f32, f32)>, color: skia::Color, width: f32, dash: Option<Vec<f32>> },
    Polygon { points: Vec<(f32, f32)>, fill: skia::Color },
    Markers { points: Vec<(f32, f32)>, color: skia::Color, radius: f32 },
    /// `(x, y)` is the baseline anchor; `rotated` turns the text 90 degrees counter-clockwise.
    Text { text: String, x: f32, y: f32, size: f32, color: skia::Color, align: TextAlign, rotated: bool },
    Clip { rect: RectF, items: Vec<Primitive> },
    /// Items flattened into one bitmap layer covering `bounds`.
    Raster { bounds: RectF, items: Vec<Primitive> },
}

/// What a panel did with one series; kept for inspection and logging.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesSummary {
    pub label: Option<String>,
    pub original_len: usize,
    pub rendered_len: usize,
    pub rasterized: bool,
    pub markers: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PanelSummary {
    pub cell: RectF,
    pub plot: RectF,
    pub series: Vec<SeriesSummary>,
}

/// One composed figure held in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedFigure {
    pub width: u32,
    pub height: u32,
    pub background: skia::Color,
    pub primitives: Vec<Primitive>,
    /// Entries of the legend drawn on the figure, in display order.
    pub legend: Vec<LegendEntry>,
    pub legend_rect: Option<RectF>,
    /// Region reserved for panel content (excludes shared legend and title).
    pub content_rect: RectF,
    /// Whether `content_rect` came from the explicit margin fallback.
    pub margin_fallback: bool,
    pub panels: Vec<PanelSummary>,
}

impl RenderedFigure {
    /// Rasterize to an unpremultiplied RGBA8 buffer: (pixels, width, height, stride).
    pub fn render_to_rgba8(&self) -> Result<(Vec<u8>, u32, u32, usize)> {
        let (w, h) = (self.width.max(1) as i32, self.height.max(1) as i32);
        let mut surface = skia::surfaces::raster_n32_premul((w, h))
            .ok_or_else(|| ChartError::Render("failed to create raster surface".into()))?;
        {
            let canvas = surface.canvas();
            canvas.clear(self.background);
            let typeface = skia::FontMgr::default().legacy_make_typeface(None, skia::FontStyle::normal());
            for p in &self.primitives {
                draw(canvas, p, typeface.as_ref())?;
            }
        }

        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let stride = w as usize * 4;
        let mut pixels = vec![0u8; stride * h as usize];
        if !surface.read_pixels(&info, &mut pixels, stride, (0, 0)) {
            return Err(ChartError::Render("reading back raster pixels failed".into()));
        }
        Ok((pixels, w as u32, h as u32, stride))
    }

    pub fn render_to_png_bytes(&self) -> Result<Vec<u8>> {
        let (pixels, w, h, _) = self.render_to_rgba8()?;
        let img = image::RgbaImage::from_raw(w, h, pixels)
            .ok_or_else(|| ChartError::Render("pixel buffer does not match figure size".into()))?;
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| ChartError::Render(format!("encode PNG failed: {e}")))?;
        Ok(out.into_inner())
    }

    /// Render to a PNG file, creating parent directories as needed.
    pub fn render_to_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.render_to_png_bytes()?;
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Count of primitives, descending into clips and raster layers.
    pub fn primitive_count(&self) -> usize {
        fn count(items: &[Primitive]) -> usize {
            items.iter().map(|p| match p {
                Primitive::Clip { items, .. } | Primitive::Raster { items, .. } => 1 + count(items),
                _ => 1,
            }).sum()
        }
        count(&self.primitives)
    }

    /// Every text string drawn on the figure, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        fn walk<'a>(items: &'a [Primitive], out: &mut Vec<&'a str>) {
            for p in items {
                match p {
                    Primitive::Text { text, .. } => out.push(text),
                    Primitive::Clip { items, .. } | Primitive::Raster { items, .. } => walk(items, out),
                    _ => {}
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.primitives, &mut out);
        out
    }
}

// ---- skia backend ------------------------------------------------------------

fn sk_rect(r: &RectF) -> skia::Rect {
    skia::Rect::from_ltrb(r.left, r.top, r.right, r.bottom)
}

fn stroke_paint(color: skia::Color, width: f32, dash: Option<&[f32]>) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width);
    paint.set_color(color);
    if let Some(intervals) = dash {
        if intervals.len() >= 2 && intervals.len() % 2 == 0 {
            paint.set_path_effect(skia::PathEffect::dash(intervals, 0.0));
        }
    }
    paint
}

fn fill_paint(color: skia::Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(color);
    paint
}

fn path_of(points: &[(f32, f32)], close: bool) -> Option<skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut path = skia::Path::new();
    path.move_to(*first);
    for &p in rest {
        path.line_to(p);
    }
    if close {
        path.close();
    }
    Some(path)
}

fn draw(canvas: &skia::Canvas, p: &Primitive, typeface: Option<&skia::Typeface>) -> Result<()> {
    match p {
        Primitive::Rect { rect, fill, stroke } => {
            if let Some(c) = fill {
                canvas.draw_rect(sk_rect(rect), &fill_paint(*c));
            }
            if let Some((c, w)) = stroke {
                canvas.draw_rect(sk_rect(rect), &stroke_paint(*c, *w, None));
            }
        }
        Primitive::Line { from, to, color, width, dash } => {
            canvas.draw_line(*from, *to, &stroke_paint(*color, *width, dash.as_deref()));
        }
        Primitive::Polyline { points, color, width, dash } => {
            if points.len() >= 2 {
                if let Some(path) = path_of(points, false) {
                    let mut paint = stroke_paint(*color, *width, dash.as_deref());
                    paint.set_stroke_join(skia::paint::Join::Round);
                    canvas.draw_path(&path, &paint);
                }
            }
        }
        Primitive::Polygon { points, fill } => {
            if points.len() >= 3 {
                if let Some(path) = path_of(points, true) {
                    canvas.draw_path(&path, &fill_paint(*fill));
                }
            }
        }
        Primitive::Markers { points, color, radius } => {
            let paint = fill_paint(*color);
            for &pt in points {
                canvas.draw_circle(pt, *radius, &paint);
            }
        }
        Primitive::Text { text, x, y, size, color, align, rotated } => {
            let paint = fill_paint(*color);
            let font = match typeface {
                Some(tf) => skia::Font::new(tf.clone(), size.max(1.0)),
                None => {
                    let mut f = skia::Font::default();
                    f.set_size(size.max(1.0));
                    f
                }
            };
            let (width, _) = font.measure_str(text, Some(&paint));
            let dx = match align {
                TextAlign::Left => 0.0,
                TextAlign::Center => -width * 0.5,
                TextAlign::Right => -width,
            };
            if *rotated {
                canvas.save();
                canvas.rotate(-90.0, Some(skia::Point::new(*x, *y)));
                canvas.draw_str(text, (*x + dx, *y), &font, &paint);
                canvas.restore();
            } else {
                canvas.draw_str(text, (*x + dx, *y), &font, &paint);
            }
        }
        Primitive::Clip { rect, items } => {
            canvas.save();
            canvas.clip_rect(sk_rect(rect), None, Some(true));
            for item in items {
                draw(canvas, item, typeface)?;
            }
            canvas.restore();
        }
        Primitive::Raster { bounds, items } => {
            let w = bounds.width().ceil().max(1.0) as i32;
            let h = bounds.height().ceil().max(1.0) as i32;
            let mut layer = skia::surfaces::raster_n32_premul((w, h))
                .ok_or_else(|| ChartError::Render("failed to create raster layer".into()))?;
            {
                let lc = layer.canvas();
                lc.clear(skia::Color::TRANSPARENT);
                lc.translate((-bounds.left, -bounds.top));
                for item in items {
                    draw(lc, item, typeface)?;
                }
            }
            let image = layer.image_snapshot();
            canvas.draw_image(&image, (bounds.left, bounds.top), None);
        }
    }
    Ok(())
}
