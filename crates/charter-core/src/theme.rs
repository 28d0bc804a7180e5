// File: crates/charter-core/src/theme.rs
// Summary: Theme presets (colors, palette, font sizes) and the per-series color lookup.

use skia_safe as skia;
use tracing::warn;

use crate::error::{ChartError, Result};

pub const PALETTE_LEN: usize = 8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub text: skia::Color,
    pub title: skia::Color,
    pub grid: skia::Color,
    pub axis_line: skia::Color,
    pub palette: [skia::Color; PALETTE_LEN],
    pub title_font_size: f32,
    pub label_font_size: f32,
    pub tick_font_size: f32,
    pub legend_font_size: f32,
    pub line_width: f32,
    /// Grid opacity in 0..=1.
    pub grid_alpha: f32,
    pub grid_dashed: bool,
    pub spine_visible: bool,
}

/// `0xRRGGBB` to an opaque color.
pub fn rgb(hex: u32) -> skia::Color {
    skia::Color::from_argb(255, (hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

/// Parse `#RRGGBB` (or `RRGGBB`).
pub fn parse_hex_color(s: &str) -> Option<skia::Color> {
    let h = s.trim().trim_start_matches('#');
    if h.len() != 6 { return None; }
    u32::from_str_radix(h, 16).ok().map(rgb)
}

/// Same color with its alpha scaled by `alpha` (0..=1).
pub fn with_alpha(c: skia::Color, alpha: f32) -> skia::Color {
    let a = (alpha.clamp(0.0, 1.0) * c.a() as f32).round() as u8;
    skia::Color::from_argb(a, c.r(), c.g(), c.b())
}

impl Theme {
    /// Deterministic series color; wraps around the palette.
    pub fn color(&self, index: usize) -> skia::Color {
        self.palette[index % PALETTE_LEN]
    }

    fn base(name: &'static str) -> Self {
        Self {
            name,
            background: rgb(0xFFFFFF),
            text: rgb(0x333333),
            title: rgb(0x1A1A1A),
            grid: rgb(0xE5E5E5),
            axis_line: rgb(0x666666),
            palette: [
                rgb(0x4C72B0), rgb(0x55A868), rgb(0xC44E52), rgb(0x8172B3),
                rgb(0xCCB974), rgb(0x64B5CD), rgb(0xE377C2), rgb(0x7F7F7F),
            ],
            title_font_size: 14.0,
            label_font_size: 12.0,
            tick_font_size: 10.0,
            legend_font_size: 10.0,
            line_width: 2.0,
            grid_alpha: 0.6,
            grid_dashed: true,
            spine_visible: true,
        }
    }

    pub fn default_theme() -> Self {
        Self::base("default")
    }

    pub fn dark() -> Self {
        Self {
            background: rgb(0x1E1E1E),
            text: rgb(0xE0E0E0),
            title: rgb(0xFFFFFF),
            grid: rgb(0x3D3D3D),
            axis_line: rgb(0x808080),
            palette: [
                rgb(0x5DA5DA), rgb(0x60BD68), rgb(0xF15854), rgb(0xB276B2),
                rgb(0xDECF3F), rgb(0x4DC4FF), rgb(0xF17CB0), rgb(0xB2B2B2),
            ],
            grid_alpha: 0.4,
            ..Self::base("dark")
        }
    }

    pub fn light() -> Self {
        Self {
            background: rgb(0xFAFAFA),
            text: rgb(0x424242),
            title: rgb(0x212121),
            grid: rgb(0xEEEEEE),
            axis_line: rgb(0x9E9E9E),
            palette: [
                rgb(0x1976D2), rgb(0x388E3C), rgb(0xD32F2F), rgb(0x7B1FA2),
                rgb(0xFFA000), rgb(0x0097A7), rgb(0xC2185B), rgb(0x616161),
            ],
            grid_alpha: 0.5,
            grid_dashed: false,
            spine_visible: false,
            ..Self::base("light")
        }
    }

    pub fn minimal() -> Self {
        Self {
            text: rgb(0x555555),
            title: rgb(0x333333),
            grid: rgb(0xF0F0F0),
            axis_line: rgb(0xCCCCCC),
            palette: [
                rgb(0x2E86AB), rgb(0xA23B72), rgb(0xF18F01), rgb(0xC73E1D),
                rgb(0x3B1F2B), rgb(0x44AF69), rgb(0x6E7E85), rgb(0xB8D4E3),
            ],
            title_font_size: 12.0,
            label_font_size: 10.0,
            tick_font_size: 9.0,
            legend_font_size: 9.0,
            line_width: 1.5,
            grid_alpha: 0.3,
            grid_dashed: false,
            spine_visible: false,
            ..Self::base("minimal")
        }
    }

    pub fn vibrant() -> Self {
        Self {
            text: rgb(0x2C3E50),
            title: rgb(0x1A252F),
            grid: rgb(0xECF0F1),
            axis_line: rgb(0x7F8C8D),
            palette: [
                rgb(0xE74C3C), rgb(0x3498DB), rgb(0x2ECC71), rgb(0x9B59B6),
                rgb(0xF39C12), rgb(0x1ABC9C), rgb(0xE91E63), rgb(0x00BCD4),
            ],
            title_font_size: 16.0,
            line_width: 2.5,
            grid_alpha: 0.4,
            ..Self::base("vibrant")
        }
    }
}

impl Default for Theme {
    fn default() -> Self { Self::default_theme() }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![
        Theme::default_theme(),
        Theme::dark(),
        Theme::light(),
        Theme::minimal(),
        Theme::vibrant(),
    ]
}

/// Find a theme by name (case-insensitive).
pub fn find(name: &str) -> Result<Theme> {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| ChartError::UnknownTheme {
            name: name.to_string(),
            available: presets().iter().map(|t| t.name).collect::<Vec<_>>().join(", "),
        })
}

/// Like [`find`], but an unknown name logs a warning and yields the default theme.
pub fn find_or_default(name: &str) -> Theme {
    find(name).unwrap_or_else(|e| {
        warn!(error = %e, "falling back to the default theme");
        Theme::default_theme()
    })
}
