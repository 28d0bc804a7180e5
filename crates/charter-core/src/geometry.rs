// File: crates/charter-core/src/geometry.rs
// Summary: Pixel rectangles and insets used by grid allocation and panel layout.

/// Axis-aligned rectangle in pixels, y growing downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub const fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }
    pub fn from_ltwh(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, right: left + width, bottom: top + height }
    }
    /// Rectangle from figure fractions `(left, bottom, right, top)` with y growing
    /// upwards, the convention layout margins are written in.
    pub fn from_fractions(width: f32, height: f32, frac: [f32; 4]) -> Self {
        let [l, b, r, t] = frac;
        Self { left: l * width, top: (1.0 - t) * height, right: r * width, bottom: (1.0 - b) * height }
    }
    pub fn width(&self) -> f32 { self.right - self.left }
    pub fn height(&self) -> f32 { self.bottom - self.top }
    pub fn center_x(&self) -> f32 { (self.left + self.right) * 0.5 }
    pub fn center_y(&self) -> f32 { (self.top + self.bottom) * 0.5 }
    pub fn is_empty(&self) -> bool { !(self.width() > 0.0 && self.height() > 0.0) }

    /// Shrink by `insets`, never inverting.
    pub fn inset(&self, insets: &Insets) -> Self {
        let left = (self.left + insets.left).min(self.right);
        let top = (self.top + insets.top).min(self.bottom);
        Self {
            left,
            top,
            right: (self.right - insets.right).max(left),
            bottom: (self.bottom - insets.bottom).max(top),
        }
    }
}

/// Margins in pixels. Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Insets {
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self { left, right, top, bottom }
    }
}
