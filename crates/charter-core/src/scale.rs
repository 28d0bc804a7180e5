// File: crates/charter-core/src/scale.rs
// Summary: Linear data -> pixel transforms for a panel's plot rectangle.

use crate::axis::Axis;
use crate::geometry::RectF;

/// Maps `[d0, d1]` onto `[r0, r1]` pixels. `r1 < r0` is allowed (inverted y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    pub d0: f64,
    pub d1: f64,
    pub r0: f32,
    pub r1: f32,
}

impl LinearScale {
    pub fn new(d0: f64, d1: f64, r0: f32, r1: f32) -> Self {
        let mut s = Self { d0, d1, r0, r1 };
        if (s.d1 - s.d0).abs() < 1e-12 { s.d1 = s.d0 + 1.0; }
        s
    }
    #[inline]
    pub fn to_px(&self, v: f64) -> f32 {
        self.r0 + ((v - self.d0) / (self.d1 - self.d0)) as f32 * (self.r1 - self.r0)
    }
    #[inline]
    pub fn from_px(&self, px: f32) -> f64 {
        let span = self.r1 - self.r0;
        if span.abs() < f32::EPSILON { return self.d0; }
        self.d0 + ((px - self.r0) / span) as f64 * (self.d1 - self.d0)
    }
}

/// X and Y scales for one plot rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotScale {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl PlotScale {
    pub fn new(plot: &RectF, x: &Axis, y: &Axis) -> Self {
        Self {
            x: LinearScale::new(x.min, x.max, plot.left, plot.right),
            y: LinearScale::new(y.min, y.max, plot.bottom, plot.top),
        }
    }
    #[inline]
    pub fn map(&self, x: f64, y: f64) -> (f32, f32) {
        (self.x.to_px(x), self.y.to_px(y))
    }
}
