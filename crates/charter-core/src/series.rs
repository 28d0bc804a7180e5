// File: crates/charter-core/src/series.rs
// Summary: Series model: paired x (number or timestamp) and y sequences.
// Notes:
// - Reduction works on indices; `select` is the only way a reduced series is built,
//   so x values keep their original representation.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{ChartError, Result};

/// One x coordinate: a plain number or a point in time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum XValue {
    Num(f64),
    Time(DateTime<Utc>),
}

impl XValue {
    /// Linear numeric projection. Times map to seconds since the epoch.
    pub fn as_f64(&self) -> f64 {
        match *self {
            XValue::Num(v) => v,
            XValue::Time(t) => t.timestamp() as f64 + t.timestamp_subsec_nanos() as f64 * 1e-9,
        }
    }

    pub fn is_time(&self) -> bool { matches!(self, XValue::Time(_)) }

    /// Build a time value from fractional epoch seconds.
    pub fn from_epoch_seconds(secs: f64) -> Option<Self> {
        if !secs.is_finite() { return None; }
        let whole = secs.floor();
        let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
        Utc.timestamp_opt(whole as i64, nanos).single().map(XValue::Time)
    }
}

impl From<f64> for XValue {
    fn from(v: f64) -> Self { XValue::Num(v) }
}

impl From<DateTime<Utc>> for XValue {
    fn from(t: DateTime<Utc>) -> Self { XValue::Time(t) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: Option<String>,
    x: Vec<XValue>,
    y: Vec<f64>,
}

impl Series {
    /// Construct a series, enforcing `len(x) == len(y)`.
    pub fn new(x: Vec<XValue>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(ChartError::LengthMismatch { x: x.len(), y: y.len() });
        }
        Ok(Self { label: None, x, y })
    }

    pub fn from_xy(points: &[(f64, f64)]) -> Self {
        let (x, y) = points.iter().map(|&(x, y)| (XValue::Num(x), y)).unzip();
        Self { label: None, x, y }
    }

    pub fn from_times(times: Vec<DateTime<Utc>>, y: Vec<f64>) -> Result<Self> {
        Self::new(times.into_iter().map(XValue::Time).collect(), y)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn len(&self) -> usize { self.y.len() }
    pub fn is_empty(&self) -> bool { self.y.is_empty() }

    pub fn x(&self) -> &[XValue] { &self.x }
    pub fn y(&self) -> &[f64] { &self.y }

    /// Numeric projection of every x value (used for area and scale math).
    pub fn numeric_x(&self) -> Vec<f64> {
        self.x.iter().map(XValue::as_f64).collect()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().zip(&self.y).map(|(x, &y)| (x.as_f64(), y))
    }

    /// Keep only the given indices, in the given order. Out-of-range indices are skipped.
    pub fn select(&self, indices: &[usize]) -> Self {
        let mut x = Vec::with_capacity(indices.len());
        let mut y = Vec::with_capacity(indices.len());
        for &i in indices {
            if let (Some(&xv), Some(&yv)) = (self.x.get(i), self.y.get(i)) {
                x.push(xv);
                y.push(yv);
            }
        }
        Self { label: self.label.clone(), x, y }
    }

    /// Same x coordinates, different y values (bands and trend lines).
    pub fn with_y(&self, y: Vec<f64>) -> Result<Self> {
        let mut s = Self::new(self.x.clone(), y)?;
        s.label = self.label.clone();
        Ok(s)
    }
}
