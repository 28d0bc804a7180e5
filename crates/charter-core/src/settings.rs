// File: crates/charter-core/src/settings.rs
// Summary: Read-only render settings (defaults, CHARTER_* environment overrides, JSON).

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{ChartError, Result};

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "CHARTER_";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub output_dir: PathBuf,
    pub default_theme: String,
    pub default_style: String,
    pub dpi: u32,
    /// Figure size in inches (width, height) for single charts.
    pub figure_size: (f32, f32),
    /// Global reduction threshold used when a style gives none.
    pub downsample_threshold: usize,
    /// Default hard cap on points handed to the renderer.
    pub max_points: usize,
    /// Default point count above which auto-rasterization kicks in.
    pub rasterize_threshold: usize,
    /// Point count above which reduction logs a warning.
    pub large_dataset_warning: usize,
    /// Rendered point count at which per-point markers are dropped.
    pub marker_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("output"),
            default_theme: "default".to_string(),
            default_style: "default".to_string(),
            dpi: 150,
            figure_size: (10.0, 6.0),
            downsample_threshold: 5_000,
            max_points: 10_000,
            rasterize_threshold: 10_000,
            large_dataset_warning: 100_000,
            marker_limit: 10_000,
        }
    }
}

impl Settings {
    /// Defaults overridden by `CHARTER_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Defaults overridden by the given `(name, value)` pairs; names without the
    /// `CHARTER_` prefix are ignored, as are unknown settings.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut s = Self::default();
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX) else { continue };
            let value = value.as_ref().trim();
            match name.to_ascii_lowercase().as_str() {
                "output_dir" => s.output_dir = PathBuf::from(value),
                "default_theme" => s.default_theme = value.to_string(),
                "default_style" => s.default_style = value.to_string(),
                "default_dpi" | "dpi" => s.dpi = parse_num(name, value)?,
                "default_figsize" | "figure_size" => s.figure_size = parse_figsize(value)?,
                "downsample_threshold" => s.downsample_threshold = parse_num(name, value)?,
                "max_points" => s.max_points = parse_num(name, value)?,
                "rasterize_threshold" => s.rasterize_threshold = parse_num(name, value)?,
                "large_dataset_warning" => s.large_dataset_warning = parse_num(name, value)?,
                "marker_limit" => s.marker_limit = parse_num(name, value)?,
                _ => {}
            }
        }
        s.validate()?;
        Ok(s)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let s: Self = serde_json::from_str(json)?;
        s.validate()?;
        Ok(s)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 { return Err(ChartError::Settings("dpi must be positive".into())); }
        let (w, h) = self.figure_size;
        if !(w > 0.0 && h > 0.0) {
            return Err(ChartError::Settings(format!("figure size must be positive, got {w}x{h}")));
        }
        if self.max_points == 0 {
            return Err(ChartError::Settings("max_points must be positive".into()));
        }
        Ok(())
    }

    /// Figure size in pixels at the configured dpi.
    pub fn figure_pixels(&self) -> (u32, u32) {
        let (w, h) = self.figure_size;
        ((w * self.dpi as f32).round() as u32, (h * self.dpi as f32).round() as u32)
    }
}

fn parse_num<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| ChartError::Settings(format!("{ENV_PREFIX}{name}: cannot parse '{value}'")))
}

/// Parse "W,H" in inches.
fn parse_figsize(value: &str) -> Result<(f32, f32)> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [w, h] => match (w.parse::<f32>(), h.parse::<f32>()) {
            (Ok(w), Ok(h)) => Ok((w, h)),
            _ => Err(ChartError::Settings(format!("figure size '{value}' is not two numbers"))),
        },
        _ => Err(ChartError::Settings(format!("figure size '{value}' must look like 'W,H'"))),
    }
}
