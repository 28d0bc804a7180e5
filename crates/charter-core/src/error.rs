// File: crates/charter-core/src/error.rs
// Summary: Error taxonomy for reduction, panel validation, composition and rasterization.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("unknown chart kind '{0}' (available: bar, line, timeseries)")]
    UnknownChartKind(String),

    #[error("unknown style '{style}' for {kind} chart (available: {available})")]
    UnknownStyle { kind: String, style: String, available: String },

    #[error("unknown theme '{name}' (available: {available})")]
    UnknownTheme { name: String, available: String },

    #[error("unknown dashboard layout '{name}' (available: {available})")]
    UnknownLayout { name: String, available: String },

    #[error("series length mismatch: x has {x} points, y has {y}")]
    LengthMismatch { x: usize, y: usize },

    #[error("invalid chart data: {0}")]
    InvalidData(String),

    #[error("panel {index}: {kind} style cannot render {data} data")]
    KindMismatch { index: usize, kind: String, data: String },

    #[error("invalid style '{style}': {reason}")]
    InvalidStyle { style: String, reason: String },

    #[error("invalid reduction config: {0}")]
    InvalidReduction(String),

    #[error("panel {index} spans rows {row}..{row_end}, cols {col}..{col_end} outside the {rows}x{cols} grid")]
    PanelOutOfGrid {
        index: usize,
        row: usize,
        row_end: usize,
        col: usize,
        col_end: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChartError>;
