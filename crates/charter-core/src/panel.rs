// File: crates/charter-core/src/panel.rs
// Summary: Panel descriptions: typed chart data, shape validation and the JSON panel config.
// Notes:
// - Everything here is checked before a dashboard draws anything; renderers assume
//   validated data but still treat empty series as a no-op.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{ChartError, Result};
use crate::series::{Series, XValue};
use crate::style::ChartKind;

/// One y sequence, optionally named. Named sequences produce legend entries.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedValues {
    pub name: Option<String>,
    pub values: Vec<f64>,
}

impl NamedValues {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self { name: Some(name.into()), values }
    }
    pub fn unnamed(values: Vec<f64>) -> Self {
        Self { name: None, values }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarData {
    pub labels: Vec<String>,
    pub series: Vec<NamedValues>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LineX {
    Numeric(Vec<f64>),
    /// Categorical x: point `i` is drawn at position `i`.
    Labels(Vec<String>),
}

impl LineX {
    pub fn len(&self) -> usize {
        match self {
            LineX::Numeric(v) => v.len(),
            LineX::Labels(v) => v.len(),
        }
    }
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn positions(&self) -> Vec<f64> {
        match self {
            LineX::Numeric(v) => v.clone(),
            LineX::Labels(v) => (0..v.len()).map(|i| i as f64).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineData {
    pub x: LineX,
    pub series: Vec<NamedValues>,
}

impl LineData {
    pub fn to_series(&self) -> Result<Vec<Series>> {
        let x: Vec<XValue> = self.x.positions().into_iter().map(XValue::Num).collect();
        build_series(&x, &self.series)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bands {
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesData {
    pub dates: Vec<DateTime<Utc>>,
    pub series: Vec<NamedValues>,
    /// Range band around a single series.
    pub bands: Option<Bands>,
}

impl TimeSeriesData {
    pub fn to_series(&self) -> Result<Vec<Series>> {
        let x: Vec<XValue> = self.dates.iter().copied().map(XValue::Time).collect();
        build_series(&x, &self.series)
    }
}

fn build_series(x: &[XValue], ys: &[NamedValues]) -> Result<Vec<Series>> {
    ys.iter()
        .map(|nv| {
            let s = Series::new(x.to_vec(), nv.values.clone())?;
            Ok(match &nv.name {
                Some(n) => s.with_label(n.clone()),
                None => s,
            })
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub enum PanelData {
    Bar(BarData),
    Line(LineData),
    TimeSeries(TimeSeriesData),
}

impl PanelData {
    pub fn kind(&self) -> ChartKind {
        match self {
            PanelData::Bar(_) => ChartKind::Bar,
            PanelData::Line(_) => ChartKind::Line,
            PanelData::TimeSeries(_) => ChartKind::TimeSeries,
        }
    }

    /// Shape checks: non-empty x/labels and every sequence aligned with them.
    pub fn validate(&self) -> Result<()> {
        match self {
            PanelData::Bar(d) => {
                if d.labels.is_empty() { return Err(invalid("bar chart 'labels' cannot be empty")); }
                check_series(&d.series, d.labels.len(), "labels")
            }
            PanelData::Line(d) => {
                if d.x.is_empty() { return Err(invalid("line chart x values cannot be empty")); }
                check_series(&d.series, d.x.len(), "x")
            }
            PanelData::TimeSeries(d) => {
                if d.dates.is_empty() { return Err(invalid("time series 'dates' cannot be empty")); }
                check_series(&d.series, d.dates.len(), "dates")?;
                if let Some(b) = &d.bands {
                    check_len("upper", b.upper.len(), "dates", d.dates.len())?;
                    check_len("lower", b.lower.len(), "dates", d.dates.len())?;
                }
                Ok(())
            }
        }
    }
}

fn invalid(msg: impl Into<String>) -> ChartError {
    ChartError::InvalidData(msg.into())
}

fn check_len(what: &str, len: usize, against: &str, expected: usize) -> Result<()> {
    if len != expected {
        return Err(invalid(format!("'{what}' length ({len}) must match '{against}' length ({expected})")));
    }
    Ok(())
}

fn check_series(series: &[NamedValues], expected: usize, against: &str) -> Result<()> {
    if series.is_empty() { return Err(invalid("chart data has no series")); }
    for s in series {
        let name = s.name.as_deref().unwrap_or("values");
        check_len(name, s.values.len(), against, expected)?;
    }
    Ok(())
}

/// One dashboard panel. Built once per render by the caller, never mutated by it.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelSpec {
    pub kind: ChartKind,
    pub data: PanelData,
    pub style: String,
    pub grid_row: usize,
    pub grid_col: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
}

impl PanelSpec {
    pub fn new(data: PanelData) -> Self {
        Self {
            kind: data.kind(),
            data,
            style: "default".to_string(),
            grid_row: 0,
            grid_col: 0,
            row_span: 1,
            col_span: 1,
            title: None,
            x_label: None,
            y_label: None,
        }
    }

    pub fn kind(mut self, kind: ChartKind) -> Self { self.kind = kind; self }
    pub fn style(mut self, name: impl Into<String>) -> Self { self.style = name.into(); self }
    pub fn at(mut self, row: usize, col: usize) -> Self { self.grid_row = row; self.grid_col = col; self }
    pub fn span(mut self, rows: usize, cols: usize) -> Self { self.row_span = rows; self.col_span = cols; self }
    pub fn title(mut self, t: impl Into<String>) -> Self { self.title = Some(t.into()); self }
    pub fn x_label(mut self, t: impl Into<String>) -> Self { self.x_label = Some(t.into()); self }
    pub fn y_label(mut self, t: impl Into<String>) -> Self { self.y_label = Some(t.into()); self }

    pub fn row_end(&self) -> usize { self.grid_row + self.row_span.max(1) }
    pub fn col_end(&self) -> usize { self.grid_col + self.col_span.max(1) }

    /// Data shape plus agreement between the declared kind and the data.
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.kind != self.data.kind() {
            return Err(ChartError::KindMismatch {
                index,
                kind: self.kind.to_string(),
                data: self.data.kind().to_string(),
            });
        }
        if self.row_span == 0 || self.col_span == 0 {
            return Err(invalid(format!("panel {index}: spans must be at least 1")));
        }
        self.data.validate().map_err(|e| match e {
            ChartError::InvalidData(msg) => invalid(format!("panel {index}: {msg}")),
            other => other,
        })
    }
}

/// Panel as written in a JSON dashboard description.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PanelConfig {
    pub chart_type: String,
    pub data: Value,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub xlabel: Option<String>,
    #[serde(default)]
    pub ylabel: Option<String>,
    #[serde(default)]
    pub row: usize,
    #[serde(default)]
    pub col: usize,
    #[serde(default = "one")]
    pub rowspan: usize,
    #[serde(default = "one")]
    pub colspan: usize,
}

fn default_style() -> String { "default".to_string() }
fn one() -> usize { 1 }

impl TryFrom<PanelConfig> for PanelSpec {
    type Error = ChartError;

    fn try_from(c: PanelConfig) -> Result<Self> {
        let kind: ChartKind = c.chart_type.parse()?;
        let obj = c.data.as_object().ok_or_else(|| invalid(format!("{kind} chart data must be an object")))?;
        let data = parse_data(kind, obj)?;
        Ok(Self {
            kind,
            data,
            style: c.style,
            grid_row: c.row,
            grid_col: c.col,
            row_span: c.rowspan,
            col_span: c.colspan,
            title: c.title,
            x_label: c.xlabel,
            y_label: c.ylabel,
        })
    }
}

/// Parse the JSON data object of a panel according to its chart kind.
pub fn parse_data(kind: ChartKind, obj: &Map<String, Value>) -> Result<PanelData> {
    let data = match kind {
        ChartKind::Bar => {
            let labels = strings(obj, "labels")?.ok_or_else(|| invalid("bar chart requires 'labels' field"))?;
            let series = values_or_series(obj, "values")?
                .ok_or_else(|| invalid("bar chart requires either 'values' or 'series' field"))?;
            PanelData::Bar(BarData { labels, series })
        }
        ChartKind::Line => {
            let x = match (strings(obj, "labels")?, numbers(obj, "x")?) {
                (Some(labels), _) => LineX::Labels(labels),
                (None, Some(x)) => LineX::Numeric(x),
                (None, None) => return Err(invalid("line chart requires 'x' or 'labels' field")),
            };
            let series = values_or_series(obj, "y")?.ok_or_else(|| invalid("line chart requires 'y' or 'series' field"))?;
            PanelData::Line(LineData { x, series })
        }
        ChartKind::TimeSeries => {
            let raw = array(obj, "dates")?.ok_or_else(|| invalid("time series requires 'dates' field"))?;
            let dates = raw.iter().map(parse_date).collect::<Result<Vec<_>>>()?;
            let series = values_or_series(obj, "values")?
                .ok_or_else(|| invalid("time series requires 'values' or 'series' field"))?;
            let bands = match (numbers(obj, "upper")?, numbers(obj, "lower")?) {
                (Some(upper), Some(lower)) => Some(Bands { upper, lower }),
                (None, None) => None,
                _ => return Err(invalid("time series bands need both 'upper' and 'lower'")),
            };
            PanelData::TimeSeries(TimeSeriesData { dates, series, bands })
        }
    };
    data.validate()?;
    Ok(data)
}

fn array<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<Option<&'a Vec<Value>>> {
    match obj.get(key) {
        None => Ok(None),
        Some(Value::Array(a)) => Ok(Some(a)),
        Some(_) => Err(invalid(format!("'{key}' must be a list"))),
    }
}

fn to_numbers(key: &str, arr: &[Value]) -> Result<Vec<f64>> {
    arr.iter()
        .enumerate()
        .map(|(i, v)| match v {
            Value::Number(n) => n.as_f64().ok_or_else(|| invalid(format!("'{key}[{i}]' is out of range"))),
            // Missing samples become gaps.
            Value::Null => Ok(f64::NAN),
            other => Err(invalid(format!("'{key}[{i}]' must be numeric, got {other}"))),
        })
        .collect()
}

fn numbers(obj: &Map<String, Value>, key: &str) -> Result<Option<Vec<f64>>> {
    array(obj, key)?.map(|a| to_numbers(key, a)).transpose()
}

fn strings(obj: &Map<String, Value>, key: &str) -> Result<Option<Vec<String>>> {
    let Some(arr) = array(obj, key)? else { return Ok(None) };
    arr.iter()
        .enumerate()
        .map(|(i, v)| match v {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(invalid(format!("'{key}[{i}]' must be a string, got {other}"))),
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}

/// `values_key: [..]` as one unnamed series, or `series: {name: [..]}` in document order.
fn values_or_series(obj: &Map<String, Value>, values_key: &str) -> Result<Option<Vec<NamedValues>>> {
    if let Some(v) = numbers(obj, values_key)? {
        return Ok(Some(vec![NamedValues::unnamed(v)]));
    }
    match obj.get("series") {
        None => Ok(None),
        Some(Value::Object(m)) => m
            .iter()
            .map(|(name, v)| match v {
                Value::Array(a) => Ok(NamedValues::new(name.clone(), to_numbers(name, a)?)),
                _ => Err(invalid(format!("series '{name}' must be a list"))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(_) => Err(invalid("'series' must be an object")),
    }
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Dates as strings in common formats (treated as UTC) or numbers of epoch seconds.
pub fn parse_date(v: &Value) -> Result<DateTime<Utc>> {
    match v {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => n
            .as_f64()
            .and_then(XValue::from_epoch_seconds)
            .and_then(|x| match x {
                XValue::Time(t) => Some(t),
                XValue::Num(_) => None,
            })
            .ok_or_else(|| invalid(format!("timestamp {n} is out of range"))),
        other => Err(invalid(format!("cannot parse date from {other}"))),
    }
}

pub fn parse_date_str(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    for f in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, f) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc());
            }
        }
    }
    for f in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, f) {
            return Ok(dt.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| invalid(format!("cannot parse date '{s}'")))
}
