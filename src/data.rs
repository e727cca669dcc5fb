use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;
use std::sync::OnceLock;

/// One record: column name -> scalar value
pub type Row = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Date,
    Number,
    String,
    Boolean,
}

/// Column metadata as produced by the upstream analysis stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnType) -> Self {
        Self {
            name: name.into(),
            kind,
            sample: None,
            unit: None,
        }
    }
}

/// Value of `column` in `row`, or null when the row has no such field
pub fn cell(row: &Row, column: &str) -> Value {
    row.get(column).cloned().unwrap_or(Value::Null)
}

/// Numeric view of a cell: JSON numbers, and strings that parse as numbers
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
}

#[derive(Deserialize)]
struct Bundle {
    columns: Vec<Column>,
    data: Vec<Value>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Create a Dataset from a JSON Array of Objects, inferring column metadata
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| anyhow!("Input data must be a JSON array of objects"))?;

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| anyhow!("Items in array must be objects"))?;
            rows.push(obj.clone());
        }

        // Headers follow the key order of the first object
        let headers: Vec<String> = rows
            .first()
            .map(|r| r.keys().cloned().collect())
            .unwrap_or_default();

        let columns = headers
            .iter()
            .map(|h| infer_column(h, rows.iter().map(|r| cell(r, h))))
            .collect();

        Ok(Self { columns, rows })
    }

    /// Create a Dataset from `{ "columns": [...], "data": [...] }`
    pub fn from_json_bundle(value: &Value) -> Result<Self> {
        let bundle: Bundle = serde_json::from_value(value.clone())
            .context("Expected an object with 'columns' and 'data' fields")?;
        let rows = Dataset::from_json(&Value::Array(bundle.data))?.rows;
        Ok(Self {
            columns: bundle.columns,
            rows,
        })
    }

    /// Read CSV with a header row. Numeric and boolean cells become JSON
    /// numbers and booleans, empty cells become null.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .context("Failed to read CSV headers")?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if h.is_empty() {
                    format!("column{}", i + 1)
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut raw: Vec<Vec<String>> = Vec::new();
        for (line, record) in rdr.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
            raw.push(record.iter().map(str::to_string).collect());
        }

        let columns: Vec<Column> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let values = raw
                    .iter()
                    .map(|r| r.get(i).map(|s| csv_cell(s)).unwrap_or(Value::Null));
                infer_column(h, values)
            })
            .collect();

        let rows = raw
            .into_iter()
            .map(|record| {
                let mut row = Row::new();
                for (i, h) in headers.iter().enumerate() {
                    let value = record.get(i).map(|s| csv_cell(s)).unwrap_or(Value::Null);
                    row.insert(h.clone(), value);
                }
                row
            })
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}

fn csv_cell(s: &str) -> Value {
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    match s {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::String(s.to_string()),
    }
}

// =============================================================================
// Column inference
// =============================================================================

fn infer_column(name: &str, values: impl Iterator<Item = Value>) -> Column {
    let present: Vec<Value> = values.filter(|v| !v.is_null()).collect();
    let sample: Vec<String> = present.iter().take(3).map(display_value).collect();
    Column {
        name: name.to_string(),
        kind: infer_column_type(&present),
        sample: Some(sample),
        unit: extract_unit(name),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Infer a column's type from its non-null values.
/// Order of checks: number, date, boolean, then string.
pub fn infer_column_type(values: &[Value]) -> ColumnType {
    if values.is_empty() {
        return ColumnType::String;
    }
    if values.iter().all(|v| as_number(v).is_some()) {
        return ColumnType::Number;
    }
    if values
        .iter()
        .all(|v| v.as_str().map(looks_like_date).unwrap_or(false))
    {
        return ColumnType::Date;
    }
    if values.iter().all(looks_like_boolean) {
        return ColumnType::Boolean;
    }
    ColumnType::String
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M"];

fn looks_like_date(s: &str) -> bool {
    let s = s.trim();
    if DATE_FORMATS
        .iter()
        .any(|f| NaiveDate::parse_from_str(s, f).is_ok())
    {
        return true;
    }
    if DATETIME_FORMATS
        .iter()
        .any(|f| NaiveDateTime::parse_from_str(s, f).is_ok())
    {
        return true;
    }
    // Year-month, e.g. "2024-03"
    if NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d").is_ok() {
        return true;
    }
    DateTime::parse_from_rfc3339(s).is_ok()
}

fn looks_like_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => n.as_f64() == Some(0.0) || n.as_f64() == Some(1.0),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "false" | "yes" | "no" | "0" | "1" | "是" | "否"
        ),
        _ => false,
    }
}

const KNOWN_UNITS: &[&str] = &[
    "万元", "亿元", "元", "%", "个", "人", "次", "天", "月", "年", "kg", "cm", "g", "m",
];

fn parenthesized() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[(（]([^)）]+)[)）]").ok()).as_ref()
}

/// Unit hint from a column name: "Revenue (USD)" -> "USD", "销售额万元" -> "万元"
pub fn extract_unit(column_name: &str) -> Option<String> {
    if let Some(caps) = parenthesized().and_then(|re| re.captures(column_name)) {
        return Some(caps[1].trim().to_string());
    }
    // ASCII units must stand alone ("kg", not the "g" in "region")
    let words: Vec<&str> = column_name
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '%')
        .collect();
    KNOWN_UNITS
        .iter()
        .find(|u| {
            if u.is_ascii() && **u != "%" {
                words.contains(*u)
            } else {
                column_name.contains(*u)
            }
        })
        .map(|u| u.to_string())
}
