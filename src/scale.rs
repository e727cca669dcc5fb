use crate::data::{as_number, cell, Row};
use serde_json::Value;

/// Headroom factor applied to radar indicator maxima
pub const RADAR_HEADROOM: f64 = 1.2;

/// Largest numeric value of `column` across `rows`.
/// Missing or non-numeric cells count as 0, so the result is never below 0
/// unless every cell is a negative number.
pub fn column_max(rows: &[Row], column: &str) -> f64 {
    rows.iter()
        .map(|r| as_number(&cell(r, column)).unwrap_or(0.0))
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
        .unwrap_or(0.0)
}

/// Radar indicator maximum: observed maximum plus headroom
pub fn radar_max(rows: &[Row], column: &str) -> f64 {
    column_max(rows, column) * RADAR_HEADROOM
}

/// Distinct values of `column` in order of first appearance
pub fn distinct_values(rows: &[Row], column: &str) -> Vec<Value> {
    let mut seen: Vec<Value> = Vec::new();
    for row in rows {
        let v = cell(row, column);
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

/// Column values in row order
pub fn column_values(rows: &[Row], column: &str) -> Vec<Value> {
    rows.iter().map(|r| cell(r, column)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(v: Value) -> Vec<Row> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_column_max() {
        let data = rows(json!([{"a": 3}, {"a": 100}, {"a": "7"}, {"b": 1}]));
        assert_eq!(column_max(&data, "a"), 100.0);
        assert_eq!(column_max(&[], "a"), 0.0);
    }

    #[test]
    fn test_column_max_all_negative() {
        let data = rows(json!([{"a": -3}, {"a": -1}]));
        assert_eq!(column_max(&data, "a"), -1.0);
    }

    #[test]
    fn test_radar_max_headroom() {
        let data = rows(json!([{"a": 40}, {"a": 100}]));
        assert_eq!(radar_max(&data, "a"), 120.0);
    }

    #[test]
    fn test_distinct_values_first_seen_order() {
        let data = rows(json!([{"c": "b"}, {"c": "a"}, {"c": "b"}, {}]));
        assert_eq!(distinct_values(&data, "c"), vec![json!("b"), json!("a"), Value::Null]);
    }
}
