use chartforge::data::{Column, ColumnType, Row};
use chartforge::ir::{ChartFamily, Customization, LegendPosition};
use chartforge::{build_descriptor, build_descriptor_for_tag};
use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

/// Run the chartforge binary with `args`, feeding `stdin_content` on stdin
fn run_chartforge(args: &[&str], stdin_content: &str) -> Result<Value, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_chartforge"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(stdin_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        serde_json::from_slice(&output.stdout).map_err(|e| format!("Output is not JSON: {}", e))
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

fn rows(v: Value) -> Vec<Row> {
    serde_json::from_value(v).unwrap()
}

fn sales_columns() -> Vec<Column> {
    vec![
        Column::new("region", ColumnType::String),
        Column::new("q1", ColumnType::Number),
        Column::new("q2", ColumnType::Number),
    ]
}

fn sales_rows() -> Vec<Row> {
    rows(json!([
        {"region": "north", "q1": 100, "q2": 40},
        {"region": "south", "q1": 80, "q2": 55},
        {"region": "north", "q1": 60, "q2": 70}
    ]))
}

// =============================================================================
// CLI
// =============================================================================

#[test]
fn test_end_to_end_column_chart_from_csv() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let result = run_chartforge(&["render", "column"], &csv);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let chart = result.unwrap();
    assert_eq!(chart["xAxis"]["data"], json!(["north", "south", "east", "west"]));
    assert_eq!(chart["series"][0]["type"], "bar");
    assert_eq!(chart["series"][0]["name"], "q1");
    assert_eq!(chart["series"][0]["data"], json!([100, 80, 60, 20]));
}

#[test]
fn test_end_to_end_chinese_family_name() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let chart = run_chartforge(&["render", "饼图"], &csv).unwrap();
    assert_eq!(chart["series"][0]["type"], "pie");
    assert_eq!(chart["tooltip"]["trigger"], "item");
}

#[test]
fn test_end_to_end_line_chart_uses_date_axis() {
    let csv = fs::read_to_string("test/timeseries.csv").expect("Failed to read test CSV");
    let chart = run_chartforge(&["render", "line"], &csv).unwrap();
    assert_eq!(chart["xAxis"]["data"][0], "2024-01-01");
    assert_eq!(chart["xAxis"]["boundaryGap"], false);
    assert_eq!(chart["series"][0]["name"], "temperature");
    assert_eq!(chart["series"][0]["smooth"], true);
}

#[test]
fn test_end_to_end_json_bundle_input() {
    let input = json!({
        "columns": [
            {"name": "stage", "type": "string"},
            {"name": "users", "type": "number"}
        ],
        "data": [
            {"stage": "visit", "users": 50},
            {"stage": "signup", "users": 200},
            {"stage": "buy", "users": 10}
        ]
    });
    let chart = run_chartforge(
        &["render", "funnel", "--input-format", "json"],
        &input.to_string(),
    )
    .unwrap();
    let names: Vec<&str> = chart["series"][0]["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["signup", "visit", "buy"]);
}

#[test]
fn test_end_to_end_columns_file_overrides_inference() {
    let csv = "region,q1,q2\nnorth,1,2\n";
    let chart = run_chartforge(
        &["render", "radar", "--columns", "test/columns.json"],
        csv,
    )
    .unwrap();
    let indicator = chart["radar"]["indicator"].as_array().unwrap();
    assert_eq!(indicator.len(), 2);
    assert_eq!(indicator[0]["name"], "q1");
}

#[test]
fn test_end_to_end_config_style_and_flags_layer() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let chart = run_chartforge(
        &[
            "render",
            "bar",
            "--config",
            "test/config.json",
            "--style",
            r#"labs(title: "From style") | theme(grid: false)"#,
            "--title",
            "From flag",
        ],
        &csv,
    )
    .unwrap();
    assert_eq!(chart["title"]["text"], "From flag");
    assert_eq!(chart["color"][0], "#d62728");
    assert_eq!(chart["grid"]["show"], false);
    assert_eq!(chart["legend"]["top"], "bottom");
}

#[test]
fn test_end_to_end_unknown_family_draws_column_chart() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let unknown = run_chartforge(&["render", "waterfall"], &csv).unwrap();
    let column = run_chartforge(&["render", "column"], &csv).unwrap();
    assert_eq!(unknown, column);
}

#[test]
fn test_end_to_end_empty_input_fails() {
    let result = run_chartforge(&["render", "pie"], "region,q1\n");
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("insufficient data"));
}

#[test]
fn test_end_to_end_invalid_style_fails() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let result = run_chartforge(&["render", "bar", "--style", "labs(title: 42"], &csv);
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_out_of_range_themes_use_default_palette() {
    let csv = fs::read_to_string("test/sales.csv").expect("Failed to read test CSV");
    let from_config = run_chartforge(
        &["render", "bar", "--config", "test/config_fractional_theme.json"],
        &csv,
    )
    .unwrap();
    assert_eq!(from_config["title"]["text"], "Regional Sales");
    assert_eq!(from_config["color"][0], "#1f77b4");

    let from_style = run_chartforge(
        &["render", "bar", "--style", "theme(palette: 99999999999999999999)"],
        &csv,
    )
    .unwrap();
    assert_eq!(from_style["color"][0], "#1f77b4");
}

#[test]
fn test_end_to_end_validate_recommendations() {
    let recs = run_chartforge(
        &["recommend", "--validate", "test/recommendations.json"],
        "",
    )
    .unwrap();
    let families: Vec<&str> = recs
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["family"].as_str().unwrap())
        .collect();
    assert_eq!(families, vec!["stacked-bar", "column", "line"]);
}

#[test]
fn test_end_to_end_recommend() {
    let csv = fs::read_to_string("test/timeseries.csv").expect("Failed to read test CSV");
    let recs = run_chartforge(&["recommend"], &csv).unwrap();
    let recs = recs.as_array().unwrap();
    assert_eq!(recs.len(), 3);
    assert_eq!(recs[0]["family"], "line");
    assert_eq!(recs[1]["family"], "scatter");
}

// =============================================================================
// Library properties
// =============================================================================

#[test]
fn test_every_family_handles_degenerate_input() {
    let custom = Customization::default();
    let inputs: Vec<(Vec<Row>, Vec<Column>)> = vec![
        (Vec::new(), Vec::new()),
        (Vec::new(), sales_columns()),
        (sales_rows(), Vec::new()),
        (sales_rows(), vec![Column::new("region", ColumnType::String)]),
        (rows(json!([{"other": 1}])), sales_columns()),
    ];
    for family in ChartFamily::ALL {
        for (data, cols) in &inputs {
            let d = build_descriptor(family, data, cols, &custom);
            let json = serde_json::to_value(&d).unwrap();
            assert!(json["series"].is_array(), "{} produced no series list", family);
        }
    }
}

#[test]
fn test_bar_is_horizontal_and_column_is_vertical() {
    let custom = Customization::default();
    let bar = serde_json::to_value(build_descriptor(
        ChartFamily::Bar,
        &sales_rows(),
        &sales_columns(),
        &custom,
    ))
    .unwrap();
    assert_eq!(bar["yAxis"]["type"], "category");
    assert_eq!(bar["xAxis"]["type"], "value");

    let column = serde_json::to_value(build_descriptor_for_tag(
        "柱状图",
        &sales_rows(),
        &sales_columns(),
        &custom,
    ))
    .unwrap();
    assert_eq!(column["xAxis"]["type"], "category");
    assert_eq!(column["yAxis"]["type"], "value");
}

#[test]
fn test_radar_indicator_headroom() {
    let d = build_descriptor(
        ChartFamily::Radar,
        &sales_rows(),
        &sales_columns(),
        &Customization::default(),
    );
    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["radar"]["indicator"][0]["max"], json!(120.0));
    assert_eq!(json["series"][0]["data"].as_array().unwrap().len(), 3);
}

#[test]
fn test_stacked_bar_takes_first_matching_row() {
    let d = build_descriptor(
        ChartFamily::StackedBar,
        &sales_rows(),
        &sales_columns(),
        &Customization::default(),
    );
    let json = serde_json::to_value(&d).unwrap();
    assert_eq!(json["xAxis"]["data"], json!(["north", "south"]));
    assert_eq!(json["series"][0]["data"], json!([100, 80]));
    assert_eq!(json["series"][1]["data"], json!([40, 55]));
    assert_eq!(json["series"][0]["stack"], "total");
}

#[test]
fn test_legend_none_and_palette_default() {
    let custom = Customization {
        legend_position: Some(LegendPosition::None),
        color_theme: Some(9),
        ..Default::default()
    };
    let d = build_descriptor(ChartFamily::Line, &sales_rows(), &sales_columns(), &custom);
    assert!(!d.legend.show);
    assert_eq!(d.color[0], "#1f77b4");
    assert_eq!(d.color.len(), 10);
}

#[test]
fn test_repeated_calls_give_identical_descriptors() {
    let custom = Customization {
        title: Some("Sales".to_string()),
        color_theme: Some(3),
        show_grid: Some(false),
        legend_position: Some(LegendPosition::Right),
    };
    for family in ChartFamily::ALL {
        let first = build_descriptor(family, &sales_rows(), &sales_columns(), &custom);
        let second = build_descriptor(family, &sales_rows(), &sales_columns(), &custom);
        assert_eq!(first, second, "{} is not deterministic", family);
    }
}

#[test]
fn test_descriptor_json_round_trip() {
    for family in ChartFamily::ALL {
        let d = build_descriptor(family, &sales_rows(), &sales_columns(), &Customization::default());
        let value = serde_json::to_value(&d).unwrap();
        let text = serde_json::to_string(&d).unwrap();
        let reparsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, reparsed, "{} did not round-trip", family);
    }
}
