use crate::data::{as_number, cell, Column, Row};
use crate::ir::{
    AreaStyle, Axis, AxisTick, BarSeries, ChartFamily, Emphasis, FunnelSeries, HeatmapLabel,
    HeatmapSeries, Indicator, LineSeries, NamedValue, PieSeries, RadarCoord, RadarEntry,
    RadarSeries, ScatterSeries, Series, Shape, VisualMap,
};
use crate::resolve;
use crate::scale::{column_max, column_values, distinct_values, radar_max};
use crate::theme_resolve::item_tooltip;
use serde_json::Value;
use std::cmp::Ordering;

/// Reshapes rows into one family's axes and series
pub type ShapeBuilder = fn(&[Row], &[Column]) -> Shape;

impl ChartFamily {
    /// Builder for this family
    pub fn builder(self) -> ShapeBuilder {
        match self {
            ChartFamily::Bar => build_horizontal_bar,
            ChartFamily::Column => build_column,
            ChartFamily::Line => build_line,
            ChartFamily::Pie => build_pie,
            ChartFamily::Scatter => build_scatter,
            ChartFamily::Area => build_area,
            ChartFamily::Radar => build_radar,
            ChartFamily::Heatmap => build_heatmap,
            ChartFamily::Funnel => build_funnel,
            ChartFamily::StackedBar => build_stacked_bar,
            ChartFamily::StackedArea => build_stacked_area,
        }
    }
}

const STACK_ID: &str = "total";

// =============================================================================
// Bar / Column
// =============================================================================

fn build_horizontal_bar(rows: &[Row], columns: &[Column]) -> Shape {
    build_bar(rows, columns, true)
}

fn build_column(rows: &[Row], columns: &[Column]) -> Shape {
    build_bar(rows, columns, false)
}

/// Single bar series; `horizontal` puts categories on the y axis
pub fn build_bar(rows: &[Row], columns: &[Column], horizontal: bool) -> Shape {
    let family = if horizontal { ChartFamily::Bar } else { ChartFamily::Column };
    let roles = resolve::roles_for(family, columns);
    let categories = roles
        .category
        .map(|c| column_values(rows, &c.name))
        .unwrap_or_default();

    let mut category_axis = Axis::category(categories);
    let value_axis = Axis::value();
    let (x_axis, y_axis) = if horizontal {
        (value_axis, category_axis)
    } else {
        category_axis.axis_tick = Some(AxisTick {
            align_with_label: true,
        });
        (category_axis, value_axis)
    };

    let series = roles
        .value
        .map(|col| {
            Series::Bar(BarSeries {
                name: col.name.clone(),
                data: column_values(rows, &col.name),
                stack: None,
                emphasis: Some(Emphasis::focus_series()),
            })
        })
        .into_iter()
        .collect();

    Shape {
        x_axis: Some(x_axis),
        y_axis: Some(y_axis),
        series,
        ..Default::default()
    }
}

// =============================================================================
// Line / Area
// =============================================================================

fn build_line(rows: &[Row], columns: &[Column]) -> Shape {
    sequential(rows, columns, ChartFamily::Line, None)
}

fn build_area(rows: &[Row], columns: &[Column]) -> Shape {
    sequential(rows, columns, ChartFamily::Area, Some(AreaStyle { opacity: Some(0.6) }))
}

fn sequential(rows: &[Row], columns: &[Column], family: ChartFamily, fill: Option<AreaStyle>) -> Shape {
    let roles = resolve::roles_for(family, columns);
    let x_data = roles
        .time_axis
        .map(|c| column_values(rows, &c.name))
        .unwrap_or_default();

    let series = roles
        .value
        .map(|col| {
            Series::Line(LineSeries {
                name: col.name.clone(),
                data: column_values(rows, &col.name),
                smooth: Some(true),
                stack: None,
                area_style: fill,
                emphasis: Some(Emphasis::focus_series()),
            })
        })
        .into_iter()
        .collect();

    Shape {
        x_axis: Some(gapless_axis(x_data)),
        y_axis: Some(Axis::value()),
        series,
        ..Default::default()
    }
}

fn gapless_axis(data: Vec<Value>) -> Axis {
    Axis {
        boundary_gap: Some(false),
        ..Axis::category(data)
    }
}

// =============================================================================
// Pie / Funnel
// =============================================================================

fn named_values(rows: &[Row], name_col: &Column, value_col: &Column) -> Vec<NamedValue> {
    rows.iter()
        .map(|r| NamedValue {
            name: cell(r, &name_col.name),
            value: cell(r, &value_col.name),
        })
        .collect()
}

fn build_pie(rows: &[Row], columns: &[Column]) -> Shape {
    let roles = resolve::roles_for(ChartFamily::Pie, columns);
    let series = match (roles.category, roles.value) {
        (Some(name_col), Some(value_col)) => vec![Series::Pie(PieSeries {
            name: name_col.name.clone(),
            radius: "50%".to_string(),
            data: named_values(rows, name_col, value_col),
            emphasis: Emphasis::shadow(Some(0.0)),
        })],
        _ => Vec::new(),
    };

    Shape {
        tooltip: Some(item_tooltip()),
        series,
        ..Default::default()
    }
}

/// Descending by numeric value; stable, non-numeric values sink to the end
fn sort_descending(data: &mut [NamedValue]) {
    data.sort_by(|a, b| match (as_number(&a.value), as_number(&b.value)) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn build_funnel(rows: &[Row], columns: &[Column]) -> Shape {
    let roles = resolve::roles_for(ChartFamily::Funnel, columns);
    let series = match (roles.category, roles.value) {
        (Some(name_col), Some(value_col)) => {
            let mut data = named_values(rows, name_col, value_col);
            sort_descending(&mut data);
            vec![Series::Funnel(FunnelSeries {
                name: name_col.name.clone(),
                left: "10%".to_string(),
                top: 60,
                bottom: 60,
                width: "80%".to_string(),
                data,
            })]
        }
        _ => Vec::new(),
    };

    Shape {
        tooltip: Some(item_tooltip()),
        series,
        ..Default::default()
    }
}

// =============================================================================
// Scatter
// =============================================================================

fn named_value_axis(name: Option<&Column>, gap: u32) -> Axis {
    Axis {
        name: name.map(|c| c.name.clone()),
        name_location: Some("middle".to_string()),
        name_gap: Some(gap),
        ..Axis::value()
    }
}

fn build_scatter(rows: &[Row], columns: &[Column]) -> Shape {
    let roles = resolve::roles_for(ChartFamily::Scatter, columns);
    let series = match (roles.value, roles.secondary) {
        (Some(x), Some(y)) => vec![Series::Scatter(ScatterSeries {
            name: format!("{} vs {}", x.name, y.name),
            data: rows
                .iter()
                .map(|r| (cell(r, &x.name), cell(r, &y.name)))
                .collect(),
            symbol_size: 8,
            emphasis: Emphasis::focus_series(),
        })],
        _ => Vec::new(),
    };

    Shape {
        x_axis: Some(named_value_axis(roles.value, 30)),
        y_axis: Some(named_value_axis(roles.secondary, 50)),
        series,
        ..Default::default()
    }
}

// =============================================================================
// Radar
// =============================================================================

fn build_radar(rows: &[Row], columns: &[Column]) -> Shape {
    let roles = resolve::roles_for(ChartFamily::Radar, columns);
    let indicator: Vec<Indicator> = roles
        .series
        .iter()
        .map(|c| Indicator {
            name: c.name.clone(),
            max: radar_max(rows, &c.name),
        })
        .collect();

    let series = if indicator.is_empty() {
        Vec::new()
    } else {
        let data = rows
            .iter()
            .enumerate()
            .map(|(i, r)| RadarEntry {
                value: indicator.iter().map(|ind| cell(r, &ind.name)).collect(),
                name: format!("row {}", i + 1),
            })
            .collect();
        vec![Series::Radar(RadarSeries {
            name: "radar".to_string(),
            data,
        })]
    };

    Shape {
        radar: Some(RadarCoord { indicator }),
        series,
        ..Default::default()
    }
}

// =============================================================================
// Heatmap
// =============================================================================

/// Empty cells (null, false, "" or zero) count as 0
fn heat_value(value: Value) -> Value {
    let empty = match &value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    };
    if empty {
        Value::from(0)
    } else {
        value
    }
}

/// Row-index by row-index grid; each cell carries the x row's value
fn build_heatmap(rows: &[Row], columns: &[Column]) -> Shape {
    let roles = resolve::roles_for(ChartFamily::Heatmap, columns);
    let (Some(x_col), Some(y_col), Some(value_col)) = (roles.category, roles.time_axis, roles.value) else {
        return Shape::default();
    };

    let mut data = Vec::with_capacity(rows.len() * rows.len());
    for (x, row) in rows.iter().enumerate() {
        let value = heat_value(cell(row, &value_col.name));
        for y in 0..rows.len() {
            data.push((x, y, value.clone()));
        }
    }

    Shape {
        x_axis: Some(Axis::category(distinct_values(rows, &x_col.name))),
        y_axis: Some(Axis::category(distinct_values(rows, &y_col.name))),
        visual_map: Some(VisualMap {
            min: 0.0,
            max: column_max(rows, &value_col.name),
            calculable: true,
            orient: "horizontal".to_string(),
            left: "center".to_string(),
            bottom: "15%".to_string(),
        }),
        series: vec![Series::Heatmap(HeatmapSeries {
            name: value_col.name.clone(),
            data,
            label: HeatmapLabel { show: true },
            emphasis: Emphasis::shadow(None),
        })],
        ..Default::default()
    }
}

// =============================================================================
// Stacked Bar / Stacked Area
// =============================================================================

/// Per key, the value of `column` in the first row whose `key_col` equals it
fn first_match_values(rows: &[Row], key_col: &str, keys: &[Value], column: &str) -> Vec<Value> {
    keys.iter()
        .map(|key| {
            rows.iter()
                .find(|r| &cell(r, key_col) == key)
                .map(|r| cell(r, column))
                .unwrap_or_else(|| Value::from(0))
        })
        .collect()
}

fn build_stacked_bar(rows: &[Row], columns: &[Column]) -> Shape {
    let roles = resolve::roles_for(ChartFamily::StackedBar, columns);
    let Some(category) = roles.category else {
        return Shape::default();
    };
    let categories = distinct_values(rows, &category.name);

    let series = roles
        .series
        .iter()
        .map(|col| {
            Series::Bar(BarSeries {
                name: col.name.clone(),
                data: first_match_values(rows, &category.name, &categories, &col.name),
                stack: Some(STACK_ID.to_string()),
                emphasis: None,
            })
        })
        .collect();

    Shape {
        x_axis: Some(Axis::category(categories)),
        y_axis: Some(Axis::value()),
        series,
        ..Default::default()
    }
}

fn build_stacked_area(rows: &[Row], columns: &[Column]) -> Shape {
    let roles = resolve::roles_for(ChartFamily::StackedArea, columns);
    let Some(axis_col) = roles.time_axis else {
        return Shape::default();
    };
    let x_data = distinct_values(rows, &axis_col.name);

    let series = roles
        .series
        .iter()
        .map(|col| {
            Series::Line(LineSeries {
                name: col.name.clone(),
                data: first_match_values(rows, &axis_col.name, &x_data, &col.name),
                smooth: None,
                stack: Some(STACK_ID.to_string()),
                area_style: Some(AreaStyle::default()),
                emphasis: None,
            })
        })
        .collect();

    Shape {
        x_axis: Some(gapless_axis(x_data)),
        y_axis: Some(Axis::value()),
        series,
        ..Default::default()
    }
}
