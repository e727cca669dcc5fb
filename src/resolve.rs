//! Column role resolution.
//!
//! Each role is chosen by strict priority: first column of the wanted type,
//! otherwise a fixed position. A role is `None` only when the positional
//! fallback points past the end of the column list.

use crate::data::{Column, ColumnType};
use crate::ir::ChartFamily;

/// Columns picked for one chart family
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoleSet<'a> {
    pub category: Option<&'a Column>,
    pub value: Option<&'a Column>,
    pub secondary: Option<&'a Column>,
    pub time_axis: Option<&'a Column>,
    pub series: Vec<&'a Column>,
}

fn first_of<'a>(columns: &'a [Column], accept: impl Fn(ColumnType) -> bool) -> Option<&'a Column> {
    columns.iter().find(|c| accept(c.kind))
}

/// Category/name role: first string column, else the first column
pub fn category_column(columns: &[Column]) -> Option<&Column> {
    first_of(columns, |t| t == ColumnType::String).or_else(|| {
        log_fallback("category", 0, columns);
        columns.first()
    })
}

/// Primary value role: first number column, else the second column
pub fn value_column(columns: &[Column]) -> Option<&Column> {
    first_of(columns, |t| t == ColumnType::Number).or_else(|| {
        log_fallback("value", 1, columns);
        columns.get(1)
    })
}

/// Scatter x role: first number column, else the first column
pub fn scatter_x_column(columns: &[Column]) -> Option<&Column> {
    first_of(columns, |t| t == ColumnType::Number).or_else(|| {
        log_fallback("scatter x", 0, columns);
        columns.first()
    })
}

/// Secondary numeric role: first number column named differently from
/// `primary`, else the second column
pub fn secondary_value_column<'a>(columns: &'a [Column], primary: Option<&Column>) -> Option<&'a Column> {
    columns
        .iter()
        .find(|c| c.kind == ColumnType::Number && primary.map_or(true, |p| p.name != c.name))
        .or_else(|| {
            log_fallback("secondary value", 1, columns);
            columns.get(1)
        })
}

/// Time/category axis role: first date or string column, else the first column
pub fn time_axis_column(columns: &[Column]) -> Option<&Column> {
    first_of(columns, |t| matches!(t, ColumnType::Date | ColumnType::String)).or_else(|| {
        log_fallback("time axis", 0, columns);
        columns.first()
    })
}

/// Multi-series role: every number column, in column order
pub fn series_columns(columns: &[Column]) -> Vec<&Column> {
    columns
        .iter()
        .filter(|c| c.kind == ColumnType::Number)
        .collect()
}

/// Heatmap axes are positional: x = first column, y = second column,
/// value = first number column else the third column
pub fn heatmap_columns(columns: &[Column]) -> (Option<&Column>, Option<&Column>, Option<&Column>) {
    let value = first_of(columns, |t| t == ColumnType::Number).or_else(|| columns.get(2));
    (columns.first(), columns.get(1), value)
}

/// Resolve every role the given family uses
pub fn roles_for(family: ChartFamily, columns: &[Column]) -> RoleSet<'_> {
    let roles = match family {
        ChartFamily::Bar | ChartFamily::Column | ChartFamily::Pie | ChartFamily::Funnel => RoleSet {
            category: category_column(columns),
            value: value_column(columns),
            ..Default::default()
        },
        ChartFamily::Line | ChartFamily::Area => RoleSet {
            time_axis: time_axis_column(columns),
            value: value_column(columns),
            ..Default::default()
        },
        ChartFamily::Scatter => {
            let x = scatter_x_column(columns);
            RoleSet {
                value: x,
                secondary: secondary_value_column(columns, x),
                ..Default::default()
            }
        }
        ChartFamily::Radar => RoleSet {
            series: series_columns(columns),
            ..Default::default()
        },
        ChartFamily::Heatmap => {
            let (x, y, value) = heatmap_columns(columns);
            RoleSet {
                category: x,
                time_axis: y,
                value,
                ..Default::default()
            }
        }
        ChartFamily::StackedBar => RoleSet {
            category: category_column(columns),
            series: series_columns(columns),
            ..Default::default()
        },
        ChartFamily::StackedArea => RoleSet {
            time_axis: time_axis_column(columns),
            series: series_columns(columns),
            ..Default::default()
        },
    };

    tracing::debug!(
        family = %family,
        category = ?roles.category.map(|c| c.name.as_str()),
        value = ?roles.value.map(|c| c.name.as_str()),
        secondary = ?roles.secondary.map(|c| c.name.as_str()),
        time_axis = ?roles.time_axis.map(|c| c.name.as_str()),
        series = roles.series.len(),
        "resolved column roles"
    );
    roles
}

fn log_fallback(role: &str, position: usize, columns: &[Column]) {
    tracing::debug!(
        role,
        position,
        found = columns.get(position).is_some(),
        "no column of the preferred type, falling back to position"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(name: &str, kind: ColumnType) -> Column {
        Column::new(name, kind)
    }

    #[test]
    fn test_category_prefers_string() {
        let cols = vec![col("n", ColumnType::Number), col("s", ColumnType::String)];
        assert_eq!(category_column(&cols).unwrap().name, "s");
    }

    #[test]
    fn test_category_falls_back_to_first() {
        let cols = vec![col("d", ColumnType::Date), col("n", ColumnType::Number)];
        assert_eq!(category_column(&cols).unwrap().name, "d");
        assert!(category_column(&[]).is_none());
    }

    #[test]
    fn test_value_prefers_number() {
        let cols = vec![
            col("s", ColumnType::String),
            col("d", ColumnType::Date),
            col("n", ColumnType::Number),
        ];
        assert_eq!(value_column(&cols).unwrap().name, "n");
    }

    #[test]
    fn test_value_falls_back_to_second() {
        let cols = vec![col("a", ColumnType::String), col("b", ColumnType::Boolean)];
        assert_eq!(value_column(&cols).unwrap().name, "b");
        let single = vec![col("a", ColumnType::String)];
        assert!(value_column(&single).is_none());
    }

    #[test]
    fn test_secondary_skips_primary_name() {
        let cols = vec![
            col("s", ColumnType::String),
            col("x", ColumnType::Number),
            col("y", ColumnType::Number),
        ];
        let primary = value_column(&cols);
        assert_eq!(secondary_value_column(&cols, primary).unwrap().name, "y");
    }

    #[test]
    fn test_secondary_falls_back_to_second() {
        let cols = vec![col("s", ColumnType::String), col("x", ColumnType::Number)];
        let primary = value_column(&cols);
        assert_eq!(secondary_value_column(&cols, primary).unwrap().name, "x");
    }

    #[test]
    fn test_time_axis_accepts_date_or_string() {
        let cols = vec![
            col("n", ColumnType::Number),
            col("d", ColumnType::Date),
            col("s", ColumnType::String),
        ];
        assert_eq!(time_axis_column(&cols).unwrap().name, "d");
        let numbers = vec![col("a", ColumnType::Number), col("b", ColumnType::Number)];
        assert_eq!(time_axis_column(&numbers).unwrap().name, "a");
    }

    #[test]
    fn test_series_columns_keep_order() {
        let cols = vec![
            col("b", ColumnType::Number),
            col("s", ColumnType::String),
            col("a", ColumnType::Number),
        ];
        let names: Vec<&str> = series_columns(&cols).iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_heatmap_columns_positional() {
        let cols = vec![
            col("x", ColumnType::String),
            col("y", ColumnType::String),
            col("v", ColumnType::Boolean),
        ];
        let (x, y, v) = heatmap_columns(&cols);
        assert_eq!(x.unwrap().name, "x");
        assert_eq!(y.unwrap().name, "y");
        assert_eq!(v.unwrap().name, "v");
    }

    #[test]
    fn test_roles_for_is_deterministic() {
        let cols = vec![
            col("region", ColumnType::String),
            col("q1", ColumnType::Number),
            col("q2", ColumnType::Number),
        ];
        for family in ChartFamily::ALL {
            assert_eq!(roles_for(family, &cols), roles_for(family, &cols));
        }
        let scatter = roles_for(ChartFamily::Scatter, &cols);
        assert_eq!(scatter.value.unwrap().name, "q1");
        assert_eq!(scatter.secondary.unwrap().name, "q2");
    }

    #[test]
    fn test_roles_for_empty_columns() {
        for family in ChartFamily::ALL {
            let roles = roles_for(family, &[]);
            assert!(roles.category.is_none());
            assert!(roles.value.is_none());
            assert!(roles.series.is_empty());
        }
    }
}
