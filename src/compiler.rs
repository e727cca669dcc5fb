use crate::data::{Column, Row};
use crate::errors::ChartError;
use crate::ir::{ChartDescriptor, ChartFamily, Customization, Shape};
use crate::theme_resolve::base_template;

/// Build a render-ready descriptor. Never fails: missing roles produce an
/// empty series list instead of an error.
pub fn build_descriptor(
    family: ChartFamily,
    rows: &[Row],
    columns: &[Column],
    custom: &Customization,
) -> ChartDescriptor {
    let base = base_template(custom);
    let shape = (family.builder())(rows, columns);
    tracing::debug!(
        family = %family,
        rows = rows.len(),
        columns = columns.len(),
        series = shape.series.len(),
        "built chart shape"
    );
    merge(base, shape)
}

/// Same as `build_descriptor`, keyed by a family tag; unknown tags use the
/// column chart.
pub fn build_descriptor_for_tag(
    tag: &str,
    rows: &[Row],
    columns: &[Column],
    custom: &Customization,
) -> ChartDescriptor {
    build_descriptor(ChartFamily::parse_or_default(tag), rows, columns, custom)
}

/// Like `build_descriptor`, but refuses an empty dataset
pub fn build_descriptor_checked(
    family: ChartFamily,
    rows: &[Row],
    columns: &[Column],
    custom: &Customization,
) -> Result<ChartDescriptor, ChartError> {
    if columns.is_empty() {
        return Err(ChartError::InsufficientData("no columns".to_string()));
    }
    if rows.is_empty() {
        return Err(ChartError::InsufficientData("no rows".to_string()));
    }
    Ok(build_descriptor(family, rows, columns, custom))
}

/// Lay the builder output over the base template; the shape wins.
pub fn merge(base: ChartDescriptor, shape: Shape) -> ChartDescriptor {
    ChartDescriptor {
        tooltip: shape.tooltip.unwrap_or(base.tooltip),
        x_axis: shape.x_axis.or(base.x_axis),
        y_axis: shape.y_axis.or(base.y_axis),
        radar: shape.radar.or(base.radar),
        visual_map: shape.visual_map.or(base.visual_map),
        series: shape.series,
        ..base
    }
}
