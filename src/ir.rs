use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

// =============================================================================
// Phase 1: Request
// =============================================================================

/// The supported mapping strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartFamily {
    /// Horizontal bars (categories on the y axis)
    Bar,
    /// Vertical bars (categories on the x axis)
    Column,
    Line,
    Pie,
    Scatter,
    Area,
    Radar,
    Heatmap,
    Funnel,
    StackedBar,
    StackedArea,
}

impl ChartFamily {
    pub const ALL: [ChartFamily; 11] = [
        ChartFamily::Bar,
        ChartFamily::Column,
        ChartFamily::Line,
        ChartFamily::Pie,
        ChartFamily::Scatter,
        ChartFamily::Area,
        ChartFamily::Radar,
        ChartFamily::Heatmap,
        ChartFamily::Funnel,
        ChartFamily::StackedBar,
        ChartFamily::StackedArea,
    ];

    /// Canonical English name
    pub fn name(self) -> &'static str {
        match self {
            ChartFamily::Bar => "bar",
            ChartFamily::Column => "column",
            ChartFamily::Line => "line",
            ChartFamily::Pie => "pie",
            ChartFamily::Scatter => "scatter",
            ChartFamily::Area => "area",
            ChartFamily::Radar => "radar",
            ChartFamily::Heatmap => "heatmap",
            ChartFamily::Funnel => "funnel",
            ChartFamily::StackedBar => "stacked-bar",
            ChartFamily::StackedArea => "stacked-area",
        }
    }

    /// Label used by the upstream recommendation service
    pub fn label(self) -> &'static str {
        match self {
            ChartFamily::Bar => "条形图",
            ChartFamily::Column => "柱状图",
            ChartFamily::Line => "折线图",
            ChartFamily::Pie => "饼图",
            ChartFamily::Scatter => "散点图",
            ChartFamily::Area => "面积图",
            ChartFamily::Radar => "雷达图",
            ChartFamily::Heatmap => "热力图",
            ChartFamily::Funnel => "漏斗图",
            ChartFamily::StackedBar => "堆积条形图",
            ChartFamily::StackedArea => "堆积面积图",
        }
    }

    /// Look up a family by English name or upstream label.
    /// Returns None for anything unrecognized.
    pub fn lookup(tag: &str) -> Option<ChartFamily> {
        let tag = tag.trim();
        let normalized: String = tag
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c.to_ascii_lowercase() })
            .collect();
        ChartFamily::ALL
            .into_iter()
            .find(|f| f.name() == normalized || f.label() == tag)
    }

    /// Parse a family tag, falling back to vertical bars for unknown tags.
    pub fn parse_or_default(tag: &str) -> ChartFamily {
        match ChartFamily::lookup(tag) {
            Some(family) => family,
            None => {
                tracing::warn!(tag = %tag, "unknown chart family, using column chart");
                ChartFamily::Column
            }
        }
    }
}

impl Serialize for ChartFamily {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl fmt::Display for ChartFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
    None,
    /// Any other string; placed like `Top`
    #[serde(other)]
    Unrecognized,
}

impl LegendPosition {
    pub fn parse(s: &str) -> LegendPosition {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => LegendPosition::Top,
            "bottom" => LegendPosition::Bottom,
            "left" => LegendPosition::Left,
            "right" => LegendPosition::Right,
            "none" => LegendPosition::None,
            _ => LegendPosition::Unrecognized,
        }
    }
}

/// Caller-supplied presentation overlay. Every field is optional; omitted
/// fields take their defaults when the base template is built.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_theme_index")]
    pub color_theme: Option<i64>,
    pub show_grid: Option<bool>,
    pub legend_position: Option<LegendPosition>,
}

/// Accept any JSON value for `colorTheme`. Whole numbers become the index;
/// anything else (fractions, huge integers, strings) is dropped so the
/// default palette applies.
fn lenient_theme_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let index = match &value {
        None | Some(Value::Null) => None,
        Some(v) => v.as_i64().or_else(|| {
            v.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
                .map(|f| f as i64)
        }),
    };
    if index.is_none() && value.as_ref().is_some_and(|v| !v.is_null()) {
        tracing::warn!(value = ?value, "color theme is not an index, using theme 0");
    }
    Ok(index)
}

impl Customization {
    /// Fold `overlay` on top of `self`; keys set in the overlay win.
    pub fn merged_with(&self, overlay: &Customization) -> Customization {
        Customization {
            title: overlay.title.clone().or_else(|| self.title.clone()),
            color_theme: overlay.color_theme.or(self.color_theme),
            show_grid: overlay.show_grid.or(self.show_grid),
            legend_position: overlay.legend_position.or(self.legend_position),
        }
    }
}

// =============================================================================
// Phase 2: Shape (builder output)
// =============================================================================

/// Family-specific extension produced by a shape builder.
/// Every `Some` field replaces the base template's value when merged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shape {
    pub tooltip: Option<Tooltip>,
    pub x_axis: Option<Axis>,
    pub y_axis: Option<Axis>,
    pub radar: Option<RadarCoord>,
    pub visual_map: Option<VisualMap>,
    pub series: Vec<Series>,
}

// =============================================================================
// Phase 3: Descriptor
// =============================================================================

/// Render-ready option object for the charting library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDescriptor {
    pub background_color: String,
    pub color: Vec<String>,
    pub title: Title,
    pub tooltip: Tooltip,
    pub legend: Legend,
    pub grid: Grid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radar: Option<RadarCoord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visual_map: Option<VisualMap>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Title {
    pub text: String,
    pub left: String,
    pub text_style: TextStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: u32,
    pub font_weight: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipTrigger {
    Axis,
    Item,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tooltip {
    pub trigger: TooltipTrigger,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_pointer: Option<AxisPointer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisPointer {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub show: bool,
    pub orient: String,
    pub left: String,
    pub top: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grid {
    pub show: bool,
    pub left: String,
    pub right: String,
    pub bottom: String,
    pub contain_label: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisKind {
    Category,
    Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(rename = "type")]
    pub kind: AxisKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_gap: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_gap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_tick: Option<AxisTick>,
}

impl Axis {
    pub fn value() -> Self {
        Axis {
            kind: AxisKind::Value,
            data: None,
            name: None,
            name_location: None,
            name_gap: None,
            boundary_gap: None,
            axis_tick: None,
        }
    }

    pub fn category(data: Vec<Value>) -> Self {
        Axis {
            kind: AxisKind::Category,
            data: Some(data),
            ..Axis::value()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisTick {
    pub align_with_label: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarCoord {
    pub indicator: Vec<Indicator>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub name: String,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualMap {
    pub min: f64,
    pub max: f64,
    pub calculable: bool,
    pub orient: String,
    pub left: String,
    pub bottom: String,
}

// === Series ===

/// One entry of the descriptor's `series` list, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Series {
    Bar(BarSeries),
    Line(LineSeries),
    Pie(PieSeries),
    Scatter(ScatterSeries),
    Radar(RadarSeries),
    Heatmap(HeatmapSeries),
    Funnel(FunnelSeries),
}

impl Series {
    pub fn name(&self) -> &str {
        match self {
            Series::Bar(s) => &s.name,
            Series::Line(s) => &s.name,
            Series::Pie(s) => &s.name,
            Series::Scatter(s) => &s.name,
            Series::Radar(s) => &s.name,
            Series::Heatmap(s) => &s.name,
            Series::Funnel(s) => &s.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Emphasis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<String>,
    #[serde(rename = "itemStyle", skip_serializing_if = "Option::is_none")]
    pub item_style: Option<ShadowStyle>,
}

impl Emphasis {
    pub fn focus_series() -> Self {
        Emphasis {
            focus: Some("series".to_string()),
            item_style: None,
        }
    }

    pub fn shadow(offset_x: Option<f64>) -> Self {
        Emphasis {
            focus: None,
            item_style: Some(ShadowStyle {
                shadow_blur: 10.0,
                shadow_offset_x: offset_x,
                shadow_color: "rgba(0, 0, 0, 0.5)".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowStyle {
    pub shadow_blur: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_offset_x: Option<f64>,
    pub shadow_color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct AreaStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedValue {
    pub name: Value,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<Emphasis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSeries {
    pub name: String,
    pub data: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smooth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_style: Option<AreaStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<Emphasis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSeries {
    pub name: String,
    pub radius: String,
    pub data: Vec<NamedValue>,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterSeries {
    pub name: String,
    pub data: Vec<(Value, Value)>,
    pub symbol_size: u32,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub name: String,
    pub data: Vec<RadarEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarEntry {
    pub value: Vec<Value>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapSeries {
    pub name: String,
    /// `[x index, y index, value]` cells
    pub data: Vec<(usize, usize, Value)>,
    pub label: HeatmapLabel,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapLabel {
    pub show: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunnelSeries {
    pub name: String,
    pub left: String,
    pub top: u32,
    pub bottom: u32,
    pub width: String,
    pub data: Vec<NamedValue>,
}
