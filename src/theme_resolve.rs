//! Presentation Template Resolution
//!
//! Resolves a sparse `Customization` into the fully-specified base template
//! every descriptor starts from. Nothing here looks at the data.

use crate::ir::{
    AxisPointer, ChartDescriptor, Customization, Grid, Legend, LegendPosition, TextStyle, Title,
    Tooltip, TooltipTrigger,
};

// === Palettes ===

/// A named, ordered color sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub name: &'static str,
    pub colors: [&'static str; 10],
}

pub const PALETTES: [Palette; 6] = [
    Palette {
        name: "blue",
        colors: [
            "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
            "#bcbd22", "#17becf",
        ],
    },
    Palette {
        name: "green",
        colors: [
            "#2ca02c", "#98df8a", "#d62728", "#ff9896", "#9467bd", "#c5b0d5", "#8c564b", "#c49c94",
            "#e377c2", "#f7b6d3",
        ],
    },
    Palette {
        name: "red",
        colors: [
            "#d62728", "#ff9896", "#2ca02c", "#98df8a", "#9467bd", "#c5b0d5", "#8c564b", "#c49c94",
            "#e377c2", "#f7b6d3",
        ],
    },
    Palette {
        name: "purple",
        colors: [
            "#9467bd", "#c5b0d5", "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a",
            "#d62728", "#ff9896",
        ],
    },
    Palette {
        name: "orange",
        colors: [
            "#ff7f0e", "#ffbb78", "#d62728", "#ff9896", "#2ca02c", "#98df8a", "#9467bd", "#c5b0d5",
            "#8c564b", "#c49c94",
        ],
    },
    Palette {
        name: "cyan",
        colors: [
            "#17becf", "#9edae5", "#1f77b4", "#aec7e8", "#2ca02c", "#98df8a", "#ff7f0e", "#ffbb78",
            "#d62728", "#ff9896",
        ],
    },
];

/// Palette for a theme index; missing, negative or out-of-range indices
/// resolve to the first palette.
pub fn palette_for(index: Option<i64>) -> &'static Palette {
    let Some(i) = index else {
        return &PALETTES[0];
    };
    match usize::try_from(i).ok().and_then(|i| PALETTES.get(i)) {
        Some(p) => p,
        None => {
            tracing::warn!(index = i, "color theme out of range, using theme 0");
            &PALETTES[0]
        }
    }
}

/// Look up a palette by name (case-insensitive)
pub fn palette_index(name: &str) -> Option<usize> {
    PALETTES
        .iter()
        .position(|p| p.name.eq_ignore_ascii_case(name.trim()))
}

// === Template blocks ===

fn resolve_title(custom: &Customization) -> Title {
    Title {
        text: custom.title.clone().unwrap_or_default(),
        left: "center".to_string(),
        text_style: TextStyle {
            font_size: 16,
            font_weight: "bold".to_string(),
        },
    }
}

/// Default tooltip: axis-triggered with a shadow pointer
pub fn axis_tooltip() -> Tooltip {
    Tooltip {
        trigger: TooltipTrigger::Axis,
        axis_pointer: Some(AxisPointer {
            kind: "shadow".to_string(),
        }),
        formatter: None,
    }
}

/// Item-triggered tooltip with a percentage label, for part-of-whole charts
pub fn item_tooltip() -> Tooltip {
    Tooltip {
        trigger: TooltipTrigger::Item,
        axis_pointer: None,
        formatter: Some("{a} <br/>{b}: {c} ({d}%)".to_string()),
    }
}

/// Legend block for a requested position
pub fn resolve_legend(position: Option<LegendPosition>) -> Legend {
    let position = position.unwrap_or_default();
    let (orient, left, top) = match position {
        LegendPosition::Left => ("vertical", "left", "middle"),
        LegendPosition::Right => ("vertical", "right", "middle"),
        LegendPosition::Bottom => ("horizontal", "center", "bottom"),
        LegendPosition::Top | LegendPosition::None | LegendPosition::Unrecognized => {
            ("horizontal", "center", "top")
        }
    };
    Legend {
        show: position != LegendPosition::None,
        orient: orient.to_string(),
        left: left.to_string(),
        top: top.to_string(),
    }
}

fn resolve_grid(show_grid: Option<bool>) -> Grid {
    Grid {
        show: show_grid != Some(false),
        left: "3%".to_string(),
        right: "4%".to_string(),
        bottom: "3%".to_string(),
        contain_label: true,
    }
}

/// Build the base template: chrome only, no axes and an empty series list
pub fn base_template(custom: &Customization) -> ChartDescriptor {
    let palette = palette_for(custom.color_theme);
    ChartDescriptor {
        background_color: "transparent".to_string(),
        color: palette.colors.iter().map(|c| c.to_string()).collect(),
        title: resolve_title(custom),
        tooltip: axis_tooltip(),
        legend: resolve_legend(custom.legend_position),
        grid: resolve_grid(custom.show_grid),
        x_axis: None,
        y_axis: None,
        radar: None,
        visual_map: None,
        series: Vec::new(),
    }
}
