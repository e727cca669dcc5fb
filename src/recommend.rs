//! Rule-based chart recommendations from column metadata.

use crate::data::{Column, ColumnType};
use crate::ir::ChartFamily;
use serde::{Deserialize, Serialize};

/// Most recommendations ever returned
pub const MAX_RECOMMENDATIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub family: ChartFamily,
    pub reason: String,
    pub score: f64,
}

impl Recommendation {
    fn new(family: ChartFamily, reason: &str, score: f64) -> Self {
        Self {
            family,
            reason: reason.to_string(),
            score: score.clamp(0.0, 1.0),
        }
    }
}

/// Recommendation record as produced by an external recommender
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecommendation {
    pub chart: Option<String>,
    pub reason: Option<String>,
    pub score: Option<f64>,
}

/// Default recommendations derived from the mix of column types
pub fn recommend(columns: &[Column]) -> Vec<Recommendation> {
    let count = |kind: ColumnType| columns.iter().filter(|c| c.kind == kind).count();
    let numbers = count(ColumnType::Number);
    let dates = count(ColumnType::Date);
    let strings = count(ColumnType::String);

    let mut picks = Vec::new();
    if dates > 0 && numbers > 0 {
        picks.push(Recommendation::new(
            ChartFamily::Line,
            "time series with numeric values, suited to trends",
            0.9,
        ));
    }
    if strings > 0 && numbers > 0 {
        picks.push(Recommendation::new(
            ChartFamily::Column,
            "categories with numeric values, suited to comparison",
            0.85,
        ));
    }
    if numbers >= 2 {
        picks.push(Recommendation::new(
            ChartFamily::Scatter,
            "several numeric variables, suited to correlation",
            0.8,
        ));
    }

    let fillers = [
        (ChartFamily::Pie, "general share of a whole", 0.7),
        (ChartFamily::Area, "trend visualization", 0.65),
        (ChartFamily::Radar, "multi-dimensional comparison", 0.6),
    ];
    for (family, reason, score) in fillers {
        if picks.len() >= MAX_RECOMMENDATIONS {
            break;
        }
        if !picks.iter().any(|r| r.family == family) {
            picks.push(Recommendation::new(family, reason, score));
        }
    }

    picks.truncate(MAX_RECOMMENDATIONS);
    tracing::debug!(count = picks.len(), "default recommendations");
    picks
}

/// Exact lookup first, then containment either way against known names.
/// The longest matching name wins, so "stacked bar chart" is a stacked bar.
pub fn fuzzy_family(name: &str) -> Option<ChartFamily> {
    if let Some(family) = ChartFamily::lookup(name) {
        return Some(family);
    }
    let needle: String = name
        .trim()
        .chars()
        .map(|c| if c == '_' || c.is_whitespace() { '-' } else { c.to_ascii_lowercase() })
        .collect();
    if needle.is_empty() {
        return None;
    }

    let mut best: Option<(usize, ChartFamily)> = None;
    for family in ChartFamily::ALL {
        for key in [family.label(), family.name()] {
            if !(needle.contains(key) || key.contains(needle.as_str())) {
                continue;
            }
            let len = key.chars().count();
            if best.map_or(true, |(best_len, _)| len > best_len) {
                best = Some((len, family));
            }
        }
    }
    best.map(|(_, family)| family)
}

/// Normalize externally supplied recommendations: drop unknown or incomplete
/// records, clamp scores, pad to three with defaults, best first.
pub fn validate_recommendations(raw: Vec<RawRecommendation>) -> Vec<Recommendation> {
    let mut valid: Vec<Recommendation> = Vec::new();
    for rec in raw {
        let (Some(chart), Some(reason), Some(score)) = (rec.chart, rec.reason, rec.score) else {
            tracing::debug!("dropping incomplete recommendation");
            continue;
        };
        match fuzzy_family(&chart) {
            Some(family) => valid.push(Recommendation::new(family, &reason, score)),
            None => tracing::warn!(chart = %chart, "dropping recommendation for unknown chart"),
        }
    }

    let defaults = [ChartFamily::Column, ChartFamily::Line, ChartFamily::Pie];
    for family in defaults {
        if valid.len() >= MAX_RECOMMENDATIONS {
            break;
        }
        if !valid.iter().any(|r| r.family == family) {
            valid.push(Recommendation::new(family, "default recommendation", 0.6));
        }
    }

    valid.sort_by(|a, b| b.score.total_cmp(&a.score));
    valid.truncate(MAX_RECOMMENDATIONS);
    valid
}
