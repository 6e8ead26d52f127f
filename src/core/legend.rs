use serde::{Deserialize, Serialize};

use crate::core::series::SeriesStats;
use crate::core::value_format::ValueFormat;

/// Precision used for legend and tooltip values of one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegendPrecision {
    pub decimals: Option<i32>,
    pub scaled_decimals: Option<i32>,
}

impl LegendPrecision {
    /// Resolves precision from the panel override or the rendered axis.
    ///
    /// An explicit override applies as-is with no scaled hint. Otherwise legend
    /// values get one more decimal than the axis ticks (a zero or unknown tick
    /// precision counts as `-1`) and the axis scaled decimals plus two.
    #[must_use]
    pub fn resolve(
        decimals_override: Option<i32>,
        axis_tick_decimals: Option<i32>,
        axis_scaled_decimals: Option<i32>,
    ) -> Self {
        if let Some(decimals) = decimals_override {
            return Self {
                decimals: Some(decimals),
                scaled_decimals: None,
            };
        }

        let tick_decimals = axis_tick_decimals.filter(|decimals| *decimals != 0).unwrap_or(-1);
        Self {
            decimals: Some(tick_decimals.saturating_add(1)),
            scaled_decimals: axis_scaled_decimals.map(|scaled| scaled.saturating_add(2)),
        }
    }
}

/// Display strings for one series' summary statistics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegendValues {
    pub min: String,
    pub max: String,
    pub avg: String,
    pub current: String,
    pub total: String,
}

/// Formats a series' statistics; unknown statistics render as empty strings.
#[must_use]
pub fn format_legend_values(
    format: &ValueFormat,
    precision: LegendPrecision,
    stats: &SeriesStats,
) -> LegendValues {
    let render = |value: Option<f64>| {
        value.map_or_else(String::new, |value| {
            format.format(value, precision.decimals, precision.scaled_decimals)
        })
    };

    LegendValues {
        min: render(stats.min),
        max: render(stats.max),
        avg: render(stats.avg),
        current: render(stats.current),
        total: render(stats.total),
    }
}
