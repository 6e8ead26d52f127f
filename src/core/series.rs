use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

/// How gaps (null samples) in a series are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NullPointMode {
    /// Null samples are dropped so the line connects across the gap.
    #[default]
    #[serde(rename = "connected")]
    Connected,
    /// Null samples are kept as gaps.
    #[serde(rename = "null")]
    Null,
    /// Null samples are drawn as zero.
    #[serde(rename = "null as zero")]
    NullAsZero,
}

/// Y-axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AxisIndex {
    #[default]
    Left,
    Right,
}

impl AxisIndex {
    /// One-based axis number used by dashboards and renderers.
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Right => 2,
        }
    }

    #[must_use]
    pub fn slot(self) -> usize {
        usize::from(self.number() - 1)
    }
}

impl TryFrom<u8> for AxisIndex {
    type Error = GraphError;

    fn try_from(value: u8) -> GraphResult<Self> {
        match value {
            1 => Ok(Self::Left),
            2 => Ok(Self::Right),
            other => Err(GraphError::InvalidData(format!(
                "y-axis index must be 1 or 2, got {other}"
            ))),
        }
    }
}

impl From<AxisIndex> for u8 {
    fn from(value: AxisIndex) -> Self {
        value.number()
    }
}

/// One raw sample: epoch milliseconds and an optional value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub value: Option<f64>,
}

impl Sample {
    #[must_use]
    pub fn new(time: f64, value: Option<f64>) -> Self {
        Self { time, value }
    }
}

/// Renderer-ready `(time, value)` pair; `None` marks a gap.
pub type PlotPair = (f64, Option<f64>);

/// Summary statistics for one series.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesStats {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub current: Option<f64>,
    pub total: Option<f64>,
    /// Smallest positive gap between consecutive timestamps, in milliseconds.
    pub time_step: Option<f64>,
}

impl SeriesStats {
    /// Computes statistics over non-null, finite samples.
    #[must_use]
    pub fn from_samples(samples: &[Sample]) -> Self {
        let mut stats = Self::default();
        let mut count = 0usize;
        let mut previous_time: Option<f64> = None;

        for sample in samples {
            if let Some(previous) = previous_time {
                let gap = sample.time - previous;
                if gap.is_finite() && gap > 0.0 {
                    stats.time_step = Some(stats.time_step.map_or(gap, |step| step.min(gap)));
                }
            }
            previous_time = Some(sample.time);

            let Some(value) = sample.value.filter(|value| value.is_finite()) else {
                continue;
            };
            count += 1;
            stats.min = Some(stats.min.map_or(value, |min| min.min(value)));
            stats.max = Some(stats.max.map_or(value, |max| max.max(value)));
            stats.total = Some(stats.total.unwrap_or(0.0) + value);
            stats.current = Some(value);
        }

        if count > 0 {
            stats.avg = stats.total.map(|total| total / count as f64);
        }
        stats
    }
}

/// One time series as delivered by the data-fetch layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    pub alias: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub datapoints: Vec<Sample>,
    #[serde(default)]
    pub yaxis: AxisIndex,
    #[serde(default)]
    pub zindex: i32,
    #[serde(default)]
    pub stats: SeriesStats,
    /// Per-series override of the panel null-point mode.
    #[serde(default)]
    pub null_point_mode: Option<NullPointMode>,
}

impl Series {
    /// Creates a series and derives its statistics from the samples.
    #[must_use]
    pub fn new(alias: impl Into<String>, datapoints: Vec<Sample>) -> Self {
        let stats = SeriesStats::from_samples(&datapoints);
        Self {
            alias: alias.into(),
            color: None,
            datapoints,
            yaxis: AxisIndex::Left,
            zindex: 0,
            stats,
            null_point_mode: None,
        }
    }

    #[must_use]
    pub fn with_yaxis(mut self, yaxis: AxisIndex) -> Self {
        self.yaxis = yaxis;
        self
    }

    #[must_use]
    pub fn with_zindex(mut self, zindex: i32) -> Self {
        self.zindex = zindex;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: SeriesStats) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_null_point_mode(mut self, mode: NullPointMode) -> Self {
        self.null_point_mode = Some(mode);
        self
    }

    /// Materializes renderer pairs; the series' own null mode wins over `panel_mode`.
    #[must_use]
    pub fn plot_pairs(&self, panel_mode: NullPointMode) -> Vec<PlotPair> {
        let mode = self.null_point_mode.unwrap_or(panel_mode);
        let mut pairs = Vec::with_capacity(self.datapoints.len());
        for sample in &self.datapoints {
            match (sample.value, mode) {
                (Some(value), _) => pairs.push((sample.time, Some(value))),
                (None, NullPointMode::Connected) => {}
                (None, NullPointMode::Null) => pairs.push((sample.time, None)),
                (None, NullPointMode::NullAsZero) => pairs.push((sample.time, Some(0.0))),
            }
        }
        pairs
    }

    /// Whether legend options exclude this series from the legend.
    #[must_use]
    pub fn hide_from_legend(&self, hide_empty: bool, hide_zero: bool) -> bool {
        let mut values = self.datapoints.iter().filter_map(|sample| sample.value);
        if hide_empty && self.datapoints.iter().all(|sample| sample.value.is_none()) {
            return true;
        }
        hide_zero && values.all(|value| value == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisIndex, NullPointMode, Sample, Series, SeriesStats};

    fn gappy() -> Series {
        Series::new(
            "cpu",
            vec![
                Sample::new(1_000.0, Some(2.0)),
                Sample::new(2_000.0, None),
                Sample::new(3_000.0, Some(4.0)),
            ],
        )
    }

    #[test]
    fn null_modes_shape_pairs() {
        let series = gappy();
        assert_eq!(series.plot_pairs(NullPointMode::Connected).len(), 2);
        assert_eq!(
            series.plot_pairs(NullPointMode::Null)[1],
            (2_000.0, None)
        );
        assert_eq!(
            series.plot_pairs(NullPointMode::NullAsZero)[1],
            (2_000.0, Some(0.0))
        );
    }

    #[test]
    fn series_null_mode_overrides_panel_mode() {
        let series = gappy().with_null_point_mode(NullPointMode::NullAsZero);
        assert_eq!(series.plot_pairs(NullPointMode::Connected).len(), 3);
    }

    #[test]
    fn stats_skip_nulls_and_track_time_step() {
        let stats = SeriesStats::from_samples(&gappy().datapoints);
        assert_eq!(stats.min, Some(2.0));
        assert_eq!(stats.max, Some(4.0));
        assert_eq!(stats.avg, Some(3.0));
        assert_eq!(stats.current, Some(4.0));
        assert_eq!(stats.total, Some(6.0));
        assert_eq!(stats.time_step, Some(1_000.0));
    }

    #[test]
    fn stats_of_empty_series_are_unknown() {
        assert_eq!(SeriesStats::from_samples(&[]), SeriesStats::default());
    }

    #[test]
    fn legend_hiding_rules() {
        let empty = Series::new("empty", vec![Sample::new(1.0, None)]);
        let zero = Series::new("zero", vec![Sample::new(1.0, Some(0.0)), Sample::new(2.0, None)]);
        assert!(empty.hide_from_legend(true, false));
        assert!(!empty.hide_from_legend(false, false));
        assert!(zero.hide_from_legend(false, true));
        assert!(!gappy().hide_from_legend(true, true));
    }

    #[test]
    fn axis_index_accepts_only_one_and_two() {
        assert_eq!(AxisIndex::try_from(2).expect("right"), AxisIndex::Right);
        assert!(AxisIndex::try_from(3).is_err());
        assert_eq!(AxisIndex::Right.slot(), 1);
    }
}
