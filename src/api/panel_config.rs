use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::value_format::MAX_FIXED_DECIMALS;
use crate::core::{DisplayTimezone, NullPointMode, Threshold, TickFrequency, ValueFormat};
use crate::error::{GraphError, GraphResult};
use crate::interaction::PanelId;

pub const MAX_FILL_LEVEL: u8 = 10;
pub const MAX_Y_AXES: usize = 2;

/// How series values accumulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StackMode {
    None,
    Stack,
    Percent,
}

/// Configuration of one Y-axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct YAxisConfig {
    pub show: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// `1` means linear.
    pub log_base: f64,
    pub format: ValueFormat,
    pub label: Option<String>,
}

static DEFAULT_Y_AXIS: YAxisConfig = YAxisConfig {
    show: true,
    min: None,
    max: None,
    log_base: 1.0,
    format: ValueFormat::Short,
    label: None,
};

impl Default for YAxisConfig {
    fn default() -> Self {
        DEFAULT_Y_AXIS.clone()
    }
}

impl YAxisConfig {
    /// Label text, when one is configured and not blank.
    #[must_use]
    pub fn label_text(&self) -> Option<&str> {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|label| !label.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct XAxisConfig {
    pub show: bool,
    /// Moment-style label pattern overriding the automatic choice.
    pub format: Option<String>,
    pub tick_frequency: TickFrequency,
    /// Relative-date expression applied to the first calendar tick.
    pub tick_offset: Option<String>,
}

impl Default for XAxisConfig {
    fn default() -> Self {
        Self {
            show: true,
            format: None,
            tick_frequency: TickFrequency::Auto,
            tick_offset: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LegendConfig {
    pub show: bool,
    pub align_as_table: bool,
    pub right_side: bool,
    pub hide_empty: bool,
    pub hide_zero: bool,
}

impl Default for LegendConfig {
    fn default() -> Self {
        Self {
            show: true,
            align_as_table: false,
            right_side: false,
            hide_empty: false,
            hide_zero: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub threshold1: Option<f64>,
    pub threshold1_color: String,
    pub threshold2: Option<f64>,
    pub threshold2_color: String,
    /// Draws both thresholds as lines instead of bands.
    pub threshold_line: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            threshold1: None,
            threshold1_color: "rgba(216, 200, 27, 0.27)".to_owned(),
            threshold2: None,
            threshold2_color: "rgba(234, 112, 112, 0.22)".to_owned(),
            threshold_line: false,
        }
    }
}

impl GridConfig {
    #[must_use]
    pub fn thresholds(&self) -> (Threshold, Threshold) {
        (
            Threshold::new(self.threshold1, self.threshold1_color.clone())
                .as_line(self.threshold_line),
            Threshold::new(self.threshold2, self.threshold2_color.clone())
                .as_line(self.threshold_line),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub shared: bool,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self { shared: true }
    }
}

/// Graph panel configuration, in dashboard JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelConfig {
    pub lines: bool,
    pub bars: bool,
    pub points: bool,
    /// Fill level `0..=10`.
    pub fill: u8,
    pub linewidth: u32,
    pub stepped_line: bool,
    pub pointradius: u32,
    pub stack: bool,
    pub percentage: bool,
    pub null_point_mode: NullPointMode,
    pub yaxes: Vec<YAxisConfig>,
    pub xaxis: XAxisConfig,
    pub legend: LegendConfig,
    pub grid: GridConfig,
    /// Explicit legend precision; `None` derives it from the rendered axis.
    pub decimals: Option<i32>,
    pub tooltip: TooltipConfig,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            lines: true,
            bars: false,
            points: false,
            fill: 1,
            linewidth: 2,
            stepped_line: false,
            pointradius: 5,
            stack: false,
            percentage: false,
            null_point_mode: NullPointMode::Connected,
            yaxes: vec![YAxisConfig::default(), YAxisConfig::default()],
            xaxis: XAxisConfig::default(),
            legend: LegendConfig::default(),
            grid: GridConfig::default(),
            decimals: None,
            tooltip: TooltipConfig::default(),
        }
    }
}

impl PanelConfig {
    /// Parses dashboard JSON and validates the result.
    pub fn from_json_str(json: &str) -> GraphResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GraphResult<()> {
        if self.fill > MAX_FILL_LEVEL {
            return Err(GraphError::InvalidConfig(format!(
                "fill must be in 0..={MAX_FILL_LEVEL}, got {}",
                self.fill
            )));
        }
        if self.yaxes.is_empty() || self.yaxes.len() > MAX_Y_AXES {
            return Err(GraphError::InvalidConfig(format!(
                "expected 1 or {MAX_Y_AXES} y-axes, got {}",
                self.yaxes.len()
            )));
        }
        for (slot, axis) in self.yaxes.iter().enumerate() {
            if !axis.log_base.is_finite() || axis.log_base < 1.0 {
                return Err(GraphError::InvalidConfig(format!(
                    "yaxes[{slot}].logBase must be a finite number >= 1"
                )));
            }
            let bounds = [axis.min, axis.max];
            if bounds.iter().flatten().any(|bound| !bound.is_finite()) {
                return Err(GraphError::InvalidConfig(format!(
                    "yaxes[{slot}] bounds must be finite"
                )));
            }
        }
        if let Some(decimals) = self.decimals {
            if !(0..=MAX_FIXED_DECIMALS).contains(&decimals) {
                return Err(GraphError::InvalidConfig(format!(
                    "decimals must be in 0..={MAX_FIXED_DECIMALS}, got {decimals}"
                )));
            }
        }
        let thresholds = [self.grid.threshold1, self.grid.threshold2];
        if thresholds.iter().flatten().any(|value| !value.is_finite()) {
            return Err(GraphError::InvalidConfig(
                "thresholds must be finite".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn stacking_mode(&self) -> StackMode {
        match (self.stack, self.percentage) {
            (true, true) => StackMode::Percent,
            (true, false) => StackMode::Stack,
            (false, _) => StackMode::None,
        }
    }

    /// Y-axis config by slot; a missing second entry falls back to defaults.
    #[must_use]
    pub fn yaxis(&self, slot: usize) -> &YAxisConfig {
        self.yaxes.get(slot).unwrap_or(&DEFAULT_Y_AXIS)
    }

    /// Fill alpha for the renderer; level 0 still paints a barely visible area.
    #[must_use]
    pub fn fill_alpha(&self) -> f64 {
        if self.fill == 0 {
            0.001
        } else {
            f64::from(self.fill) / 10.0
        }
    }
}

/// Host-owned state that travels beside the panel config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HostContext {
    pub panel_id: PanelId,
    /// Aliases toggled off by the user.
    pub hidden_series: BTreeSet<String>,
    pub timezone: DisplayTimezone,
    /// Dashboard-wide shared crosshair.
    pub shared_crosshair: bool,
}

impl HostContext {
    #[must_use]
    pub fn new(panel_id: PanelId) -> Self {
        Self {
            panel_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hidden_series(mut self, alias: impl Into<String>) -> Self {
        self.hidden_series.insert(alias.into());
        self
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: DisplayTimezone) -> Self {
        self.timezone = timezone;
        self
    }

    #[must_use]
    pub fn with_shared_crosshair(mut self, shared: bool) -> Self {
        self.shared_crosshair = shared;
        self
    }

    #[must_use]
    pub fn is_hidden(&self, alias: &str) -> bool {
        self.hidden_series.contains(alias)
    }
}

#[cfg(test)]
mod tests {
    use super::{PanelConfig, StackMode};
    use crate::core::{NullPointMode, TickFrequency, ValueFormat};

    #[test]
    fn empty_json_yields_dashboard_defaults() {
        let config = PanelConfig::from_json_str("{}").expect("defaults");
        assert_eq!(config, PanelConfig::default());
        assert!(config.lines);
        assert_eq!(config.fill, 1);
        assert_eq!(config.yaxes.len(), 2);
        assert_eq!(config.yaxis(0).format, ValueFormat::Short);
    }

    #[test]
    fn dashboard_field_names_parse() {
        let config = PanelConfig::from_json_str(
            r#"{
                "nullPointMode": "null as zero",
                "steppedLine": true,
                "stack": true,
                "percentage": true,
                "yaxes": [{"format": "bytes", "logBase": 2, "label": "io"}],
                "xaxis": {"tickFrequency": 5, "tickOffset": "+1d"},
                "legend": {"alignAsTable": true, "rightSide": true},
                "grid": {"threshold1": 10, "threshold1Color": "red", "thresholdLine": true}
            }"#,
        )
        .expect("config");

        assert_eq!(config.null_point_mode, NullPointMode::NullAsZero);
        assert!(config.stepped_line);
        assert_eq!(config.stacking_mode(), StackMode::Percent);
        assert_eq!(config.yaxis(0).format, ValueFormat::Bytes);
        assert_eq!(config.yaxis(0).log_base, 2.0);
        assert!(config.yaxis(1).show);
        assert_eq!(config.xaxis.tick_frequency, TickFrequency::Days);
        assert!(config.legend.right_side);
        let (first, _) = config.grid.thresholds();
        assert!(first.line);
        assert_eq!(first.color, "red");
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(PanelConfig::from_json_str(r#"{"fill": 11}"#).is_err());
        assert!(PanelConfig::from_json_str(r#"{"yaxes": [{"logBase": 0.5}]}"#).is_err());
        assert!(PanelConfig::from_json_str(r#"{"yaxes": [{}, {}, {}]}"#).is_err());
        assert!(PanelConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn decimals_outside_fixed_range_are_rejected() {
        assert!(PanelConfig::from_json_str(r#"{"decimals": 400}"#).is_err());
        assert!(PanelConfig::from_json_str(r#"{"decimals": -1}"#).is_err());
        let config = PanelConfig::from_json_str(r#"{"decimals": 20}"#).expect("upper bound");
        assert_eq!(config.decimals, Some(20));
    }

    #[test]
    fn fill_level_translates_to_alpha() {
        let mut config = PanelConfig::default();
        config.fill = 0;
        assert_eq!(config.fill_alpha(), 0.001);
        config.fill = 4;
        assert_eq!(config.fill_alpha(), 0.4);
    }
}
