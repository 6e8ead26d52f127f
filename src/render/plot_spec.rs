use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{
    AnnotationOverlay, AxisIndex, DisplayTimezone, GridMarkings, LogScale, PlotPair, SeriesStats,
    TickPlan, ValueFormat, Viewport,
};
use crate::error::{GraphError, GraphResult};

/// One series, styled and ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledSeries {
    pub alias: String,
    pub color: Option<String>,
    pub data: Vec<PlotPair>,
    pub yaxis: AxisIndex,
    pub zindex: i32,
    /// Hidden series never take part in stacking.
    pub stack: bool,
    pub stats: SeriesStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineOptions {
    pub show: bool,
    pub zero: bool,
    /// Fill alpha in `0.001..=1`.
    pub fill: f64,
    pub line_width: f64,
    pub steps: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarOptions {
    pub show: bool,
    pub fill: f64,
    /// Bar width in axis units (milliseconds).
    pub bar_width: f64,
    pub zero: bool,
    pub line_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointOptions {
    pub show: bool,
    pub fill: f64,
    pub radius: f64,
}

/// Styling shared by every series of the plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesOptions {
    pub stack: bool,
    pub stack_percent: bool,
    pub lines: LineOptions,
    pub bars: BarOptions,
    pub points: PointOptions,
    pub shadow_size: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisPosition {
    Left,
    Right,
}

/// One Y-axis of the plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub index: AxisIndex,
    pub position: AxisPosition,
    pub show: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub log_base: f64,
    /// Present only when `log_base > 1`.
    pub log_scale: Option<LogScale>,
    /// Unit format for tick labels (`percent` under percent stacking).
    pub tick_format: ValueFormat,
}

impl AxisSpec {
    /// Formats a tick label with the precision the renderer chose for this axis.
    #[must_use]
    pub fn format_tick(
        &self,
        value: f64,
        tick_decimals: Option<i32>,
        scaled_decimals: Option<i32>,
    ) -> String {
        self.tick_format.format(value, tick_decimals, scaled_decimals)
    }
}

pub type AxisSpecs = SmallVec<[AxisSpec; 2]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisMode {
    Time,
}

/// The time axis of the plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxisSpec {
    pub show: bool,
    pub mode: AxisMode,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub timezone: DisplayTimezone,
    pub label: String,
    pub ticks: TickPlan,
}

impl XAxisSpec {
    #[must_use]
    pub fn format_tick(&self, millis: f64) -> String {
        self.ticks.formatter.format(millis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GridMargin {
    pub left: u32,
    pub right: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub markings: GridMarkings,
    pub min_border_margin: u32,
    pub background_color: Option<String>,
    pub border_width: u32,
    pub hoverable: bool,
    pub color: String,
    pub margin: GridMargin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Selection and crosshair track the x-axis only.
    X,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSpec {
    pub mode: SelectionMode,
    pub color: String,
}

/// Renderer-agnostic description of one chart draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSpecification {
    /// Target area: element width and plot height (panel height minus legend).
    pub viewport: Viewport,
    /// Sorted by ascending z-index.
    pub series: Vec<StyledSeries>,
    pub series_options: SeriesOptions,
    pub yaxes: AxisSpecs,
    pub xaxis: XAxisSpec,
    pub grid: GridSpec,
    pub annotations: Option<AnnotationOverlay>,
    pub selection: SelectionSpec,
    pub crosshair: Option<SelectionMode>,
}

impl PlotSpecification {
    #[must_use]
    pub fn axis(&self, index: AxisIndex) -> Option<&AxisSpec> {
        self.yaxes.iter().find(|axis| axis.index == index)
    }

    /// Checks the structural invariants renderers rely on.
    pub fn validate(&self) -> GraphResult<()> {
        self.viewport.validate()?;

        if self.yaxes.first().map(|axis| axis.index) != Some(AxisIndex::Left) {
            return Err(GraphError::InvalidData(
                "plot must start with the left y-axis".to_owned(),
            ));
        }
        for series in &self.series {
            if self.axis(series.yaxis).is_none() {
                return Err(GraphError::InvalidData(format!(
                    "series `{}` references missing y-axis {}",
                    series.alias,
                    series.yaxis.number()
                )));
            }
        }
        if self
            .series
            .windows(2)
            .any(|pair| pair[0].zindex > pair[1].zindex)
        {
            return Err(GraphError::InvalidData(
                "series must be sorted by z-index".to_owned(),
            ));
        }

        let ticks = &self.xaxis.ticks.ticks;
        if !ticks.is_empty() && ticks.len() < 2 {
            return Err(GraphError::InvalidData(
                "x-axis needs at least two ticks".to_owned(),
            ));
        }
        for axis in &self.yaxes {
            if axis.log_scale.as_ref().is_some_and(|scale| scale.ticks.len() < 2) {
                return Err(GraphError::InvalidData(
                    "log axis needs at least two ticks".to_owned(),
                ));
            }
        }

        Ok(())
    }
}
