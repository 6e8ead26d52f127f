use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::api::axes::assemble_axes;
use crate::api::panel_config::{HostContext, PanelConfig, StackMode};
use crate::core::{
    Annotation, AxisIndex, LegendPrecision, LegendValues, Series, TickPlanRequest, TimeRange,
    Viewport, build_annotation_overlay, build_threshold_markings, format_legend_values,
    plan_time_ticks,
};
use crate::render::{
    AxisMode, AxisPosition, BarOptions, GridMargin, GridSpec, LineOptions, PlotSpecification,
    PointOptions, RenderedAxis, SelectionMode, SelectionSpec, SeriesOptions, StyledSeries,
    XAxisSpec,
};

pub const TABLE_LEGEND_HEADER_PX: u32 = 23;
pub const TABLE_LEGEND_ROW_PX: u32 = 21;
pub const INLINE_LEGEND_PX: u32 = 26;
pub const AXIS_LABEL_MARGIN_PX: u32 = 20;
pub const DEFAULT_BAR_WIDTH: f64 = 1.0;
pub const BAR_WIDTH_DIVISOR: f64 = 1.5;
pub const UNHIGHLIGHTED_POINT_RADIUS: f64 = 2.0;
pub const GRID_COLOR: &str = "#c8c8c8";
pub const SELECTION_COLOR: &str = "#666";
pub const TIME_AXIS_LABEL: &str = "Datetime";

/// Everything one spec assembly reads.
#[derive(Debug, Clone, Copy)]
pub struct PlotInput<'a> {
    pub panel: &'a PanelConfig,
    pub host: &'a HostContext,
    pub series: &'a [Series],
    pub annotations: &'a [Annotation],
    pub time_range: TimeRange,
    pub width: u32,
    /// Panel height before the legend is carved out.
    pub panel_height: u32,
}

/// Vertical space the legend takes below the plot.
#[must_use]
pub fn legend_height(panel: &PanelConfig, series: &[Series], panel_height: u32) -> u32 {
    let legend = &panel.legend;
    if !legend.show || legend.right_side {
        return 0;
    }
    if !legend.align_as_table {
        return INLINE_LEGEND_PX;
    }

    let rows = series
        .iter()
        .filter(|series| !series.hide_from_legend(legend.hide_empty, legend.hide_zero))
        .count();
    let rows = u32::try_from(rows).unwrap_or(u32::MAX);
    let total = TABLE_LEGEND_ROW_PX
        .saturating_mul(rows)
        .saturating_add(TABLE_LEGEND_HEADER_PX);
    total.min(panel_height / 2)
}

/// Builds the renderer-agnostic specification for one draw pass.
#[must_use]
pub fn build_plot_spec(input: &PlotInput<'_>) -> PlotSpecification {
    let panel = input.panel;
    let plot_height = input
        .panel_height
        .saturating_sub(legend_height(panel, input.series, input.panel_height));

    let series_options = series_options(panel, input.series);

    let mut series: Vec<StyledSeries> = input
        .series
        .iter()
        .map(|source| {
            let hidden = input.host.is_hidden(&source.alias);
            StyledSeries {
                alias: source.alias.clone(),
                color: source.color.clone(),
                data: if hidden {
                    Vec::new()
                } else {
                    source.plot_pairs(panel.null_point_mode)
                },
                yaxis: source.yaxis,
                zindex: source.zindex,
                stack: !hidden && series_options.stack,
                stats: source.stats,
            }
        })
        .collect();
    series.sort_by_key(|series| series.zindex);

    let (min, max) = (input.time_range.from_ms(), input.time_range.to_ms());
    let mut tick_request = TickPlanRequest::new(min, max, f64::from(input.width))
        .with_frequency(panel.xaxis.tick_frequency)
        .with_timezone(input.host.timezone);
    if let Some(offset) = panel.xaxis.tick_offset.as_deref() {
        tick_request = tick_request.with_offset(offset);
    }
    if let Some(format) = panel.xaxis.format.as_deref().filter(|format| !format.is_empty()) {
        tick_request = tick_request.with_custom_format(format);
    }
    let ticks = plan_time_ticks(&tick_request);

    let yaxes = assemble_axes(panel, input.series);
    let labelled_margin = |index: AxisIndex| {
        let shown = yaxes.iter().any(|axis| axis.index == index && axis.show);
        if shown && panel.yaxis(index.slot()).label_text().is_some() {
            AXIS_LABEL_MARGIN_PX
        } else {
            0
        }
    };
    let margin = GridMargin {
        left: labelled_margin(AxisIndex::Left),
        right: labelled_margin(AxisIndex::Right),
    };

    let (first_threshold, second_threshold) = panel.grid.thresholds();
    let grid = GridSpec {
        markings: build_threshold_markings(&first_threshold, &second_threshold),
        min_border_margin: 0,
        background_color: None,
        border_width: 0,
        hoverable: true,
        color: GRID_COLOR.to_owned(),
        margin,
    };

    let crosshair = (panel.tooltip.shared || input.host.shared_crosshair).then_some(SelectionMode::X);

    let spec = PlotSpecification {
        viewport: Viewport::new(input.width, plot_height),
        series,
        series_options,
        yaxes,
        xaxis: XAxisSpec {
            show: panel.xaxis.show,
            mode: AxisMode::Time,
            min,
            max,
            timezone: input.host.timezone,
            label: TIME_AXIS_LABEL.to_owned(),
            ticks,
        },
        grid,
        annotations: build_annotation_overlay(input.annotations),
        selection: SelectionSpec {
            mode: SelectionMode::X,
            color: SELECTION_COLOR.to_owned(),
        },
        crosshair,
    };

    debug!(
        series = spec.series.len(),
        axes = spec.yaxes.len(),
        ticks = spec.xaxis.ticks.ticks.len(),
        markings = spec.grid.markings.len(),
        plot_height,
        "plot specification assembled"
    );
    spec
}

fn series_options(panel: &PanelConfig, series: &[Series]) -> SeriesOptions {
    let mode = panel.stacking_mode();
    let bar_width = series
        .first()
        .and_then(|first| first.stats.time_step)
        .map_or(DEFAULT_BAR_WIDTH, |step| step / BAR_WIDTH_DIVISOR);

    SeriesOptions {
        stack: mode == StackMode::Stack,
        stack_percent: mode == StackMode::Percent,
        lines: LineOptions {
            show: panel.lines,
            zero: false,
            fill: panel.fill_alpha(),
            line_width: f64::from(panel.linewidth),
            steps: panel.stepped_line,
        },
        bars: BarOptions {
            show: panel.bars,
            fill: 1.0,
            bar_width,
            zero: false,
            line_width: 0.0,
        },
        points: PointOptions {
            show: panel.points,
            fill: 1.0,
            radius: if panel.points {
                f64::from(panel.pointradius)
            } else {
                UNHIGHLIGHTED_POINT_RADIUS
            },
        },
        shadow_size: 0.0,
    }
}

/// Legend values for one drawn series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesLegend {
    pub alias: String,
    pub yaxis: AxisIndex,
    pub precision: LegendPrecision,
    pub values: LegendValues,
}

/// Label text the host places beside a Y-axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLabel {
    pub position: AxisPosition,
    pub text: String,
}

/// What the legend must show after a draw pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegendUpdate {
    pub series: Vec<SeriesLegend>,
    pub axis_labels: SmallVec<[AxisLabel; 2]>,
}

/// Recomputes legend values from the precision the renderer actually used.
#[must_use]
pub fn build_legend_update(
    panel: &PanelConfig,
    spec: &PlotSpecification,
    rendered: &[RenderedAxis],
) -> LegendUpdate {
    let series = spec
        .series
        .iter()
        .map(|series| {
            let axis = rendered.iter().find(|axis| axis.index == series.yaxis);
            let precision = LegendPrecision::resolve(
                panel.decimals,
                axis.and_then(|axis| axis.tick_decimals),
                axis.and_then(|axis| axis.scaled_decimals),
            );
            let format = &panel.yaxis(series.yaxis.slot()).format;
            SeriesLegend {
                alias: series.alias.clone(),
                yaxis: series.yaxis,
                precision,
                values: format_legend_values(format, precision, &series.stats),
            }
        })
        .collect();

    let axis_labels = [
        (AxisIndex::Left, AxisPosition::Left),
        (AxisIndex::Right, AxisPosition::Right),
    ]
    .into_iter()
    .filter_map(|(index, position)| {
        panel.yaxis(index.slot()).label_text().map(|text| AxisLabel {
            position,
            text: text.to_owned(),
        })
    })
    .collect();

    LegendUpdate {
        series,
        axis_labels,
    }
}
