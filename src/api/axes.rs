use tracing::trace;

use crate::api::panel_config::{PanelConfig, StackMode, YAxisConfig};
use crate::core::{AxisIndex, Series, ValueFormat, resolve_log_scale};
use crate::render::{AxisPosition, AxisSpec, AxisSpecs};

const PERCENT_STACK_MAX: f64 = 100.0;

/// Assembles the left axis and, when any series asks for it, the right axis.
///
/// Under percent stacking every axis max is pinned to 100 and ticks switch to
/// the `percent` format.
#[must_use]
pub fn assemble_axes(panel: &PanelConfig, series: &[Series]) -> AxisSpecs {
    let percent = panel.stacking_mode() == StackMode::Percent;
    let mut axes = AxisSpecs::new();

    let left = panel.yaxis(AxisIndex::Left.slot());
    let defaults = AxisSpec {
        index: AxisIndex::Left,
        position: AxisPosition::Left,
        show: left.show,
        min: left.min,
        max: if percent { Some(PERCENT_STACK_MAX) } else { left.max },
        log_base: left.log_base,
        log_scale: None,
        tick_format: left.format.clone(),
    };

    let wants_right = series.iter().any(|series| series.yaxis == AxisIndex::Right);
    let right = wants_right.then(|| {
        let config = panel.yaxis(AxisIndex::Right.slot());
        AxisSpec {
            index: AxisIndex::Right,
            position: AxisPosition::Right,
            show: config.show,
            min: config.min,
            max: if percent { Some(PERCENT_STACK_MAX) } else { config.max },
            log_base: config.log_base,
            tick_format: config.format.clone(),
            ..defaults.clone()
        }
    });

    axes.push(defaults);
    axes.extend(right);

    for axis in &mut axes {
        let config = panel.yaxis(axis.index.slot());
        finish_axis(axis, config, percent, series);
    }

    trace!(axis_count = axes.len(), percent, "y-axes assembled");
    axes
}

fn finish_axis(axis: &mut AxisSpec, config: &YAxisConfig, percent: bool, series: &[Series]) {
    let observed_max = series
        .iter()
        .filter(|series| series.yaxis == axis.index)
        .filter_map(|series| series.stats.max)
        .reduce(f64::max);
    axis.log_scale = resolve_log_scale(axis.log_base, axis.min, axis.max, observed_max);
    axis.tick_format = if percent {
        ValueFormat::Percent
    } else {
        config.format.clone()
    };
}

#[cfg(test)]
mod tests {
    use super::assemble_axes;
    use crate::api::panel_config::PanelConfig;
    use crate::core::{AxisIndex, Sample, Series, ValueFormat};
    use crate::render::AxisPosition;

    fn series_on(axis: AxisIndex, max: f64) -> Series {
        Series::new("s", vec![Sample::new(0.0, Some(1.0)), Sample::new(1.0, Some(max))])
            .with_yaxis(axis)
    }

    #[test]
    fn right_axis_only_when_requested() {
        let panel = PanelConfig::default();
        let axes = assemble_axes(&panel, &[series_on(AxisIndex::Left, 5.0)]);
        assert_eq!(axes.len(), 1);

        let axes = assemble_axes(
            &panel,
            &[series_on(AxisIndex::Left, 5.0), series_on(AxisIndex::Right, 9.0)],
        );
        assert_eq!(axes.len(), 2);
        assert_eq!(axes[1].position, AxisPosition::Right);
        assert_eq!(axes[1].index, AxisIndex::Right);
    }

    #[test]
    fn log_scale_uses_observed_max_per_axis() {
        let mut panel = PanelConfig::default();
        panel.yaxes[0].log_base = 10.0;
        let axes = assemble_axes(
            &panel,
            &[series_on(AxisIndex::Left, 50.0), series_on(AxisIndex::Right, 5_000.0)],
        );

        let left = axes[0].log_scale.as_ref().expect("left log scale");
        assert_eq!(left.ticks, vec![0.0, 1.0, 10.0, 100.0]);
        assert!(axes[1].log_scale.is_none());
    }

    #[test]
    fn percent_stacking_switches_tick_format() {
        let mut panel = PanelConfig::default();
        panel.stack = true;
        panel.percentage = true;
        panel.yaxes[0].format = ValueFormat::Bytes;
        let axes = assemble_axes(&panel, &[series_on(AxisIndex::Left, 3.0)]);
        assert_eq!(axes[0].tick_format, ValueFormat::Percent);
        assert_eq!(axes[0].max, Some(100.0));
        assert_eq!(axes[0].format_tick(42.0, Some(0), None), "42%");
    }

    #[test]
    fn tick_labels_use_the_axis_unit() {
        let mut panel = PanelConfig::default();
        panel.yaxes[0].format = ValueFormat::Bytes;
        let axes = assemble_axes(&panel, &[series_on(AxisIndex::Left, 3.0)]);
        assert_eq!(axes[0].format_tick(2_048.0, Some(1), None), "2.0 KiB");
    }
}
