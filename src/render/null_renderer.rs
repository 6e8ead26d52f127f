use crate::core::{AxisDecimals, AxisIndex};
use crate::error::GraphResult;
use crate::interaction::CrosshairPosition;
use crate::render::{PlotSpecification, RenderedAxes, RenderedAxis, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates the specification and derives linear tick precision the
/// way a canvas backend would, so legend formatting can be exercised end to end.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub render_count: usize,
    pub last_series_count: usize,
    pub last_spec: Option<PlotSpecification>,
    pub crosshair: Option<CrosshairPosition>,
}

impl Renderer for NullRenderer {
    fn render(&mut self, spec: &PlotSpecification) -> GraphResult<RenderedAxes> {
        spec.validate()?;
        self.render_count += 1;
        self.last_series_count = spec.series.len();
        self.last_spec = Some(spec.clone());

        let tick_count = 0.3 * f64::from(spec.viewport.height).sqrt();
        Ok(spec
            .yaxes
            .iter()
            .map(|axis| {
                let decimals = if axis.log_scale.is_some() {
                    None
                } else {
                    let observed = observed_range(spec, axis.index);
                    let min = axis.min.or(observed.map(|(min, _)| min));
                    let max = axis.max.or(observed.map(|(_, max)| max));
                    min.zip(max)
                        .and_then(|(min, max)| AxisDecimals::for_range(min, max, tick_count))
                };
                RenderedAxis {
                    index: axis.index,
                    tick_decimals: decimals.map(|decimals| decimals.tick_decimals),
                    scaled_decimals: decimals.map(|decimals| decimals.scaled_decimals),
                }
            })
            .collect())
    }

    fn set_crosshair(&mut self, position: CrosshairPosition) {
        self.crosshair = Some(position);
    }

    fn clear_crosshair(&mut self) {
        self.crosshair = None;
    }
}

fn observed_range(spec: &PlotSpecification, index: AxisIndex) -> Option<(f64, f64)> {
    spec.series
        .iter()
        .filter(|series| series.yaxis == index)
        .flat_map(|series| series.data.iter().filter_map(|(_, value)| *value))
        .filter(|value| value.is_finite())
        .fold(None, |range, value| match range {
            None => Some((value, value)),
            Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
        })
}
