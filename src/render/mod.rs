mod null_renderer;
mod plot_spec;

pub use null_renderer::NullRenderer;
pub use plot_spec::{
    AxisMode, AxisPosition, AxisSpec, AxisSpecs, BarOptions, GridMargin, GridSpec, LineOptions,
    PlotSpecification, PointOptions, SelectionMode, SelectionSpec, SeriesOptions, StyledSeries,
    XAxisSpec,
};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::AxisIndex;
use crate::error::GraphResult;
use crate::interaction::CrosshairPosition;

/// Precision a renderer settled on for one drawn Y-axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedAxis {
    pub index: AxisIndex,
    pub tick_decimals: Option<i32>,
    pub scaled_decimals: Option<i32>,
}

pub type RenderedAxes = SmallVec<[RenderedAxis; 2]>;

/// Contract implemented by any 2-D plotting backend.
///
/// Backends receive a fully materialized `PlotSpecification` and report the
/// axes they actually drew so legend precision can follow the current zoom.
pub trait Renderer {
    fn render(&mut self, spec: &PlotSpecification) -> GraphResult<RenderedAxes>;

    /// Moves the crosshair without redrawing the plot.
    fn set_crosshair(&mut self, _position: CrosshairPosition) {}

    fn clear_crosshair(&mut self) {}
}
