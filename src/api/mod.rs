mod axes;
mod panel_config;
mod plot_builder;
mod static_image;

pub use axes::assemble_axes;
pub use panel_config::{
    GridConfig, HostContext, LegendConfig, PanelConfig, StackMode, TooltipConfig, XAxisConfig,
    YAxisConfig,
};
pub use plot_builder::{
    AxisLabel, LegendUpdate, PlotInput, SeriesLegend, build_legend_update, build_plot_spec,
    legend_height,
};
pub use static_image::{StaticImageRequest, build_static_image_request, unit_system};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{Annotation, Series, TimeRange};
use crate::error::{GraphError, GraphResult};
use crate::interaction::CrosshairEvent;
use crate::render::{PlotSpecification, Renderer};

/// Delay before the second pass when the legend sits on the right.
pub const SECOND_PASS_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SeriesPayload {
    pub series: Vec<Series>,
    /// `None` keeps the annotations of the previous payload.
    pub annotations: Option<Vec<Annotation>>,
}

/// Reference to an image rendered elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub url: String,
}

/// Data delivered by the fetch layer for one render trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderInput {
    Series(SeriesPayload),
    Image(ImagePayload),
}

/// Host element size; `height` is `None` when it could not be measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelGeometry {
    pub width: u32,
    pub height: Option<u32>,
}

impl PanelGeometry {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height: Some(height),
        }
    }
}

/// Host inputs for one render pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub panel: &'a PanelConfig,
    pub host: &'a HostContext,
    pub time_range: TimeRange,
    pub geometry: PanelGeometry,
}

/// Data retained between render triggers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RetainedData {
    Series(Vec<Series>),
    Image(String),
}

/// Snapshot carried from one render pass to the next.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderState {
    pub data: Option<RetainedData>,
    pub annotations: Vec<Annotation>,
    /// Legend side recorded by the last two-pass render.
    pub legend_right_side: Option<bool>,
}

impl RenderState {
    /// Folds an optional payload into the previous state.
    #[must_use]
    pub fn advance(self, input: Option<RenderInput>) -> Self {
        match input {
            None => self,
            Some(RenderInput::Series(payload)) => Self {
                data: Some(RetainedData::Series(payload.series)),
                annotations: payload.annotations.unwrap_or(self.annotations),
                ..self
            },
            Some(RenderInput::Image(payload)) => Self {
                data: Some(RetainedData::Image(payload.url)),
                ..self
            },
        }
    }

    /// Whether this pass must draw twice so a right-side legend can size itself.
    #[must_use]
    pub fn needs_second_pass(&self, right_side: bool) -> bool {
        right_side || self.legend_right_side.is_some_and(|last| last != right_side)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    ZeroWidth,
    HeightUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledRedraw {
    pub delay: Duration,
}

/// Result of handing one specification to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawReport {
    pub spec: PlotSpecification,
    /// `None` when the renderer failed and the previous chart stays visible.
    pub legend: Option<LegendUpdate>,
    /// Set on the final pass; hosts count it as a completed render.
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderOutcome {
    /// No data snapshot yet; the host should fetch.
    NeedsData,
    Aborted(AbortReason),
    StaticImage(StaticImageRequest),
    Drawn {
        report: DrawReport,
        /// Set when the host must call `run_scheduled_redraw` after the delay.
        redraw: Option<ScheduledRedraw>,
    },
}

#[derive(Debug, Clone)]
struct PendingRedraw {
    panel: PanelConfig,
    spec: PlotSpecification,
}

/// Graph panel engine: turns data snapshots into renderer draw passes.
pub struct GraphEngine<R: Renderer> {
    renderer: R,
    state: RenderState,
    pending: Option<PendingRedraw>,
}

impl<R: Renderer> GraphEngine<R> {
    #[must_use]
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            state: RenderState::default(),
            pending: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    #[must_use]
    pub fn has_scheduled_redraw(&self) -> bool {
        self.pending.is_some()
    }

    /// Runs one render trigger. `input == None` re-renders the retained data.
    pub fn render(&mut self, input: Option<RenderInput>, request: RenderRequest<'_>) -> RenderOutcome {
        let state = std::mem::take(&mut self.state).advance(input);
        self.pending = None;

        let Some(data) = &state.data else {
            debug!("render skipped: no data");
            self.state = state;
            return RenderOutcome::NeedsData;
        };
        if matches!(data, RetainedData::Series(series) if series.is_empty()) {
            debug!("render skipped: empty series list");
            self.state = state;
            return RenderOutcome::NeedsData;
        }

        if request.geometry.width == 0 {
            debug!("render aborted: zero width");
            self.state = state;
            return RenderOutcome::Aborted(AbortReason::ZeroWidth);
        }
        let Some(panel_height) = request.geometry.height else {
            warn!("render aborted: panel height unavailable");
            self.state = state;
            return RenderOutcome::Aborted(AbortReason::HeightUnavailable);
        };

        let series = match data {
            RetainedData::Series(series) => series.as_slice(),
            RetainedData::Image(url) => {
                let height =
                    panel_height.saturating_sub(legend_height(request.panel, &[], panel_height));
                let image =
                    build_static_image_request(url, request.panel, request.geometry.width, height);
                debug!(params = image.params.len(), "rendering static image fallback");
                self.state = state;
                return RenderOutcome::StaticImage(image);
            }
        };

        let spec = build_plot_spec(&PlotInput {
            panel: request.panel,
            host: request.host,
            series,
            annotations: &state.annotations,
            time_range: request.time_range,
            width: request.geometry.width,
            panel_height,
        });

        let right_side = request.panel.legend.right_side;
        let two_pass = state.needs_second_pass(right_side);
        let report = self.draw(request.panel, spec.clone(), !two_pass);

        let redraw = if two_pass {
            trace!(delay_ms = SECOND_PASS_DELAY.as_millis() as u64, "second pass scheduled");
            self.pending = Some(PendingRedraw {
                panel: request.panel.clone(),
                spec,
            });
            Some(ScheduledRedraw {
                delay: SECOND_PASS_DELAY,
            })
        } else {
            None
        };

        self.state = RenderState {
            legend_right_side: if two_pass {
                Some(right_side)
            } else {
                state.legend_right_side
            },
            ..state
        };
        RenderOutcome::Drawn { report, redraw }
    }

    /// Draws the scheduled second pass; `None` when a newer render superseded it.
    pub fn run_scheduled_redraw(&mut self) -> Option<DrawReport> {
        let pending = self.pending.take()?;
        Some(self.draw(&pending.panel, pending.spec, true))
    }

    /// Applies a crosshair event from another panel; returns whether the renderer was touched.
    pub fn handle_crosshair_event(&mut self, event: &CrosshairEvent, host: &HostContext) -> bool {
        match *event {
            CrosshairEvent::Cleared { .. } => {
                self.renderer.clear_crosshair();
                true
            }
            CrosshairEvent::Moved { source, position } => {
                if !host.shared_crosshair || source == host.panel_id {
                    return false;
                }
                self.renderer.set_crosshair(position);
                true
            }
        }
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    fn draw(&mut self, panel: &PanelConfig, spec: PlotSpecification, completed: bool) -> DrawReport {
        let legend = match self.renderer.render(&spec) {
            Ok(rendered) => Some(build_legend_update(panel, &spec, &rendered)),
            Err(err) => {
                warn!(error = %err, "renderer failed; previous chart stays visible");
                None
            }
        };
        DrawReport {
            spec,
            legend,
            completed,
        }
    }
}

/// Converts an x-axis selection in epoch milliseconds to a UTC time range.
pub fn selection_to_time_range(from_ms: f64, to_ms: f64) -> GraphResult<TimeRange> {
    if !from_ms.is_finite() || !to_ms.is_finite() {
        return Err(GraphError::InvalidData(
            "selection bounds must be finite".to_owned(),
        ));
    }
    let range = TimeRange::from_millis(from_ms.round() as i64, to_ms.round() as i64);
    if range.from.is_none() || range.to.is_none() {
        return Err(GraphError::InvalidData(
            "selection bounds are outside the supported time range".to_owned(),
        ));
    }
    Ok(range)
}
