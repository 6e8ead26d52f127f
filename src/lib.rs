//! graph-panel: configuration engine for dashboard time-series graph panels.
//!
//! The crate turns series data, a panel configuration and a visible time range
//! into a renderer-agnostic plot specification. Drawing is delegated to a
//! `render::Renderer` backend.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{GraphEngine, PanelConfig, RenderInput, RenderOutcome, RenderRequest};
pub use error::{GraphError, GraphResult};
