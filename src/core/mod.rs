pub mod annotations;
pub mod date_math;
pub mod legend;
pub mod log_scale;
pub mod series;
pub mod thresholds;
pub mod time_format;
pub mod time_ticks;
pub mod types;
pub mod value_format;

pub use annotations::{Annotation, AnnotationOverlay, AnnotationType, build_annotation_overlay};
pub use date_math::CalendarUnit;
pub use legend::{LegendPrecision, LegendValues, format_legend_values};
pub use log_scale::{LogScale, LogTransform, resolve_log_scale};
pub use series::{AxisIndex, NullPointMode, PlotPair, Sample, Series, SeriesStats};
pub use thresholds::{GridMarking, GridMarkings, MarkingRange, Threshold, build_threshold_markings};
pub use time_format::TimeLabelPattern;
pub use time_ticks::{
    Tick, TickFrequency, TickPlan, TickPlanRequest, TickStrategy, TimeLabelFormatter,
    plan_time_ticks,
};
pub use types::{DisplayTimezone, TimeRange, Viewport};
pub use value_format::{AxisDecimals, ValueFormat};
