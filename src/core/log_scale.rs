use serde::{Deserialize, Serialize};
use tracing::warn;

/// Upper bound on ladder entries. Base 2 reaches `f64::MAX` well below it.
pub const MAX_LOG_TICKS: usize = 2_048;

/// Added before taking the logarithm so zero values stay finite.
pub const LOG_ZERO_OFFSET: f64 = 0.1;

/// Forward/inverse mapping for a logarithmic axis.
///
/// Base 10 maps with the natural logarithm directly; every other base
/// divides by `ln(base)` to change basis. The inverse is always `base^v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogTransform {
    pub base: f64,
}

impl LogTransform {
    #[must_use]
    pub fn new(base: f64) -> Self {
        Self { base }
    }

    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        let shifted = (value + LOG_ZERO_OFFSET).ln();
        if self.base == 10.0 {
            shifted
        } else {
            shifted / self.base.ln()
        }
    }

    #[must_use]
    pub fn inverse(self, value: f64) -> f64 {
        self.base.powf(value)
    }
}

/// Log scaling resolved for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogScale {
    pub min: f64,
    /// `[0, 1, base, base^2, ...]`, ending at the first power above the effective max.
    pub ticks: Vec<f64>,
    pub transform: LogTransform,
}

/// Resolves log scaling for an axis, or `None` when `log_base <= 1` (linear).
///
/// The effective max is the configured max, else the largest observed series
/// value on the axis, else `f64::MAX`. The effective min is the configured min
/// or `0`.
#[must_use]
pub fn resolve_log_scale(
    log_base: f64,
    configured_min: Option<f64>,
    configured_max: Option<f64>,
    observed_max: Option<f64>,
) -> Option<LogScale> {
    if log_base.is_nan() || log_base <= 1.0 {
        return None;
    }

    let max = configured_max.or(observed_max).unwrap_or(f64::MAX);
    Some(LogScale {
        min: configured_min.unwrap_or(0.0),
        ticks: log_tick_ladder(log_base, max),
        transform: LogTransform::new(log_base),
    })
}

/// Builds `[0, 1, base, base^2, ...]` until a power strictly exceeds `max`.
///
/// Bases close to 1 would need millions of powers; the ladder stops at
/// [`MAX_LOG_TICKS`] entries instead.
#[must_use]
pub fn log_tick_ladder(base: f64, max: f64) -> Vec<f64> {
    let mut ticks = vec![0.0, 1.0];
    if base.is_nan() || base <= 1.0 {
        return ticks;
    }

    let mut next = 1.0;
    loop {
        next *= base;
        ticks.push(next);
        if next > max || !next.is_finite() || max.is_nan() {
            break;
        }
        if ticks.len() >= MAX_LOG_TICKS {
            warn!(base, max, count = ticks.len(), "log tick ladder hit the tick cap");
            break;
        }
    }
    ticks
}
