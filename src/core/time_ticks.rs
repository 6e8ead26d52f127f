use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::date_math::{self, CalendarUnit};
use crate::core::time_format::TimeLabelPattern;
use crate::core::types::{
    DisplayTimezone, MILLIS_PER_SECOND, ONE_DAY_MS, ONE_YEAR_MS, datetime_to_millis,
    millis_to_datetime,
};
use crate::error::{GraphError, GraphResult};

/// Auto mode asks for one tick per this many pixels of axis width.
pub const AUTO_TICK_SPACING_PX: f64 = 100.0;

/// Upper bound on generated ticks; protects against fine frequencies over wide ranges.
pub const MAX_GENERATED_TICKS: usize = 10_000;

const SECOND_MS: f64 = 1_000.0;
const MINUTE_MS: f64 = 60.0 * SECOND_MS;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;
const MONTH_MS: f64 = 30.0 * DAY_MS;
const QUARTER_MS: f64 = 3.0 * MONTH_MS;
const YEAR_MS: f64 = 365.2425 * DAY_MS;

/// Tick-frequency selector; serialized as the dashboard integer code (0 = auto).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TickFrequency {
    #[default]
    Auto,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Quarters,
    Years,
}

impl TickFrequency {
    #[must_use]
    pub fn calendar_unit(self) -> Option<CalendarUnit> {
        match self {
            Self::Auto => None,
            Self::Milliseconds => Some(CalendarUnit::Millisecond),
            Self::Seconds => Some(CalendarUnit::Second),
            Self::Minutes => Some(CalendarUnit::Minute),
            Self::Hours => Some(CalendarUnit::Hour),
            Self::Days => Some(CalendarUnit::Day),
            Self::Weeks => Some(CalendarUnit::Week),
            Self::Months => Some(CalendarUnit::Month),
            Self::Quarters => Some(CalendarUnit::Quarter),
            Self::Years => Some(CalendarUnit::Year),
        }
    }

    /// Only day-and-larger frequencies snap the first tick to the unit start.
    #[must_use]
    fn snaps_to_unit_start(self) -> bool {
        matches!(
            self,
            Self::Days | Self::Weeks | Self::Months | Self::Quarters | Self::Years
        )
    }
}

impl TryFrom<u8> for TickFrequency {
    type Error = GraphError;

    fn try_from(code: u8) -> GraphResult<Self> {
        Ok(match code {
            0 => Self::Auto,
            1 => Self::Milliseconds,
            2 => Self::Seconds,
            3 => Self::Minutes,
            4 => Self::Hours,
            5 => Self::Days,
            6 => Self::Weeks,
            7 => Self::Months,
            8 => Self::Quarters,
            9 => Self::Years,
            other => {
                return Err(GraphError::InvalidConfig(format!(
                    "tick frequency code must be in 0..=9, got {other}"
                )));
            }
        })
    }
}

impl From<TickFrequency> for u8 {
    fn from(value: TickFrequency) -> Self {
        match value {
            TickFrequency::Auto => 0,
            TickFrequency::Milliseconds => 1,
            TickFrequency::Seconds => 2,
            TickFrequency::Minutes => 3,
            TickFrequency::Hours => 4,
            TickFrequency::Days => 5,
            TickFrequency::Weeks => 6,
            TickFrequency::Months => 7,
            TickFrequency::Quarters => 8,
            TickFrequency::Years => 9,
        }
    }
}

/// One labeled x-axis position, in epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub value: f64,
    pub label: String,
}

/// Shared label function for every tick of one x-axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeLabelFormatter {
    pub pattern: TimeLabelPattern,
    pub timezone: DisplayTimezone,
}

impl TimeLabelFormatter {
    #[must_use]
    pub fn format(&self, millis: f64) -> String {
        self.pattern.format(millis, self.timezone)
    }
}

/// Picks the auto label pattern from the estimated seconds per tick.
///
/// Unknown bounds or a non-positive tick count fall back to `HH:mm`.
#[must_use]
pub fn auto_label_pattern(bounds: Option<(f64, f64)>, tick_count: f64) -> &'static str {
    let Some((min, max)) = bounds else {
        return TimeLabelPattern::TIME_MINUTES;
    };
    if tick_count.is_nan() || tick_count <= 0.0 {
        return TimeLabelPattern::TIME_MINUTES;
    }

    let range = max - min;
    let sec_per_tick = (range / tick_count) / MILLIS_PER_SECOND;

    if sec_per_tick <= 45.0 {
        TimeLabelPattern::TIME_SECONDS
    } else if sec_per_tick <= 7_200.0 || range <= ONE_DAY_MS {
        TimeLabelPattern::TIME_MINUTES
    } else if sec_per_tick <= 80_000.0 {
        TimeLabelPattern::MONTH_DAY_TIME
    } else if sec_per_tick <= 2_419_200.0 || range <= ONE_YEAR_MS {
        TimeLabelPattern::MONTH_DAY
    } else {
        TimeLabelPattern::YEAR_MONTH
    }
}

/// How the renderer should obtain x-axis ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TickStrategy {
    /// Continuous-time ticks, roughly `tick_count` across the axis.
    Auto { tick_count: f64 },
    /// One tick per calendar unit starting at a snapped (and optionally offset) instant.
    Calendar { unit: CalendarUnit },
}

/// Inputs for one x-axis tick plan.
#[derive(Debug, Clone, PartialEq)]
pub struct TickPlanRequest<'a> {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub pixel_width: f64,
    pub frequency: TickFrequency,
    pub offset: Option<&'a str>,
    pub custom_format: Option<&'a str>,
    pub timezone: DisplayTimezone,
}

impl<'a> TickPlanRequest<'a> {
    #[must_use]
    pub fn new(min: Option<f64>, max: Option<f64>, pixel_width: f64) -> Self {
        Self {
            min,
            max,
            pixel_width,
            frequency: TickFrequency::Auto,
            offset: None,
            custom_format: None,
            timezone: DisplayTimezone::Utc,
        }
    }

    #[must_use]
    pub fn with_frequency(mut self, frequency: TickFrequency) -> Self {
        self.frequency = frequency;
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: &'a str) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_custom_format(mut self, format: &'a str) -> Self {
        self.custom_format = Some(format);
        self
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: DisplayTimezone) -> Self {
        self.timezone = timezone;
        self
    }

    fn bounds(&self) -> Option<(f64, f64)> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min.is_finite() && max.is_finite() => Some((min, max)),
            _ => None,
        }
    }
}

/// Result of tick planning: strategy, materialized ticks and the shared formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickPlan {
    pub strategy: TickStrategy,
    /// Empty while the range is still unknown; the renderer then generates ticks itself.
    pub ticks: Vec<Tick>,
    pub formatter: TimeLabelFormatter,
}

/// Plans x-axis ticks and labels for the visible range.
#[must_use]
pub fn plan_time_ticks(request: &TickPlanRequest<'_>) -> TickPlan {
    let bounds = request.bounds();

    let Some(unit) = request.frequency.calendar_unit() else {
        let tick_count = request.pixel_width / AUTO_TICK_SPACING_PX;
        let formatter = resolve_formatter(request, bounds, tick_count);
        let ticks = bounds
            .map(|(min, max)| continuous_time_ticks(min, max, tick_count, request.timezone))
            .unwrap_or_default()
            .into_iter()
            .map(|value| Tick {
                label: formatter.format(value),
                value,
            })
            .collect();
        return TickPlan {
            strategy: TickStrategy::Auto { tick_count },
            ticks,
            formatter,
        };
    };

    let instants = bounds
        .map(|(min, max)| calendar_instants(request, unit, min, max))
        .unwrap_or_default();
    let formatter = resolve_formatter(request, bounds, instants.len() as f64);
    let ticks = instants
        .into_iter()
        .map(|value| Tick {
            label: formatter.format(value),
            value,
        })
        .collect();

    TickPlan {
        strategy: TickStrategy::Calendar { unit },
        ticks,
        formatter,
    }
}

fn resolve_formatter(
    request: &TickPlanRequest<'_>,
    bounds: Option<(f64, f64)>,
    tick_count: f64,
) -> TimeLabelFormatter {
    let pattern = match request.custom_format.filter(|format| !format.is_empty()) {
        Some(custom) => TimeLabelPattern::new(custom),
        None => TimeLabelPattern::new(auto_label_pattern(bounds, tick_count)),
    };
    TimeLabelFormatter {
        pattern,
        timezone: request.timezone,
    }
}

fn calendar_instants(
    request: &TickPlanRequest<'_>,
    unit: CalendarUnit,
    min: f64,
    max: f64,
) -> Vec<f64> {
    let Some(mut start) = millis_to_datetime(min, request.timezone) else {
        return Vec::new();
    };
    if request.frequency.snaps_to_unit_start() {
        start = unit.start_of(start).unwrap_or(start);
    }
    if let Some(offset) = request.offset.filter(|offset| !offset.trim().is_empty()) {
        match date_math::apply(offset, start) {
            Some(shifted) => start = shifted,
            None => warn!(offset, "ignoring malformed tick offset expression"),
        }
    }

    let mut instants = Vec::new();
    let mut step: i64 = 0;
    loop {
        let Some(current) = unit.add(start, step) else {
            break;
        };
        let value = datetime_to_millis(current);
        instants.push(value);
        step += 1;

        if value >= max && instants.len() >= 2 {
            break;
        }
        if instants.len() >= MAX_GENERATED_TICKS {
            warn!(
                ?unit,
                count = instants.len(),
                "calendar tick generation hit the tick cap"
            );
            break;
        }
    }
    debug!(?unit, count = instants.len(), "planned calendar ticks");
    instants
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ContinuousUnit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl ContinuousUnit {
    fn size_ms(self) -> f64 {
        match self {
            Self::Second => SECOND_MS,
            Self::Minute => MINUTE_MS,
            Self::Hour => HOUR_MS,
            Self::Day => DAY_MS,
            Self::Month => MONTH_MS,
            Self::Year => YEAR_MS,
        }
    }
}

const CONTINUOUS_TICK_SIZES: &[(f64, ContinuousUnit)] = &[
    (1.0, ContinuousUnit::Second),
    (2.0, ContinuousUnit::Second),
    (5.0, ContinuousUnit::Second),
    (10.0, ContinuousUnit::Second),
    (30.0, ContinuousUnit::Second),
    (1.0, ContinuousUnit::Minute),
    (2.0, ContinuousUnit::Minute),
    (5.0, ContinuousUnit::Minute),
    (10.0, ContinuousUnit::Minute),
    (30.0, ContinuousUnit::Minute),
    (1.0, ContinuousUnit::Hour),
    (2.0, ContinuousUnit::Hour),
    (4.0, ContinuousUnit::Hour),
    (8.0, ContinuousUnit::Hour),
    (12.0, ContinuousUnit::Hour),
    (1.0, ContinuousUnit::Day),
    (2.0, ContinuousUnit::Day),
    (3.0, ContinuousUnit::Day),
    (0.25, ContinuousUnit::Month),
    (0.5, ContinuousUnit::Month),
    (1.0, ContinuousUnit::Month),
    (2.0, ContinuousUnit::Month),
    (3.0, ContinuousUnit::Month),
    (6.0, ContinuousUnit::Month),
    (1.0, ContinuousUnit::Year),
];

fn select_continuous_size(delta: f64) -> (f64, ContinuousUnit) {
    let mut selected = CONTINUOUS_TICK_SIZES[CONTINUOUS_TICK_SIZES.len() - 1];
    for pair in CONTINUOUS_TICK_SIZES.windows(2) {
        let (size, unit) = pair[0];
        let (next_size, next_unit) = pair[1];
        if delta < (size * unit.size_ms() + next_size * next_unit.size_ms()) / 2.0 {
            selected = pair[0];
            break;
        }
    }

    if selected.1 == ContinuousUnit::Year {
        let years = delta / YEAR_MS;
        let magnitude = 10f64.powf(years.log10().floor());
        let norm = years / magnitude;
        let nice = if norm < 1.5 {
            1.0
        } else if norm < 3.0 {
            2.0
        } else if norm < 7.5 {
            5.0
        } else {
            10.0
        };
        selected.0 = (nice * magnitude).max(1.0);
    }
    selected
}

fn floor_in_base(value: f64, base: f64) -> f64 {
    base * (value / base).floor()
}

/// Continuous time ticks over `[min, max]`, roughly `tick_count` of them.
///
/// Sizes follow the 1s..1y ladder; the first tick is snapped to the unit
/// boundary at or before `min` and stepping continues until `max` is reached.
/// At least two ticks are produced.
#[must_use]
pub fn continuous_time_ticks(
    min: f64,
    max: f64,
    tick_count: f64,
    timezone: DisplayTimezone,
) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || tick_count.is_nan() || tick_count <= 0.0 {
        return Vec::new();
    }

    let delta = (max - min).abs() / tick_count;
    let (size, unit) = select_continuous_size(delta.max(1.0));
    let step = size * unit.size_ms();

    let Some(first) =
        millis_to_datetime(min, timezone).and_then(|start| snap_first_tick(start, size, unit, step))
    else {
        return Vec::new();
    };

    let mut ticks = Vec::new();
    let mut current = first;
    loop {
        let value = datetime_to_millis(current);
        if ticks.last().is_some_and(|last| *last >= value) {
            break;
        }
        ticks.push(value);
        if (value >= max && ticks.len() >= 2) || ticks.len() >= MAX_GENERATED_TICKS {
            break;
        }
        let Some(next) = next_continuous_tick(current, value, size, unit, step) else {
            break;
        };
        current = next;
    }
    ticks
}

fn snap_first_tick(
    start: DateTime<FixedOffset>,
    size: f64,
    unit: ContinuousUnit,
    step: f64,
) -> Option<DateTime<FixedOffset>> {
    let mut year = start.year();
    let mut month0 = start.month0();
    let mut day = start.day();
    let mut hour = start.hour();
    let mut minute = start.minute();
    let mut second = start.second();

    match unit {
        ContinuousUnit::Second => second = floor_in_base(f64::from(second), size) as u32,
        ContinuousUnit::Minute => minute = floor_in_base(f64::from(minute), size) as u32,
        ContinuousUnit::Hour => hour = floor_in_base(f64::from(hour), size) as u32,
        ContinuousUnit::Month => month0 = floor_in_base(f64::from(month0), size) as u32,
        ContinuousUnit::Year => year = floor_in_base(f64::from(year), size) as i32,
        ContinuousUnit::Day => {}
    }

    if step >= MINUTE_MS {
        second = 0;
    }
    if step >= HOUR_MS {
        minute = 0;
    }
    if step >= DAY_MS {
        hour = 0;
    }
    if step >= DAY_MS * 4.0 {
        day = 1;
    }
    if step >= MONTH_MS * 2.0 {
        month0 = floor_in_base(f64::from(month0), 3.0) as u32;
    }
    if step >= QUARTER_MS * 2.0 {
        month0 = floor_in_base(f64::from(month0), 6.0) as u32;
    }
    if step >= YEAR_MS {
        month0 = 0;
    }

    let date = NaiveDate::from_ymd_opt(year, month0 + 1, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, month0 + 1, 1))?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    start.offset().from_local_datetime(&date.and_time(time)).single()
}

fn next_continuous_tick(
    current: DateTime<FixedOffset>,
    value: f64,
    size: f64,
    unit: ContinuousUnit,
    step: f64,
) -> Option<DateTime<FixedOffset>> {
    let timezone_offset = current.offset().local_minus_utc();
    let timezone = DisplayTimezone::FixedOffsetSeconds(timezone_offset);
    match unit {
        ContinuousUnit::Month if size < 1.0 => {
            let month_start = CalendarUnit::Month.start_of(current)?;
            let next_month = CalendarUnit::Month.add(month_start, 1)?;
            let month_len = datetime_to_millis(next_month) - datetime_to_millis(month_start);
            let advanced = millis_to_datetime(value + month_len * size, timezone)?;
            CalendarUnit::Day.start_of(advanced)
        }
        ContinuousUnit::Month => CalendarUnit::Month.add(current, size as i64),
        ContinuousUnit::Year => CalendarUnit::Year.add(current, size as i64),
        _ => millis_to_datetime(value + step, timezone),
    }
}
