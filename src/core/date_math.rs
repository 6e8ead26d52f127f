use chrono::{
    DateTime, Datelike, FixedOffset, Months, NaiveDate, NaiveTime, TimeDelta, TimeZone, Timelike,
};
use serde::{Deserialize, Serialize};

/// Calendar unit used for tick stepping and relative-date offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl CalendarUnit {
    /// Truncates `instant` to the start of this unit. Weeks start on Sunday.
    #[must_use]
    pub fn start_of(self, instant: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
        let offset = *instant.offset();
        let date = instant.date_naive();
        let time = instant.time();
        let (date, time) = match self {
            Self::Millisecond => {
                let millis = instant.timestamp_subsec_millis();
                (date, time.with_nanosecond(millis * 1_000_000)?)
            }
            Self::Second => (date, time.with_nanosecond(0)?),
            Self::Minute => (date, NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)?),
            Self::Hour => (date, NaiveTime::from_hms_opt(time.hour(), 0, 0)?),
            Self::Day => (date, NaiveTime::MIN),
            Self::Week => {
                let back = i64::from(date.weekday().num_days_from_sunday());
                (date.checked_sub_signed(TimeDelta::days(back))?, NaiveTime::MIN)
            }
            Self::Month => (date.with_day(1)?, NaiveTime::MIN),
            Self::Quarter => {
                let month0 = date.month0() - date.month0() % 3;
                (
                    NaiveDate::from_ymd_opt(date.year(), month0 + 1, 1)?,
                    NaiveTime::MIN,
                )
            }
            Self::Year => (NaiveDate::from_ymd_opt(date.year(), 1, 1)?, NaiveTime::MIN),
        };
        offset.from_local_datetime(&date.and_time(time)).single()
    }

    /// Adds `count` units (negative subtracts). Month-based units clamp to month end.
    #[must_use]
    pub fn add(self, instant: DateTime<FixedOffset>, count: i64) -> Option<DateTime<FixedOffset>> {
        let months = match self {
            Self::Month => Some(count),
            Self::Quarter => count.checked_mul(3),
            Self::Year => count.checked_mul(12),
            _ => None,
        };
        if let Some(months) = months {
            let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
            return if months >= 0 {
                instant.checked_add_months(magnitude)
            } else {
                instant.checked_sub_months(magnitude)
            };
        }

        let delta = match self {
            Self::Millisecond => TimeDelta::try_milliseconds(count)?,
            Self::Second => TimeDelta::try_seconds(count)?,
            Self::Minute => TimeDelta::try_minutes(count)?,
            Self::Hour => TimeDelta::try_hours(count)?,
            Self::Day => TimeDelta::try_days(count)?,
            Self::Week => TimeDelta::try_weeks(count)?,
            Self::Month | Self::Quarter | Self::Year => return None,
        };
        instant.checked_add_signed(delta)
    }

    fn from_math_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'y' => Some(Self::Year),
            'M' => Some(Self::Month),
            'w' => Some(Self::Week),
            'd' => Some(Self::Day),
            'h' => Some(Self::Hour),
            'm' => Some(Self::Minute),
            's' => Some(Self::Second),
            _ => None,
        }
    }
}

const MAX_AMOUNT_DIGITS: usize = 10;

/// Applies a relative-date expression such as `+1h`, `-2d/d` or `/w` to `instant`.
///
/// Whitespace is ignored. Returns `None` when the expression is malformed so the
/// caller can keep the unshifted instant.
#[must_use]
pub fn apply(expression: &str, instant: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let chars: Vec<char> = expression.chars().filter(|ch| !ch.is_whitespace()).collect();
    let mut result = instant;
    let mut index = 0;

    while index < chars.len() {
        let op = chars[index];
        index += 1;

        let digits_start = index;
        while index < chars.len() && chars[index].is_ascii_digit() {
            index += 1;
            if index - digits_start > MAX_AMOUNT_DIGITS {
                return None;
            }
        }
        let amount: i64 = if index == digits_start {
            1
        } else {
            chars[digits_start..index]
                .iter()
                .collect::<String>()
                .parse()
                .ok()?
        };

        let unit = CalendarUnit::from_math_symbol(*chars.get(index)?)?;
        index += 1;

        result = match op {
            '/' if amount == 1 => unit.start_of(result)?,
            '+' => unit.add(result, amount)?,
            '-' => unit.add(result, -amount)?,
            _ => return None,
        };
    }

    Some(result)
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset};

    use super::{CalendarUnit, apply};

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).expect("valid instant")
    }

    #[test]
    fn start_of_snaps_calendar_units() {
        let instant = at("2024-05-15T13:45:30.250Z");
        let cases = [
            (CalendarUnit::Second, "2024-05-15T13:45:30Z"),
            (CalendarUnit::Minute, "2024-05-15T13:45:00Z"),
            (CalendarUnit::Hour, "2024-05-15T13:00:00Z"),
            (CalendarUnit::Day, "2024-05-15T00:00:00Z"),
            (CalendarUnit::Week, "2024-05-12T00:00:00Z"),
            (CalendarUnit::Month, "2024-05-01T00:00:00Z"),
            (CalendarUnit::Quarter, "2024-04-01T00:00:00Z"),
            (CalendarUnit::Year, "2024-01-01T00:00:00Z"),
        ];
        for (unit, expected) in cases {
            assert_eq!(unit.start_of(instant), Some(at(expected)), "{unit:?}");
        }
    }

    #[test]
    fn start_of_respects_offset() {
        let instant = at("2024-05-15T01:30:00+02:00");
        assert_eq!(
            CalendarUnit::Day.start_of(instant),
            Some(at("2024-05-15T00:00:00+02:00"))
        );
    }

    #[test]
    fn month_addition_clamps_to_month_end() {
        let instant = at("2024-01-31T00:00:00Z");
        assert_eq!(
            CalendarUnit::Month.add(instant, 1),
            Some(at("2024-02-29T00:00:00Z"))
        );
        assert_eq!(
            CalendarUnit::Quarter.add(instant, -1),
            Some(at("2023-10-31T00:00:00Z"))
        );
    }

    #[test]
    fn expressions_chain_left_to_right() {
        let instant = at("2024-05-15T13:45:30Z");
        assert_eq!(apply("+6h", instant), Some(at("2024-05-15T19:45:30Z")));
        assert_eq!(apply("-1d/d", instant), Some(at("2024-05-14T00:00:00Z")));
        assert_eq!(apply(" + 30 m ", instant), Some(at("2024-05-15T14:15:30Z")));
        assert_eq!(apply("+h", instant), Some(at("2024-05-15T14:45:30Z")));
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        let instant = at("2024-05-15T13:45:30Z");
        assert_eq!(apply("6h", instant), None);
        assert_eq!(apply("+1q", instant), None);
        assert_eq!(apply("/2d", instant), None);
        assert_eq!(apply("+", instant), None);
        assert_eq!(apply("+12345678901h", instant), None);
    }
}
