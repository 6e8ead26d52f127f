use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit format applied to axis ticks and legend values.
///
/// Unknown names are kept as `Custom` and render like `None`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueFormat {
    None,
    #[default]
    Short,
    Percent,
    Bytes,
    Bits,
    BitsPerSecond,
    BytesPerSecond,
    PacketsPerSecond,
    Joule,
    Watt,
    ElectronVolt,
    Milliseconds,
    Seconds,
    Custom(String),
}

impl ValueFormat {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::None => "none",
            Self::Short => "short",
            Self::Percent => "percent",
            Self::Bytes => "bytes",
            Self::Bits => "bits",
            Self::BitsPerSecond => "bps",
            Self::BytesPerSecond => "Bps",
            Self::PacketsPerSecond => "pps",
            Self::Joule => "joule",
            Self::Watt => "watt",
            Self::ElectronVolt => "ev",
            Self::Milliseconds => "ms",
            Self::Seconds => "s",
            Self::Custom(name) => name,
        }
    }

    /// Formats `value` with `decimals` digits; `scaled_decimals` drives precision
    /// once a value is scaled into a larger unit.
    #[must_use]
    pub fn format(&self, value: f64, decimals: Option<i32>, scaled_decimals: Option<i32>) -> String {
        match self {
            Self::None | Self::Custom(_) => to_fixed(value, decimals),
            Self::Percent => format!("{}%", to_fixed(value, decimals)),
            Self::Short => scaled_units(
                value,
                decimals,
                scaled_decimals,
                1000.0,
                &["", " K", " Mil", " Bil", " Tri", " Quadr", " Quint", " Sext", " Sept"],
            ),
            Self::Bytes => scaled_units(
                value,
                decimals,
                scaled_decimals,
                1024.0,
                &[" B", " KiB", " MiB", " GiB", " TiB", " PiB", " EiB", " ZiB", " YiB"],
            ),
            Self::Bits => scaled_units(
                value,
                decimals,
                scaled_decimals,
                1024.0,
                &[" b", " Kib", " Mib", " Gib", " Tib", " Pib", " Eib", " Zib", " Yib"],
            ),
            Self::BitsPerSecond => scaled_units(
                value,
                decimals,
                scaled_decimals,
                1000.0,
                &[" bps", " Kbps", " Mbps", " Gbps", " Tbps", " Pbps", " Ebps", " Zbps", " Ybps"],
            ),
            Self::BytesPerSecond => scaled_units(
                value,
                decimals,
                scaled_decimals,
                1000.0,
                &[" Bps", " KBs", " MBs", " GBs", " TBs", " PBs", " EBs", " ZBs", " YBs"],
            ),
            Self::PacketsPerSecond => scaled_units(
                value,
                decimals,
                scaled_decimals,
                1000.0,
                &[" pps", " Kpps", " Mpps", " Gpps", " Tpps", " Ppps", " Epps", " Zpps", " Ypps"],
            ),
            Self::Joule => scaled_units(
                value,
                decimals,
                scaled_decimals,
                1000.0,
                &[" J", " kJ", " MJ", " GJ", " TJ", " PJ", " EJ", " ZJ", " YJ"],
            ),
            Self::Watt => scaled_units(
                value,
                decimals,
                scaled_decimals,
                1000.0,
                &[" W", " kW", " MW", " GW", " TW", " PW", " EW", " ZW", " YW"],
            ),
            Self::ElectronVolt => scaled_units(
                value,
                decimals,
                scaled_decimals,
                1000.0,
                &[" eV", " keV", " MeV", " GeV", " TeV", " PeV", " EeV", " ZeV", " YeV"],
            ),
            Self::Milliseconds => format_milliseconds(value, decimals, scaled_decimals),
            Self::Seconds => format_seconds(value, decimals, scaled_decimals),
        }
    }
}

impl From<String> for ValueFormat {
    fn from(name: String) -> Self {
        match name.as_str() {
            "none" => Self::None,
            "short" => Self::Short,
            "percent" => Self::Percent,
            "bytes" => Self::Bytes,
            "bits" => Self::Bits,
            "bps" => Self::BitsPerSecond,
            "Bps" => Self::BytesPerSecond,
            "pps" => Self::PacketsPerSecond,
            "joule" => Self::Joule,
            "watt" => Self::Watt,
            "ev" => Self::ElectronVolt,
            "ms" => Self::Milliseconds,
            "s" => Self::Seconds,
            _ => Self::Custom(name),
        }
    }
}

impl From<&str> for ValueFormat {
    fn from(name: &str) -> Self {
        Self::from(name.to_owned())
    }
}

impl From<ValueFormat> for String {
    fn from(format: ValueFormat) -> Self {
        format.name().to_owned()
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rounds half toward positive infinity, like dashboard number rounding.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn plain_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }
    format!("{value}")
}

/// Largest fraction-digit count `to_fixed` honours.
pub const MAX_FIXED_DECIMALS: i32 = 20;

/// Formats with exactly `decimals` fraction digits (padding with zeros),
/// or the value's own precision when `decimals` is unknown.
///
/// `decimals` above [`MAX_FIXED_DECIMALS`] are clamped.
#[must_use]
pub fn to_fixed(value: f64, decimals: Option<i32>) -> String {
    let decimals = decimals.map(|decimals| decimals.min(MAX_FIXED_DECIMALS));
    let factor = match decimals {
        Some(decimals) if decimals != 0 => 10f64.powi(decimals.max(0)),
        _ => 1.0,
    };
    let formatted = plain_number(round_half_up(value * factor) / factor);

    if formatted.contains('e') || value == 0.0 || !value.is_finite() {
        return formatted;
    }

    if let Some(decimals) = decimals.filter(|decimals| *decimals > 0) {
        let precision = formatted
            .find('.')
            .map_or(0, |position| formatted.len() - position - 1);
        let wanted = decimals as usize;
        if precision < wanted {
            let mut padded = formatted;
            if precision == 0 {
                padded.push('.');
            }
            padded.extend(std::iter::repeat_n('0', wanted - precision));
            return padded;
        }
    }
    formatted
}

fn to_fixed_scaled(
    value: f64,
    decimals: Option<i32>,
    scaled_decimals: Option<i32>,
    additional_decimals: i32,
    suffix: &str,
) -> String {
    match scaled_decimals {
        Some(scaled) => format!("{}{suffix}", to_fixed(value, Some(scaled + additional_decimals))),
        None => format!("{}{suffix}", to_fixed(value, decimals)),
    }
}

fn scaled_units(
    value: f64,
    decimals: Option<i32>,
    scaled_decimals: Option<i32>,
    factor: f64,
    suffixes: &[&str],
) -> String {
    let mut size = value;
    let mut steps = 0usize;
    while size.abs() >= factor {
        steps += 1;
        size /= factor;
        if steps >= suffixes.len() {
            return "NA".to_owned();
        }
    }

    let decimals = match scaled_decimals {
        Some(scaled) if steps > 0 => Some(scaled + 3 * steps as i32),
        _ => decimals,
    };
    format!("{}{}", to_fixed(size, decimals), suffixes[steps])
}

fn format_milliseconds(value: f64, decimals: Option<i32>, scaled_decimals: Option<i32>) -> String {
    let magnitude = value.abs();
    if magnitude < 1_000.0 {
        format!("{} ms", to_fixed(value, decimals))
    } else if magnitude < 60_000.0 {
        to_fixed_scaled(value / 1_000.0, decimals, scaled_decimals, 3, " s")
    } else if magnitude < 3_600_000.0 {
        to_fixed_scaled(value / 60_000.0, decimals, scaled_decimals, 5, " min")
    } else if magnitude < 86_400_000.0 {
        to_fixed_scaled(value / 3_600_000.0, decimals, scaled_decimals, 7, " hour")
    } else if magnitude < 31_536_000_000.0 {
        to_fixed_scaled(value / 86_400_000.0, decimals, scaled_decimals, 8, " day")
    } else {
        to_fixed_scaled(value / 31_536_000_000.0, decimals, scaled_decimals, 10, " year")
    }
}

fn format_seconds(value: f64, decimals: Option<i32>, scaled_decimals: Option<i32>) -> String {
    let magnitude = value.abs();
    if magnitude < 60.0 {
        format!("{} s", to_fixed(value, decimals))
    } else if magnitude < 3_600.0 {
        to_fixed_scaled(value / 60.0, decimals, scaled_decimals, 1, " min")
    } else if magnitude < 86_400.0 {
        to_fixed_scaled(value / 3_600.0, decimals, scaled_decimals, 4, " hour")
    } else if magnitude < 604_800.0 {
        to_fixed_scaled(value / 86_400.0, decimals, scaled_decimals, 5, " day")
    } else if magnitude < 31_536_000.0 {
        to_fixed_scaled(value / 604_800.0, decimals, scaled_decimals, 6, " week")
    } else {
        to_fixed_scaled(value / 3.155_69e7, decimals, scaled_decimals, 7, " year")
    }
}

/// Tick precision a linear axis renders with for a given range and tick count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisDecimals {
    pub tick_size: f64,
    pub tick_decimals: i32,
    pub scaled_decimals: i32,
}

impl AxisDecimals {
    /// Nice-number tick size (1, 2, 2.5, 5, 10 times a power of ten) for `(max - min) / tick_count`.
    #[must_use]
    pub fn for_range(min: f64, max: f64, tick_count: f64) -> Option<Self> {
        let delta = (max - min) / tick_count;
        if !delta.is_finite() || delta <= 0.0 {
            return None;
        }

        let mut dec = -(delta.log10().floor()) as i32;
        let magnitude = 10f64.powi(-dec);
        let norm = delta / magnitude;

        let size = if norm < 1.5 {
            1.0
        } else if norm < 3.0 {
            if norm > 2.25 {
                dec += 1;
                2.5
            } else {
                2.0
            }
        } else if norm < 7.5 {
            5.0
        } else {
            10.0
        };
        let tick_size = size * magnitude;
        let tick_decimals = dec.max(0);
        let scaled_decimals = tick_decimals - tick_size.log10().floor() as i32;

        Some(Self {
            tick_size,
            tick_decimals,
            scaled_decimals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisDecimals, MAX_FIXED_DECIMALS, ValueFormat, to_fixed};

    #[test]
    fn to_fixed_pads_and_rounds() {
        assert_eq!(to_fixed(1.5, Some(2)), "1.50");
        assert_eq!(to_fixed(2.0, Some(1)), "2.0");
        assert_eq!(to_fixed(1.23456, Some(2)), "1.23");
        assert_eq!(to_fixed(0.125, Some(2)), "0.13");
        assert_eq!(to_fixed(12.0, None), "12");
        assert_eq!(to_fixed(12.345, Some(0)), "12");
        assert_eq!(to_fixed(0.0, Some(3)), "0");
    }

    #[test]
    fn short_scales_by_thousands() {
        let short = ValueFormat::Short;
        assert_eq!(short.format(999.0, Some(0), None), "999");
        assert_eq!(short.format(1_500.0, Some(1), None), "1.5 K");
        assert_eq!(short.format(2_500_000.0, Some(0), Some(0)), "2.500000 Mil");
    }

    #[test]
    fn bytes_scale_by_1024() {
        assert_eq!(ValueFormat::Bytes.format(2_048.0, Some(0), None), "2 KiB");
        assert_eq!(ValueFormat::Bits.format(512.0, None, None), "512 b");
    }

    #[test]
    fn overflowing_scale_reports_na() {
        assert_eq!(ValueFormat::Bytes.format(1e30, None, None), "NA");
    }

    #[test]
    fn time_formats_switch_units() {
        assert_eq!(ValueFormat::Milliseconds.format(250.0, Some(0), None), "250 ms");
        assert_eq!(ValueFormat::Milliseconds.format(1_500.0, Some(1), None), "1.5 s");
        assert_eq!(ValueFormat::Seconds.format(90.0, Some(1), None), "1.5 min");
    }

    #[test]
    fn oversized_decimals_are_clamped() {
        let formatted = to_fixed(1.5, Some(400));
        assert_eq!(formatted, format!("1.5{}", "0".repeat(19)));
        assert_eq!(formatted.len(), 2 + MAX_FIXED_DECIMALS as usize);
    }

    #[test]
    fn percent_appends_sign() {
        assert_eq!(ValueFormat::Percent.format(42.0, Some(1), None), "42.0%");
    }

    #[test]
    fn unknown_names_are_kept() {
        let format = ValueFormat::from("celsius");
        assert_eq!(format.name(), "celsius");
        assert_eq!(format.format(21.5, Some(1), None), "21.5");
    }

    #[test]
    fn axis_decimals_follow_nice_tick_sizes() {
        let decimals = AxisDecimals::for_range(0.0, 10.0, 5.0).expect("valid");
        assert_eq!(decimals.tick_size, 2.0);
        assert_eq!(decimals.tick_decimals, 0);
        assert_eq!(decimals.scaled_decimals, 0);

        let fine = AxisDecimals::for_range(0.0, 1.0, 4.0).expect("valid");
        assert_eq!(fine.tick_decimals, 2);
        assert!((fine.tick_size - 0.25).abs() < 1e-12);

        assert!(AxisDecimals::for_range(5.0, 5.0, 4.0).is_none());
    }
}
