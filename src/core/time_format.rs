use serde::{Deserialize, Serialize};

use crate::core::types::{DisplayTimezone, millis_to_datetime};

/// Dashboard-style (moment) date pattern, translated once to a `chrono` format string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLabelPattern {
    source: String,
    strftime: String,
}

impl TimeLabelPattern {
    pub const TIME_SECONDS: &'static str = "HH:mm:ss";
    pub const TIME_MINUTES: &'static str = "HH:mm";
    pub const MONTH_DAY_TIME: &'static str = "MM/DD HH:mm";
    pub const MONTH_DAY: &'static str = "MM/DD";
    pub const YEAR_MONTH: &'static str = "YYYY-MM";

    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let strftime = translate_moment_pattern(&source);
        Self { source, strftime }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn strftime(&self) -> &str {
        &self.strftime
    }

    /// Formats an epoch-millisecond instant in `timezone`.
    #[must_use]
    pub fn format(&self, millis: f64, timezone: DisplayTimezone) -> String {
        match millis_to_datetime(millis, timezone) {
            Some(instant) => instant.format(&self.strftime).to_string(),
            None => "Invalid date".to_owned(),
        }
    }
}

const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%-m"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("DD", "%d"),
    ("D", "%-d"),
    ("HH", "%H"),
    ("H", "%-H"),
    ("hh", "%I"),
    ("h", "%-I"),
    ("mm", "%M"),
    ("m", "%-M"),
    ("SSS", "%3f"),
    ("ss", "%S"),
    ("s", "%-S"),
    ("A", "%p"),
    ("a", "%P"),
];

fn translate_moment_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    'outer: while let Some(ch) = rest.chars().next() {
        if ch == '[' {
            if let Some(end) = rest.find(']') {
                push_literal(&mut out, &rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }
        for (token, code) in TOKENS {
            if let Some(stripped) = rest.strip_prefix(token) {
                out.push_str(code);
                rest = stripped;
                continue 'outer;
            }
        }
        push_literal(&mut out, &rest[..ch.len_utf8()]);
        rest = &rest[ch.len_utf8()..];
    }

    out
}

fn push_literal(out: &mut String, literal: &str) {
    for ch in literal.chars() {
        if ch == '%' {
            out.push_str("%%");
        } else {
            out.push(ch);
        }
    }
}
