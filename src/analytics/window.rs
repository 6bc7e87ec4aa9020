//! Time window labels such as `24h`, `1.5h` or `1h30m`

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::types::EventFilter;

/// Errors produced while parsing a window label
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WindowError {
    #[error("time window is empty")]
    Empty,
    #[error("invalid time window '{0}': expected <number><unit> pairs like 24h, 1.5h or 1h30m")]
    Malformed(String),
    #[error("unknown time unit '{unit}' in '{label}' (use ns, us, ms, s, m, h or d)")]
    UnknownUnit { label: String, unit: String },
    #[error("time window '{0}' must be greater than zero")]
    NotPositive(String),
    #[error("time window '{0}' is too large")]
    Overflow(String),
}

/// A parsed window label together with the duration it denotes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    label: String,
    duration: Duration,
}

impl TimeWindow {
    /// Parse a label made of `<decimal><unit>` pairs such as `2h45m30.5s`.
    ///
    /// Amounts may be fractional and units are `ns`, `us` (or `µs`), `ms`,
    /// `s`, `m`, `h` and `d`. The total must be positive and fit in `i64`
    /// nanoseconds.
    pub fn parse(label: &str) -> Result<Self, WindowError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(WindowError::Empty);
        }
        let malformed = || WindowError::Malformed(label.to_string());
        let overflow = || WindowError::Overflow(label.to_string());

        let (negative, mut rest) = match label.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, label.strip_prefix('+').unwrap_or(label)),
        };
        // A bare zero needs no unit
        if rest == "0" {
            return Err(WindowError::NotPositive(label.to_string()));
        }
        if rest.is_empty() {
            return Err(malformed());
        }

        let mut total: i64 = 0;
        while !rest.is_empty() {
            let (whole, after) = split_digits(rest);
            let (fraction, after) = match after.strip_prefix('.') {
                Some(after) => split_digits(after),
                None => ("", after),
            };
            if whole.is_empty() && fraction.is_empty() {
                return Err(malformed());
            }

            let unit_len = after
                .find(|c: char| c == '.' || c.is_ascii_digit())
                .unwrap_or(after.len());
            if unit_len == 0 {
                return Err(malformed());
            }
            let unit = &after[..unit_len];
            rest = &after[unit_len..];

            let scale = unit_nanos(unit).ok_or_else(|| WindowError::UnknownUnit {
                label: label.to_string(),
                unit: unit.to_string(),
            })?;
            let part = amount_nanos(whole, fraction, scale).ok_or_else(overflow)?;
            total = total.checked_add(part).ok_or_else(overflow)?;
        }

        if negative || total == 0 {
            return Err(WindowError::NotPositive(label.to_string()));
        }

        Ok(Self {
            label: label.to_string(),
            duration: Duration::nanoseconds(total),
        })
    }

    /// The label as supplied
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Resolved `[now - window, now]` filter
    pub fn filter_ending_at(&self, now: DateTime<Utc>) -> EventFilter {
        let start = now.checked_sub_signed(self.duration).unwrap_or(DateTime::<Utc>::MIN_UTC);
        EventFilter::between(start, now)
    }
}

impl std::str::FromStr for TimeWindow {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Nanoseconds per unit
fn unit_nanos(unit: &str) -> Option<i64> {
    const SECOND: i64 = 1_000_000_000;
    match unit {
        "ns" => Some(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(SECOND),
        "m" => Some(60 * SECOND),
        "h" => Some(3_600 * SECOND),
        "d" => Some(86_400 * SECOND),
        _ => None,
    }
}

/// Split off the leading ASCII digits
fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// `whole.fraction` units in nanoseconds, `None` on overflow
fn amount_nanos(whole: &str, fraction: &str, unit: i64) -> Option<i64> {
    let mut nanos: i64 = 0;
    for digit in whole.bytes() {
        nanos = nanos.checked_mul(10)?.checked_add(i64::from(digit - b'0'))?;
    }
    nanos = nanos.checked_mul(unit)?;

    // Digits past the 18th cannot change a nanosecond result
    let mut numerator: u64 = 0;
    let mut scale = 1.0_f64;
    for digit in fraction.bytes().take(18) {
        numerator = numerator * 10 + u64::from(digit - b'0');
        scale *= 10.0;
    }
    if numerator == 0 {
        return Some(nanos);
    }
    let fractional = (numerator as f64 * (unit as f64 / scale)) as i64;
    nanos.checked_add(fractional)
}
