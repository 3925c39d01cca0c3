//! Duration strings in the `720h` / `1h30m` / `1.5h` notation.
//!
//! A duration is a sequence of decimal numbers, each with an optional
//! fraction and a mandatory unit suffix. Valid units are `ns`, `us` (or
//! `µs`), `ms`, `s`, `m` and `h`. The bare string `0` is also accepted.
//! Negative durations are rejected: an age threshold below zero would make
//! every tweet eligible.

use std::time::Duration;
use thiserror::Error;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Fraction digits beyond this are ignored; they are below nanosecond precision.
const MAX_FRACTION_DIGITS: usize = 18;

/// Why a duration string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    /// The string was empty.
    #[error("empty duration")]
    Empty,
    /// The string started with a minus sign.
    #[error("negative durations are not allowed")]
    Negative,
    /// A component had no digits.
    #[error("expected a number at '{0}'")]
    InvalidNumber(String),
    /// A number was not followed by a unit.
    #[error("missing unit after '{0}'")]
    MissingUnit(String),
    /// A unit suffix was not recognised.
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),
    /// The total does not fit in a `Duration` of `u64` nanoseconds.
    #[error("duration out of range")]
    Overflow,
}

/// Parses a duration string such as `720h`, `1h30m` or `2.5s`.
///
/// # Errors
///
/// Returns a [`DurationParseError`] describing the first problem found.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if s.starts_with('-') {
        return Err(DurationParseError::Negative);
    }
    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(DurationParseError::Empty);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = split_digits(rest);
        let (fraction, after_number) = match after_whole.strip_prefix('.') {
            Some(tail) => split_digits(tail),
            None => ("", after_whole),
        };
        if whole.is_empty() && fraction.is_empty() {
            return Err(DurationParseError::InvalidNumber(rest.to_string()));
        }

        let unit_end = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let unit = &after_number[..unit_end];
        if unit.is_empty() {
            return Err(DurationParseError::MissingUnit(rest.to_string()));
        }
        let scale = unit_nanos(unit)
            .ok_or_else(|| DurationParseError::UnknownUnit(unit.to_string()))?;

        total = total
            .checked_add(component_nanos(whole, fraction, scale)?)
            .ok_or(DurationParseError::Overflow)?;
        rest = &after_number[unit_end..];
    }

    let nanos = u64::try_from(total).map_err(|_| DurationParseError::Overflow)?;
    Ok(Duration::from_nanos(nanos))
}

/// Formats a duration as `<h>h<m>m<s>s`, dropping sub-second precision.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{hours}h{minutes}m{seconds}s")
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

fn component_nanos(whole: &str, fraction: &str, scale: u128) -> Result<u128, DurationParseError> {
    let whole_value = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| DurationParseError::Overflow)?
    };
    let mut nanos = whole_value
        .checked_mul(scale)
        .ok_or(DurationParseError::Overflow)?;

    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if !fraction.is_empty() {
        let numerator = fraction
            .parse::<u128>()
            .map_err(|_| DurationParseError::InvalidNumber(fraction.to_string()))?;
        let exponent = u32::try_from(fraction.len()).map_err(|_| DurationParseError::Overflow)?;
        let denominator = 10u128.pow(exponent);
        nanos = nanos
            .checked_add(numerator * scale / denominator)
            .ok_or(DurationParseError::Overflow)?;
    }

    Ok(nanos)
}
