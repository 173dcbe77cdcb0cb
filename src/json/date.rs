//! ISO-8601 timestamp codec with microsecond precision.
//!
//! Timestamps are always rendered in UTC with exactly six fractional digits:
//!
//! ```text
//! 2023-08-20T12:34:56.123457Z
//! ```
//!
//! Parsing accepts any number of fractional digits (or none at all); digits
//! beyond nanosecond precision are dropped.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use rest_json::json::date::{format_iso, parse_iso};
//!
//! let instant = Utc.with_ymd_and_hms(2023, 8, 20, 12, 34, 56).unwrap();
//! let text = format_iso(&instant);
//! assert_eq!(text, "2023-08-20T12:34:56.000000Z");
//! assert_eq!(parse_iso(&text), Some(instant));
//! ```

use chrono::{DateTime, NaiveDateTime, TimeDelta, Timelike, Utc};

const WHOLE_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const WHOLE_SECONDS_PARSE: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Rounding bias applied before truncating to microseconds.
const ROUNDING_BIAS_NANOS: i64 = 500;

/// Format an instant as `yyyy-MM-ddTHH:mm:ss.ffffffZ`.
///
/// Sub-second precision is rounded to the nearest microsecond. Rounding that
/// reaches a whole second carries into the seconds field. At the very end of
/// the representable range the instant is truncated instead.
pub fn format_iso(instant: &DateTime<Utc>) -> String {
    let rounded = instant
        .checked_add_signed(TimeDelta::nanoseconds(ROUNDING_BIAS_NANOS))
        .unwrap_or(*instant);
    let micros = (rounded.timestamp_subsec_nanos() / 1_000) % 1_000_000;
    format!("{}.{:06}Z", rounded.format(WHOLE_SECONDS_FORMAT), micros)
}

/// Parse a timestamp produced by [`format_iso`] or any compatible writer.
///
/// Returns `None` if the whole-second part does not match
/// `yyyy-MM-ddTHH:mm:ssZ`.
pub fn parse_iso(text: &str) -> Option<DateTime<Utc>> {
    let Some(dot) = text.find('.') else {
        return parse_whole_seconds(text);
    };

    let after_dot = &text[dot + 1..];
    let digit_count = after_dot.bytes().take_while(u8::is_ascii_digit).count();
    if digit_count == 0 {
        return None;
    }

    let digits = &after_dot[..digit_count.min(9)];
    let whole = format!("{}{}", &text[..dot], &after_dot[digit_count..]);
    let base = parse_whole_seconds(&whole)?;

    let nanos: u32 = format!("{:0<9}", digits).parse().ok()?;
    base.with_nanosecond(nanos)
}

fn parse_whole_seconds(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text, WHOLE_SECONDS_PARSE)
        .ok()
        .map(|naive| naive.and_utc())
}
