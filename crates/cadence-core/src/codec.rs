//! Rule strings.
//!
//! A [`NormalizedRecurrence`] is stored as a single line with a fixed field
//! order:
//!
//! ```text
//! FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE;COUNT=6
//! ```
//!
//! `BYDAY` only appears on weekly rules with an explicit weekday set, and at
//! most one of `COUNT` / `UNTIL` is written. Decoding is lenient: unknown
//! tokens are ignored so strings written by newer versions still load.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

use crate::error::CoreError;
use crate::models::{
    parse_weekday_code, weekday_code, Frequency, NormalizedRecurrence, RecurrenceEnd,
};

const RULE_PREFIX: &str = "RRULE:";

/// Serializes a rule. Every valid rule is encodable.
pub fn encode_rule(rule: &NormalizedRecurrence) -> String {
    let mut parts = Vec::with_capacity(4);
    parts.push(format!("FREQ={}", rule.frequency()));
    parts.push(format!("INTERVAL={}", rule.interval()));

    if rule.frequency() == Frequency::Weekly && !rule.weekdays().is_empty() {
        let codes: Vec<&str> = rule.weekdays().iter().map(|d| weekday_code(*d)).collect();
        parts.push(format!("BYDAY={}", codes.join(",")));
    }

    match rule.end() {
        RecurrenceEnd::Never => {}
        RecurrenceEnd::Count(n) => parts.push(format!("COUNT={}", n)),
        RecurrenceEnd::Until(date) => parts.push(format!("UNTIL={}", date.format("%Y-%m-%d"))),
    }

    parts.join(";")
}

/// Parses a rule string, returning `None` when no rule can be recovered
/// (missing or unknown `FREQ`, non-numeric `INTERVAL`).
pub fn decode_rule(text: &str) -> Option<NormalizedRecurrence> {
    match parse_rule(text) {
        Ok(rule) => Some(rule),
        Err(e) => {
            debug!(rule = text, error = %e, "rule string could not be decoded");
            None
        }
    }
}

fn parse_rule(text: &str) -> Result<NormalizedRecurrence, CoreError> {
    let body = strip_rule_prefix(text.trim());

    let mut frequency = None;
    let mut interval = None;
    let mut byday = None;
    let mut count = None;
    let mut until = None;

    for token in body.split(';') {
        let Some((key, value)) = token.split_once('=') else {
            if !token.trim().is_empty() {
                trace!(token, "ignoring malformed rule token");
            }
            continue;
        };
        let value = value.trim();
        match key.trim().to_ascii_uppercase().as_str() {
            "FREQ" => frequency = Some(value),
            "INTERVAL" => interval = Some(value),
            "BYDAY" => byday = Some(value),
            "COUNT" => count = Some(value),
            "UNTIL" => until = Some(value),
            other => trace!(key = other, "ignoring unknown rule token"),
        }
    }

    let frequency = frequency
        .ok_or_else(|| CoreError::InvalidRule("missing FREQ".to_string()))?
        .parse::<Frequency>()
        .map_err(|e| CoreError::InvalidRule(e.to_string()))?;

    let interval = match interval {
        None => 1,
        Some(raw) => parse_interval(raw).ok_or_else(|| {
            CoreError::InvalidRule(format!("INTERVAL is not a number: '{}'", raw))
        })?,
    };

    let mut rule = NormalizedRecurrence::new(frequency, interval);

    if let Some(raw) = byday {
        if frequency == Frequency::Weekly {
            let days = raw.split(',').filter_map(|code| {
                let day = parse_weekday_code(code);
                if day.is_none() {
                    debug!(code, "dropping unsupported BYDAY entry");
                }
                day
            });
            rule = rule.with_weekdays(days);
        }
    }

    let count = count.and_then(|raw| {
        let end = raw.parse::<u32>().ok().and_then(RecurrenceEnd::count);
        if end.is_none() {
            debug!(count = raw, "dropping invalid COUNT");
        }
        end
    });
    let until = until.and_then(|raw| {
        let date = parse_rule_date(raw);
        if date.is_none() {
            debug!(until = raw, "dropping invalid UNTIL");
        }
        date
    });

    Ok(rule.with_end(resolve_end(count, until)))
}

fn strip_rule_prefix(text: &str) -> &str {
    match text.get(..RULE_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(RULE_PREFIX) => &text[RULE_PREFIX.len()..],
        _ => text,
    }
}

/// Numeric intervals below 1 (or beyond `u32`) collapse to 1. Non-numeric
/// text is not an interval at all.
fn parse_interval(raw: &str) -> Option<u32> {
    let n = raw.parse::<i64>().ok()?;
    Some(u32::try_from(n).ok().filter(|n| *n >= 1).unwrap_or(1))
}

/// `count` wins over `until` when both are present.
pub(crate) fn resolve_end(count: Option<RecurrenceEnd>, until: Option<NaiveDate>) -> RecurrenceEnd {
    match (count, until) {
        (Some(count), Some(until)) => {
            debug!(%until, "both COUNT and UNTIL present, ignoring UNTIL");
            count
        }
        (Some(count), None) => count,
        (None, Some(until)) => RecurrenceEnd::Until(until),
        (None, None) => RecurrenceEnd::Never,
    }
}

/// Accepts `YYYY-MM-DD`, `YYYYMMDD`, and datetimes in either spelling (with
/// an optional `Z` or UTC offset). Only the date part is kept.
pub(crate) fn parse_rule_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    for format in ["%Y-%m-%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local().date());
    }

    let naive = raw.strip_suffix(['Z', 'z']).unwrap_or(raw);
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y%m%dT%H%M%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.date());
        }
    }

    None
}

impl fmt::Display for NormalizedRecurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_rule(self))
    }
}

impl FromStr for NormalizedRecurrence {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rule(s)
    }
}
