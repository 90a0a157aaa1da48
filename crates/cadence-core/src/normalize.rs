//! Rule normalization.
//!
//! Recurrence descriptors reach the engine in several shapes: an already
//! canonical [`NormalizedRecurrence`], a rule string, a loosely-typed metadata
//! blob persisted by older clients, or a rule string together with a metadata
//! blob. [`normalize_recurrence`] folds every shape into one canonical value.
//!
//! Recoverable corruption is repaired silently (an interval of `0` becomes
//! `1`, unknown weekday entries are dropped). `None` means there is no
//! recurrence: the input is absent, unrecoverable, or a one-off event.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::codec::{decode_rule, parse_rule_date, resolve_end};
use crate::error::CoreError;
use crate::models::{
    parse_weekday_name, weekday_code, Frequency, NormalizedRecurrence, RecurrenceEnd,
    CALENDAR_WEEK,
};

/// Frequency spellings that mark a single, non-recurring event.
const NON_RECURRING: [&str; 4] = ["", "none", "once", "never"];

/// Legacy recurrence metadata as stored next to a plan.
///
/// Every field is kept as raw JSON because persisted data is not trusted to
/// have the right types (`"interval": "2"` is common).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceMetadata {
    #[serde(default, alias = "freq", skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<Value>,
    #[serde(
        default,
        alias = "days",
        alias = "byday",
        alias = "daysOfWeek",
        skip_serializing_if = "Option::is_none"
    )]
    pub weekdays: Option<Value>,
    #[serde(default, alias = "occurrences", skip_serializing_if = "Option::is_none")]
    pub count: Option<Value>,
    #[serde(
        default,
        alias = "endDate",
        alias = "end_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub until: Option<Value>,
    /// A rule string embedded in the blob by some clients.
    #[serde(default, alias = "rrule", skip_serializing_if = "Option::is_none")]
    pub rule: Option<Value>,
}

/// The shapes a recurrence descriptor may arrive in.
#[derive(Debug, Clone)]
pub enum RecurrenceInput<'a> {
    Normalized(NormalizedRecurrence),
    RuleString(&'a str),
    Metadata(RecurrenceMetadata),
    /// A stored rule string plus metadata; metadata wins where they disagree.
    Combined {
        rule: &'a str,
        metadata: RecurrenceMetadata,
    },
}

/// Folds any accepted input shape into a canonical rule.
pub fn normalize_recurrence(input: RecurrenceInput<'_>) -> Option<NormalizedRecurrence> {
    match input {
        RecurrenceInput::Normalized(rule) => Some(rule),
        RecurrenceInput::RuleString(text) => decode_rule(text),
        RecurrenceInput::Metadata(metadata) => {
            let base = match metadata.rule.as_ref() {
                Some(Value::String(text)) => decode_rule(text),
                _ => None,
            };
            merge(base, &metadata)
        }
        RecurrenceInput::Combined { rule, metadata } => merge(decode_rule(rule), &metadata),
    }
}

/// Entry point for untyped input, e.g. a JSON field read from storage.
///
/// `null` is no recurrence, a string is a rule string (or a bare frequency
/// such as `"weekly"`), and an object is a metadata blob.
pub fn normalize_value(value: &Value) -> Option<NormalizedRecurrence> {
    match value {
        Value::Null => None,
        Value::String(text) => decode_rule(text).or_else(|| {
            match frequency_field(Some(value)) {
                FrequencyField::Valid(frequency) => Some(NormalizedRecurrence::new(frequency, 1)),
                _ => None,
            }
        }),
        Value::Object(_) => match serde_json::from_value::<RecurrenceMetadata>(value.clone()) {
            Ok(metadata) => normalize_recurrence(RecurrenceInput::Metadata(metadata)),
            Err(e) => {
                debug!(error = %e, "recurrence object could not be read as metadata");
                None
            }
        },
        _ => {
            debug!(%value, "unsupported recurrence value");
            None
        }
    }
}

enum FrequencyField {
    Missing,
    NonRecurring,
    Valid(Frequency),
    Invalid,
}

fn frequency_field(value: Option<&Value>) -> FrequencyField {
    match value {
        None => FrequencyField::Missing,
        Some(Value::String(s)) => {
            let lowered = s.trim().to_lowercase();
            if NON_RECURRING.contains(&lowered.as_str()) {
                FrequencyField::NonRecurring
            } else {
                lowered
                    .parse::<Frequency>()
                    .map(FrequencyField::Valid)
                    .unwrap_or(FrequencyField::Invalid)
            }
        }
        Some(_) => FrequencyField::Invalid,
    }
}

/// Overlays metadata fields on a rule decoded from a string.
fn merge(base: Option<NormalizedRecurrence>, metadata: &RecurrenceMetadata) -> Option<NormalizedRecurrence> {
    let frequency = match frequency_field(metadata.frequency.as_ref()) {
        FrequencyField::Valid(frequency) => frequency,
        FrequencyField::NonRecurring => return None,
        FrequencyField::Missing => base.as_ref()?.frequency(),
        FrequencyField::Invalid => {
            debug!(frequency = ?metadata.frequency, "unrecognized frequency in metadata");
            base.as_ref()?.frequency()
        }
    };

    let interval = match metadata.interval.as_ref() {
        Some(value) => positive_integer(value).unwrap_or_else(|| {
            debug!(%value, "coercing invalid interval to 1");
            1
        }),
        None => base.as_ref().map_or(1, NormalizedRecurrence::interval),
    };

    let weekdays = match metadata.weekdays.as_ref() {
        Some(value) => weekdays_from_value(value),
        None => base
            .as_ref()
            .map(|rule| rule.weekdays().to_vec())
            .unwrap_or_default(),
    };

    let count = metadata
        .count
        .as_ref()
        .and_then(positive_integer)
        .and_then(RecurrenceEnd::count);
    let until = metadata.until.as_ref().and_then(|value| match value {
        Value::String(s) => parse_rule_date(s),
        _ => None,
    });
    let end = if count.is_some() || until.is_some() {
        resolve_end(count, until)
    } else {
        base.as_ref().map(NormalizedRecurrence::end).unwrap_or_default()
    };

    Some(
        NormalizedRecurrence::new(frequency, interval)
            .with_weekdays(weekdays)
            .with_end(end),
    )
}

/// Positive whole numbers from JSON numbers or numeric strings. Fractions
/// are truncated.
fn positive_integer(value: &Value) -> Option<u32> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() || n < 1.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n.trunc() as u32)
}

fn weekdays_from_value(value: &Value) -> Vec<Weekday> {
    let entries: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::String(_) => vec![value],
        _ => {
            debug!(%value, "weekdays field is neither a list nor a string");
            return Vec::new();
        }
    };

    let mut days = Vec::new();
    for entry in entries {
        match entry {
            Value::String(s) => {
                for name in s.split(',').filter(|name| !name.trim().is_empty()) {
                    match parse_weekday_name(name) {
                        Some(day) => days.push(day),
                        None => debug!(weekday = name, "dropping unknown weekday"),
                    }
                }
            }
            Value::Number(n) => match n.as_u64().and_then(|i| CALENDAR_WEEK.get(i as usize)) {
                Some(day) => days.push(*day),
                None => debug!(weekday = %n, "dropping out-of-range weekday index"),
            },
            other => debug!(weekday = %other, "dropping unsupported weekday entry"),
        }
    }
    days
}

impl From<NormalizedRecurrence> for RecurrenceMetadata {
    fn from(rule: NormalizedRecurrence) -> Self {
        let weekdays = (rule.frequency() == Frequency::Weekly).then(|| {
            Value::Array(
                rule.weekdays()
                    .iter()
                    .map(|day| Value::from(weekday_code(*day)))
                    .collect(),
            )
        });
        Self {
            frequency: Some(Value::from(rule.frequency().as_str())),
            interval: Some(Value::from(rule.interval())),
            weekdays,
            count: rule.count().map(Value::from),
            until: rule
                .until()
                .map(|date| Value::from(date.format("%Y-%m-%d").to_string())),
            rule: None,
        }
    }
}

impl TryFrom<RecurrenceMetadata> for NormalizedRecurrence {
    type Error = CoreError;

    fn try_from(metadata: RecurrenceMetadata) -> Result<Self, Self::Error> {
        normalize_recurrence(RecurrenceInput::Metadata(metadata)).ok_or_else(|| {
            CoreError::InvalidInput("no recurrence could be derived from metadata".to_string())
        })
    }
}
