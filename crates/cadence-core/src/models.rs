use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use thiserror::Error;

use crate::normalize::RecurrenceMetadata;

/// Weekdays in calendar order (SU=0 … SA=6).
pub const CALENDAR_WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    /// The spelling used in rule strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid frequency: {0}")]
pub struct ParseFrequencyError(String);

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

/// Two-letter rule-string code for a weekday.
pub fn weekday_code(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "SU",
        Weekday::Mon => "MO",
        Weekday::Tue => "TU",
        Weekday::Wed => "WE",
        Weekday::Thu => "TH",
        Weekday::Fri => "FR",
        Weekday::Sat => "SA",
    }
}

/// Parses a strict two-letter weekday code (`MO`, `we`, ...).
pub fn parse_weekday_code(code: &str) -> Option<Weekday> {
    CALENDAR_WEEK
        .iter()
        .copied()
        .find(|day| weekday_code(*day).eq_ignore_ascii_case(code.trim()))
}

/// Parses the loose spellings found in user input and legacy data:
/// two-letter codes, short names and full English names.
pub fn parse_weekday_name(name: &str) -> Option<Weekday> {
    let input = name.trim().to_lowercase();
    let day = match input.as_str() {
        "su" | "sun" | "sunday" => Weekday::Sun,
        "mo" | "mon" | "monday" => Weekday::Mon,
        "tu" | "tue" | "tues" | "tuesday" => Weekday::Tue,
        "we" | "wed" | "wednesday" => Weekday::Wed,
        "th" | "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "fr" | "fri" | "friday" => Weekday::Fri,
        "sa" | "sat" | "saturday" => Weekday::Sat,
        _ => return None,
    };
    Some(day)
}

/// Deduplicates and sorts weekdays into calendar order.
pub fn calendar_sorted(days: impl IntoIterator<Item = Weekday>) -> Vec<Weekday> {
    let mut present = [false; 7];
    for day in days {
        present[day.num_days_from_sunday() as usize] = true;
    }
    CALENDAR_WEEK
        .iter()
        .copied()
        .filter(|day| present[day.num_days_from_sunday() as usize])
        .collect()
}

/// How a series ends. `Count` and `Until` are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecurrenceEnd {
    #[default]
    Never,
    /// Total number of occurrences, the anchor included.
    Count(NonZeroU32),
    /// Last calendar date (inclusive) an occurrence may fall on.
    Until(NaiveDate),
}

impl RecurrenceEnd {
    /// `Count(n)` for positive `n`, `None` otherwise.
    pub fn count(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(RecurrenceEnd::Count)
    }
}

/// The canonical recurrence descriptor.
///
/// Built by the normalizer or the codec, consumed by the generator. Values are
/// never mutated in place: the `with_*` methods return new values.
///
/// Invariants:
/// - `interval >= 1`
/// - `weekdays` is deduplicated, in calendar order, and empty unless the
///   frequency is [`Frequency::Weekly`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RecurrenceMetadata", try_from = "RecurrenceMetadata")]
pub struct NormalizedRecurrence {
    frequency: Frequency,
    interval: u32,
    weekdays: Vec<Weekday>,
    end: RecurrenceEnd,
}

impl NormalizedRecurrence {
    /// Creates an open-ended rule. An `interval` of 0 is coerced to 1.
    pub fn new(frequency: Frequency, interval: u32) -> Self {
        Self {
            frequency,
            interval: interval.max(1),
            weekdays: Vec::new(),
            end: RecurrenceEnd::Never,
        }
    }

    pub fn daily(interval: u32) -> Self {
        Self::new(Frequency::Daily, interval)
    }

    pub fn weekly(interval: u32, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        Self::new(Frequency::Weekly, interval).with_weekdays(weekdays)
    }

    pub fn monthly(interval: u32) -> Self {
        Self::new(Frequency::Monthly, interval)
    }

    pub fn with_interval(&self, interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            ..self.clone()
        }
    }

    /// Replaces the weekday set. Ignored unless the rule is weekly.
    pub fn with_weekdays(&self, weekdays: impl IntoIterator<Item = Weekday>) -> Self {
        let weekdays = match self.frequency {
            Frequency::Weekly => calendar_sorted(weekdays),
            Frequency::Daily | Frequency::Monthly => Vec::new(),
        };
        Self {
            weekdays,
            ..self.clone()
        }
    }

    pub fn with_end(&self, end: RecurrenceEnd) -> Self {
        Self {
            end,
            ..self.clone()
        }
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn weekdays(&self) -> &[Weekday] {
        &self.weekdays
    }

    pub fn end(&self) -> RecurrenceEnd {
        self.end
    }

    pub fn count(&self) -> Option<u32> {
        match self.end {
            RecurrenceEnd::Count(n) => Some(n.get()),
            _ => None,
        }
    }

    pub fn until(&self) -> Option<NaiveDate> {
        match self.end {
            RecurrenceEnd::Until(date) => Some(date),
            _ => None,
        }
    }

    /// Whether the rule ends on its own, without generation bounds.
    pub fn is_bounded(&self) -> bool {
        self.end != RecurrenceEnd::Never
    }
}

/// Caller-imposed safety limits on occurrence generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationBounds {
    /// Hard cap on the length of a generated sequence.
    pub max_occurrences: usize,
    /// Hard cap on how many days past the anchor date generation may look.
    pub horizon_days: u32,
}

impl GenerationBounds {
    pub fn new(max_occurrences: usize, horizon_days: u32) -> Self {
        Self {
            max_occurrences,
            horizon_days,
        }
    }
}

impl Default for GenerationBounds {
    fn default() -> Self {
        Self {
            max_occurrences: 500,
            horizon_days: 3660,
        }
    }
}

/// A concrete point in a series: a calendar date, optionally with the time of
/// day carried over from the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Occurrence {
    AllDay(NaiveDate),
    At(NaiveDateTime),
}

impl Occurrence {
    pub fn date(&self) -> NaiveDate {
        match self {
            Occurrence::AllDay(date) => *date,
            Occurrence::At(dt) => dt.date(),
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            Occurrence::AllDay(_) => None,
            Occurrence::At(dt) => Some(dt.time()),
        }
    }

    /// The instant this occurrence starts; all-day occurrences start at
    /// midnight.
    pub fn starts_at(&self) -> NaiveDateTime {
        match self {
            Occurrence::AllDay(date) => date.and_time(NaiveTime::MIN),
            Occurrence::At(dt) => *dt,
        }
    }

    /// The same kind of occurrence (and time of day) moved to `date`.
    pub fn on_date(&self, date: NaiveDate) -> Self {
        match self {
            Occurrence::AllDay(_) => Occurrence::AllDay(date),
            Occurrence::At(dt) => Occurrence::At(date.and_time(dt.time())),
        }
    }
}

impl From<NaiveDate> for Occurrence {
    fn from(date: NaiveDate) -> Self {
        Occurrence::AllDay(date)
    }
}

impl From<NaiveDateTime> for Occurrence {
    fn from(dt: NaiveDateTime) -> Self {
        Occurrence::At(dt)
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Occurrence::AllDay(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Occurrence::At(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_from_str() {
        assert_eq!("weekly".parse::<Frequency>(), Ok(Frequency::Weekly));
        assert_eq!(" DAILY ".parse::<Frequency>(), Ok(Frequency::Daily));
        assert_eq!("Monthly".parse::<Frequency>(), Ok(Frequency::Monthly));
        assert!("YEARLY".parse::<Frequency>().is_err());
    }

    #[test]
    fn test_weekday_parsing() {
        assert_eq!(parse_weekday_code("mo"), Some(Weekday::Mon));
        assert_eq!(parse_weekday_code("monday"), None);
        assert_eq!(parse_weekday_name("Thursday"), Some(Weekday::Thu));
        assert_eq!(parse_weekday_name("tue"), Some(Weekday::Tue));
        assert_eq!(parse_weekday_name("XX"), None);
    }

    #[test]
    fn test_calendar_sorted_dedupes() {
        let days = calendar_sorted([Weekday::Sat, Weekday::Mon, Weekday::Sun, Weekday::Mon]);
        assert_eq!(days, vec![Weekday::Sun, Weekday::Mon, Weekday::Sat]);
    }

    #[test]
    fn test_interval_is_at_least_one() {
        assert_eq!(NormalizedRecurrence::daily(0).interval(), 1);
        assert_eq!(NormalizedRecurrence::daily(3).with_interval(0).interval(), 1);
    }

    #[test]
    fn test_weekdays_only_kept_for_weekly() {
        let monthly = NormalizedRecurrence::monthly(1).with_weekdays([Weekday::Mon]);
        assert!(monthly.weekdays().is_empty());

        let weekly = NormalizedRecurrence::weekly(1, [Weekday::Wed, Weekday::Mon]);
        assert_eq!(weekly.weekdays(), &[Weekday::Mon, Weekday::Wed]);
    }

    #[test]
    fn test_with_methods_do_not_mutate() {
        let rule = NormalizedRecurrence::daily(1);
        let bounded = rule.with_end(RecurrenceEnd::count(3).unwrap());
        assert_eq!(rule.end(), RecurrenceEnd::Never);
        assert_eq!(bounded.count(), Some(3));
        assert!(bounded.is_bounded());
        assert_eq!(bounded.until(), None);
    }

    #[test]
    fn test_count_zero_is_rejected() {
        assert_eq!(RecurrenceEnd::count(0), None);
    }

    #[test]
    fn test_occurrence_on_date_keeps_time() {
        let dt = NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let moved = Occurrence::At(dt).on_date(NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(moved.time(), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(moved.date(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        assert_eq!(moved.to_string(), "2025-02-01 09:30");
    }
}
