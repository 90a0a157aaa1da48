//! Occurrence generation: expands a canonical rule from its anchor into a
//! bounded list of sessions, plus window and next-session queries.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};
use tracing::trace;

use crate::describe::describe;
use crate::models::{Frequency, GenerationBounds, NormalizedRecurrence, Occurrence};

/// Why generation stopped. Only used for tracing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    CountReached,
    UntilPassed,
    MaxOccurrences,
    HorizonExceeded,
}

/// Expands a rule from its anchor into a finite, strictly increasing list of
/// occurrences.
///
/// # Arguments
/// * `start` - The anchor. Its time of day (if any) is carried to every occurrence
/// * `rule` - The canonical rule
/// * `bounds` - Hard limits on length and look-ahead
///
/// # Behavior
/// - DAILY: the anchor plus `k * interval` days
/// - WEEKLY: days whose weekday is in the rule (the anchor's weekday when the
///   set is empty) inside active weeks. Weeks start on Sunday, week 0 holds
///   the anchor, and week `n` is active iff `n % interval == 0`
/// - MONTHLY: the anchor's day of month `k * interval` months later, clamped
///   to the last day of shorter months
/// - Stops at the first of: `count` reached, a candidate after `until`,
///   `max_occurrences` reached, a candidate more than `horizon_days` after
///   the anchor date
/// - Never emits anything before the anchor; degenerate input yields an
///   empty list
pub fn generate_occurrences(
    start: Occurrence,
    rule: &NormalizedRecurrence,
    bounds: &GenerationBounds,
) -> Vec<Occurrence> {
    let anchor = start.date();
    let horizon = anchor
        .checked_add_days(Days::new(u64::from(bounds.horizon_days)))
        .unwrap_or(NaiveDate::MAX);

    let Some(candidates) = CandidateDates::new(anchor, rule, horizon) else {
        trace!(%anchor, "anchor too close to the calendar limits");
        return Vec::new();
    };

    let mut occurrences: Vec<Occurrence> = Vec::new();
    for date in candidates {
        if let Some(reason) = stop_reason(rule, bounds, occurrences.len(), date, horizon) {
            trace!(?reason, generated = occurrences.len(), "occurrence generation stopped");
            break;
        }
        let occurrence = start.on_date(date);
        if occurrences.last().map_or(true, |last| *last < occurrence) {
            occurrences.push(occurrence);
        }
    }
    occurrences
}

/// Occurrences whose date falls inside `from..=to`.
///
/// The window only filters the bounded sequence: `bounds` still count from
/// the anchor, not from `from`.
pub fn occurrences_between(
    start: Occurrence,
    rule: &NormalizedRecurrence,
    bounds: &GenerationBounds,
    from: NaiveDate,
    to: NaiveDate,
) -> Vec<Occurrence> {
    if from > to {
        return Vec::new();
    }
    generate_occurrences(start, rule, bounds)
        .into_iter()
        .skip_while(|occurrence| occurrence.date() < from)
        .take_while(|occurrence| occurrence.date() <= to)
        .collect()
}

/// First occurrence starting strictly after `after`, or `None` once the
/// series (or its bounds) has run out.
pub fn next_occurrence_after(
    start: Occurrence,
    rule: &NormalizedRecurrence,
    bounds: &GenerationBounds,
    after: NaiveDateTime,
) -> Option<Occurrence> {
    generate_occurrences(start, rule, bounds)
        .into_iter()
        .find(|occurrence| occurrence.starts_at() > after)
}

fn stop_reason(
    rule: &NormalizedRecurrence,
    bounds: &GenerationBounds,
    generated: usize,
    candidate: NaiveDate,
    horizon: NaiveDate,
) -> Option<StopReason> {
    if let Some(count) = rule.count() {
        if generated >= count as usize {
            return Some(StopReason::CountReached);
        }
    }
    if let Some(until) = rule.until() {
        if candidate > until {
            return Some(StopReason::UntilPassed);
        }
    }
    if generated >= bounds.max_occurrences {
        return Some(StopReason::MaxOccurrences);
    }
    if candidate > horizon {
        return Some(StopReason::HorizonExceeded);
    }
    None
}

/// Candidate dates in increasing order, before any stopping condition.
///
/// The weekly walk never looks past `horizon`, so a rule whose weekdays never
/// line up with an active week still terminates.
struct CandidateDates {
    anchor: NaiveDate,
    frequency: Frequency,
    interval: u32,
    horizon: NaiveDate,
    /// Period index for DAILY and MONTHLY.
    step: u32,
    /// Weekly walk state.
    cursor: Option<NaiveDate>,
    week_zero: NaiveDate,
    weekdays: [bool; 7],
}

impl CandidateDates {
    fn new(anchor: NaiveDate, rule: &NormalizedRecurrence, horizon: NaiveDate) -> Option<Self> {
        let week_zero = anchor.checked_sub_days(Days::new(u64::from(
            anchor.weekday().num_days_from_sunday(),
        )))?;

        let mut weekdays = [false; 7];
        if rule.weekdays().is_empty() {
            weekdays[anchor.weekday().num_days_from_sunday() as usize] = true;
        } else {
            for day in rule.weekdays() {
                weekdays[day.num_days_from_sunday() as usize] = true;
            }
        }

        Some(Self {
            anchor,
            frequency: rule.frequency(),
            interval: rule.interval().max(1),
            horizon,
            step: 0,
            cursor: Some(anchor),
            week_zero,
            weekdays,
        })
    }

    fn next_periodic(&mut self) -> Option<NaiveDate> {
        let offset = self.step.checked_mul(self.interval)?;
        self.step = self.step.checked_add(1)?;
        match self.frequency {
            Frequency::Daily => self.anchor.checked_add_days(Days::new(u64::from(offset))),
            // chrono clamps to the last day of the target month
            Frequency::Monthly => self.anchor.checked_add_months(Months::new(offset)),
            Frequency::Weekly => None,
        }
    }

    fn next_weekly(&mut self) -> Option<NaiveDate> {
        let interval = i64::from(self.interval);
        loop {
            let date = self.cursor?;
            if date > self.horizon {
                self.cursor = None;
                return None;
            }

            let week = (date - self.week_zero).num_days() / 7;
            if week % interval != 0 {
                let next_active = (week / interval + 1) * interval;
                self.cursor = u64::try_from(next_active * 7)
                    .ok()
                    .and_then(|days| self.week_zero.checked_add_days(Days::new(days)));
                continue;
            }

            self.cursor = date.succ_opt();
            if self.weekdays[date.weekday().num_days_from_sunday() as usize] {
                return Some(date);
            }
        }
    }
}

impl Iterator for CandidateDates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        match self.frequency {
            Frequency::Weekly => self.next_weekly(),
            Frequency::Daily | Frequency::Monthly => self.next_periodic(),
        }
    }
}

/// An anchor bundled with its rule: one recurring practice series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    start: Occurrence,
    rule: NormalizedRecurrence,
}

impl Series {
    pub fn new(start: impl Into<Occurrence>, rule: NormalizedRecurrence) -> Self {
        Self {
            start: start.into(),
            rule,
        }
    }

    pub fn start(&self) -> Occurrence {
        self.start
    }

    pub fn rule(&self) -> &NormalizedRecurrence {
        &self.rule
    }

    pub fn occurrences(&self, bounds: &GenerationBounds) -> Vec<Occurrence> {
        generate_occurrences(self.start, &self.rule, bounds)
    }

    pub fn between(&self, bounds: &GenerationBounds, from: NaiveDate, to: NaiveDate) -> Vec<Occurrence> {
        occurrences_between(self.start, &self.rule, bounds, from, to)
    }

    pub fn next_after(&self, bounds: &GenerationBounds, after: NaiveDateTime) -> Option<Occurrence> {
        next_occurrence_after(self.start, &self.rule, bounds, after)
    }

    pub fn describe(&self) -> String {
        describe(&self.rule)
    }
}
