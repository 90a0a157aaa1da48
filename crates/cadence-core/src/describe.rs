//! One-line English summaries of rules, as shown next to a plan.

use chrono::Weekday;

use crate::models::{Frequency, NormalizedRecurrence, RecurrenceEnd};

/// Describes a rule, e.g. `Every 2 weeks on Mon, Wed until 2025-03-31`.
pub fn describe(rule: &NormalizedRecurrence) -> String {
    let unit = match rule.frequency() {
        Frequency::Daily => "day",
        Frequency::Weekly => "week",
        Frequency::Monthly => "month",
    };

    let mut text = match rule.interval() {
        1 => format!("Every {}", unit),
        n => format!("Every {} {}s", n, unit),
    };

    if rule.frequency() == Frequency::Weekly {
        if rule.weekdays().is_empty() {
            text.push_str(" on the start day");
        } else {
            let names: Vec<&str> = rule.weekdays().iter().map(|d| short_name(*d)).collect();
            text.push_str(" on ");
            text.push_str(&names.join(", "));
        }
    }

    match rule.end() {
        RecurrenceEnd::Never => {}
        RecurrenceEnd::Count(n) if n.get() == 1 => text.push_str(", once"),
        RecurrenceEnd::Count(n) => text.push_str(&format!(", {} times", n)),
        RecurrenceEnd::Until(date) => text.push_str(&format!(" until {}", date.format("%Y-%m-%d"))),
    }

    text
}

fn short_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sun",
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
    }
}
