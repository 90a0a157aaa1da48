use anyhow::{anyhow, Result};
use cadence_core::error::CoreError;
use cadence_core::models::Occurrence;
use chrono::{Local, NaiveDate, NaiveDateTime};
use chrono_english::{parse_date_string, Dialect};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parses the anchor of a preview. A plain ISO date gives an all-day anchor;
/// anything with a time of day (including natural language such as
/// "next monday 9am", resolved against the local clock) gives a timed one.
pub fn parse_start(input: &str) -> Result<Occurrence> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(Occurrence::AllDay(date));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(Occurrence::At(dt));
        }
    }

    parse_date_string(input, Local::now(), Dialect::Us)
        .map(|dt| Occurrence::At(dt.naive_local()))
        .map_err(|e| {
            anyhow!(CoreError::InvalidInput(format!(
                "Failed to parse start '{}': {}",
                input, e
            )))
        })
}

/// Parses an end date: ISO (`2025-12-31`) or natural language.
pub fn parse_until_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    parse_date_string(input, Local::now(), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| {
            anyhow!(CoreError::InvalidInput(format!(
                "Failed to parse until date '{}': {}",
                input, e
            )))
        })
}

/// Parse days string like "mon,tue,wed", "monday,tuesday", or "weekdays"
/// into rule-string weekday codes.
pub fn parse_days_string(days_str: &str) -> Result<Vec<&'static str>> {
    let input = days_str.trim().to_lowercase();

    // Handle special day groups
    match input.as_str() {
        "weekdays" | "workdays" => return Ok(vec!["MO", "TU", "WE", "TH", "FR"]),
        "weekends" => return Ok(vec!["SA", "SU"]),
        "daily" | "everyday" => return Ok(vec!["SU", "MO", "TU", "WE", "TH", "FR", "SA"]),
        _ => {}
    }

    let mut codes = Vec::new();
    let mut invalid_days = Vec::new();

    for day in input.split(',') {
        let day = day.trim();
        if day.is_empty() {
            continue;
        }

        let code = match day {
            "mon" | "monday" | "m" | "mo" => "MO",
            "tue" | "tuesday" | "tu" => "TU",
            "wed" | "wednesday" | "w" | "we" => "WE",
            "thu" | "thursday" | "th" => "TH",
            "fri" | "friday" | "f" | "fr" => "FR",
            "sat" | "saturday" | "sa" => "SA",
            "sun" | "sunday" | "su" => "SU",
            _ => {
                invalid_days.push(day.to_string());
                continue;
            }
        };

        if !codes.contains(&code) {
            codes.push(code);
        }
    }

    if !invalid_days.is_empty() {
        return Err(anyhow!(CoreError::InvalidInput(format!(
            "Invalid day(s): {}. Use names like 'mon,wed,fri', 'weekdays' or 'weekends'",
            invalid_days.join(", ")
        ))));
    }

    if codes.is_empty() {
        return Err(anyhow!(CoreError::InvalidInput(format!(
            "No valid days specified in: '{}'",
            days_str
        ))));
    }

    Ok(codes)
}
