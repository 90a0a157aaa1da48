use cadence_core::describe::describe;
use cadence_core::models::{NormalizedRecurrence, Occurrence};
use cadence_core::Series;
use chrono::{Datelike, Weekday};
use comfy_table::{Attribute, Cell, Color, Row, Table};
use owo_colors::OwoColorize;

use crate::config::Config;

/// Prints a decoded rule: its canonical string, then a plain-English summary.
pub fn display_rule(rule: &NormalizedRecurrence) {
    println!("{}", rule.to_string().green().bold());
    println!("  {}", describe(rule).dimmed());
}

pub fn display_occurrences(series: &Series, occurrences: &[Occurrence], config: &Config) {
    println!(
        "{} {} from {}",
        series.describe().bold(),
        format!("({})", series.rule()).dimmed(),
        series.start()
    );

    if occurrences.is_empty() {
        println!("No occurrences found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Date", "Day", "Time"]);

    for (index, occurrence) in occurrences.iter().enumerate() {
        let mut row = Row::new();
        row.add_cell(Cell::new(index + 1));

        let mut date_cell = Cell::new(occurrence.date().format(&config.date_format));
        if index == 0 {
            date_cell = date_cell.add_attribute(Attribute::Bold);
        }
        row.add_cell(date_cell);

        let weekday = occurrence.date().weekday();
        let mut day_cell = Cell::new(weekday);
        if matches!(weekday, Weekday::Sat | Weekday::Sun) {
            day_cell = day_cell.fg(Color::Yellow);
        }
        row.add_cell(day_cell);

        row.add_cell(match occurrence.time() {
            Some(time) => Cell::new(time.format(&config.time_format)),
            None => Cell::new("all day").fg(Color::DarkGrey),
        });
        table.add_row(row);
    }

    println!("{table}");
    println!("{} occurrence(s)", occurrences.len());
}
