use anyhow::{Context, Result};
use cadence_core::models::{GenerationBounds, NormalizedRecurrence};
use cadence_core::Series;
use tracing::{debug, warn};

use crate::cli::PreviewCommand;
use crate::config::Config;
use crate::parser::parse_start;
use crate::views::table::display_occurrences;

pub fn preview_command(command: PreviewCommand, config: &Config) -> Result<()> {
    let rule: NormalizedRecurrence = command
        .rule
        .parse()
        .with_context(|| format!("Could not decode '{}'", command.rule))?;
    let start = parse_start(&command.start)?;

    let defaults = config.bounds();
    let bounds = GenerationBounds::new(
        command.max.unwrap_or(defaults.max_occurrences),
        command.horizon.unwrap_or(defaults.horizon_days),
    );

    let series = Series::new(start, rule);
    let occurrences = series.occurrences(&bounds);
    debug!(
        start = %series.start(),
        rule = %series.rule(),
        max = bounds.max_occurrences,
        horizon = bounds.horizon_days,
        generated = occurrences.len(),
        "preview generated"
    );

    if let Some(count) = series.rule().count() {
        let generated = occurrences.len();
        if generated < count as usize && generated < bounds.max_occurrences {
            warn!(
                count,
                generated,
                horizon = bounds.horizon_days,
                "COUNT not reached within the horizon; raise --horizon to see the rest"
            );
        }
    }

    if command.json {
        println!("{}", serde_json::to_string_pretty(&occurrences)?);
    } else {
        display_occurrences(&series, &occurrences, config);
    }
    Ok(())
}
