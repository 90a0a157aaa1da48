use anyhow::{anyhow, Context, Result};
use cadence_core::error::CoreError;
use cadence_core::models::NormalizedRecurrence;
use cadence_core::{normalize_recurrence, normalize_value, RecurrenceInput};
use serde_json::Value;
use tracing::debug;

use crate::cli::NormalizeCommand;
use crate::views::table::display_rule;

pub fn normalize_command(command: NormalizeCommand) -> Result<()> {
    let rule = normalize_input(&command.input)?.ok_or_else(|| {
        anyhow!(CoreError::InvalidInput(format!(
            "'{}' does not describe a recurrence",
            command.input.trim()
        )))
    })?;

    print_rule(&rule, command.json)
}

/// JSON documents go through the object normalizer, everything else is
/// treated as a rule string.
fn normalize_input(input: &str) -> Result<Option<NormalizedRecurrence>> {
    let trimmed = input.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('"') || trimmed == "null" {
        let value: Value =
            serde_json::from_str(trimmed).context("Input looks like JSON but does not parse")?;
        debug!(%value, "normalizing JSON input");
        return Ok(normalize_value(&value));
    }

    debug!(input = trimmed, "normalizing rule string");
    Ok(normalize_recurrence(RecurrenceInput::RuleString(trimmed)))
}

pub(crate) fn print_rule(rule: &NormalizedRecurrence, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rule)?);
    } else {
        display_rule(rule);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_input_dispatch() {
        let from_string = normalize_input("freq=daily;interval=0").unwrap();
        assert_eq!(from_string, Some(NormalizedRecurrence::daily(1)));

        let from_json = normalize_input(r#"{"freq": "monthly", "interval": "3"}"#).unwrap();
        assert_eq!(from_json, Some(NormalizedRecurrence::monthly(3)));

        assert_eq!(normalize_input("null").unwrap(), None);
        assert!(normalize_input("{not json").is_err());
    }
}
