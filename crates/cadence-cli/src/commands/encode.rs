use anyhow::{anyhow, Result};
use cadence_core::error::CoreError;
use cadence_core::normalize::RecurrenceMetadata;
use cadence_core::{encode_rule, normalize_recurrence, RecurrenceInput};
use serde_json::json;
use tracing::debug;

use crate::cli::{EncodeCommand, RecurrenceShortcut};
use crate::parser::{parse_days_string, parse_until_date};

pub fn encode_command(command: EncodeCommand) -> Result<()> {
    let metadata = metadata_from_command(&command)?;
    debug!(?metadata, "encoding from options");

    let rule = normalize_recurrence(RecurrenceInput::Metadata(metadata)).ok_or_else(|| {
        anyhow!(CoreError::InvalidInput(format!(
            "Cannot build a rule from --every {}",
            command.every
        )))
    })?;

    println!("{}", encode_rule(&rule));
    Ok(())
}

fn metadata_from_command(command: &EncodeCommand) -> Result<RecurrenceMetadata> {
    let days = match (command.on.as_deref(), command.every.implied_days()) {
        (Some(_), Some(_)) => {
            return Err(anyhow!(CoreError::InvalidInput(format!(
                "--on cannot be combined with --every {}",
                command.every
            ))));
        }
        (Some(on), None) if command.every != RecurrenceShortcut::Weekly => {
            return Err(anyhow!(CoreError::InvalidInput(format!(
                "--on '{}' only applies to weekly rules",
                on
            ))));
        }
        (Some(days), None) | (None, Some(days)) => Some(parse_days_string(days)?),
        (None, None) => None,
    };

    let until = command
        .until
        .as_deref()
        .map(parse_until_date)
        .transpose()?;

    Ok(RecurrenceMetadata {
        frequency: Some(json!(command.every.frequency())),
        interval: Some(json!(command.interval)),
        weekdays: days.map(|days| json!(days)),
        count: command.count.map(|count| json!(count)),
        until: until.map(|date| json!(date.format("%Y-%m-%d").to_string())),
        rule: None,
    })
}
