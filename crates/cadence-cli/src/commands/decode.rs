use anyhow::{Context, Result};
use cadence_core::models::NormalizedRecurrence;

use crate::cli::DecodeCommand;
use crate::commands::normalize::print_rule;

pub fn decode_command(command: DecodeCommand) -> Result<()> {
    let rule: NormalizedRecurrence = command
        .rule
        .parse()
        .with_context(|| format!("Could not decode '{}'", command.rule))?;

    print_rule(&rule, command.json)
}
