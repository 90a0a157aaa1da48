use cadence_core::error::CoreError;
use clap::Parser;
use owo_colors::{OwoColorize, Style};
use tracing::{warn, Level};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod views;

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.debug);

    if let Some(path) = cli.config.as_deref() {
        if !path.exists() {
            handle_error(anyhow::anyhow!(CoreError::InvalidInput(format!(
                "config file '{}' does not exist",
                path.display()
            ))));
            std::process::exit(1);
        }
    }

    let config = config::Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable configuration");
        config::Config::default()
    });

    let result = match cli.command {
        cli::Commands::Normalize(command) => commands::normalize::normalize_command(command),
        cli::Commands::Encode(command) => commands::encode::encode_command(command),
        cli::Commands::Decode(command) => commands::decode::decode_command(command),
        cli::Commands::Preview(command) => commands::preview::preview_command(command, &config),
    };

    if let Err(e) = result {
        handle_error(e);
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::WARN.to_string()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_error(err: anyhow::Error) {
    let error_style = Style::new().red().bold();

    match err.downcast_ref::<CoreError>() {
        Some(CoreError::InvalidRule(s)) => {
            eprintln!("{} Invalid rule: {}", "Error:".style(error_style), s.yellow());
            eprintln!("Expected something like FREQ=WEEKLY;INTERVAL=1;BYDAY=MO,WE");
        }
        Some(CoreError::InvalidInput(s)) => {
            eprintln!("{} Invalid input: {}", "Error:".style(error_style), s);
        }
        None => eprintln!("{} {:#}", "Error:".style(error_style), err),
    }
}
