//! Command implementations for the eID REST CLI
//!
//! This module wires the configuration layers, logging and the card
//! services together for each subcommand and renders the results.

use crate::app::models::{CardRecord, ReaderOutput};
use crate::app::server::{self, AppState};
use crate::app::services::card_reader::CardService;
use crate::app::services::eidenv_parser::ParsePolicy;
use crate::cli::args::{Args, Commands, OutputFormat, ParseArgs, ReadArgs, ServeArgs};
use crate::config::Config;
use crate::{Error, Result};
use chrono::NaiveDate;
use colored::*;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Main command runner
pub async fn run(args: Args) -> Result<()> {
    setup_logging(&args)?;
    debug!("Command line arguments: {:?}", args);

    let Some(command) = args.command else {
        return Err(Error::configuration("no command given"));
    };

    // Layered configuration: defaults, then environment, then flags
    let config = Config::from_env()?;

    match command {
        Commands::Serve(serve_args) => run_serve(&serve_args, config).await,
        Commands::Read(read_args) => run_read(&read_args, config).await,
        Commands::Parse(parse_args) => run_parse(&parse_args, config).await,
    }
}

/// Set up structured logging based on CLI arguments
fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("eid_rest={},tower_http={}", log_level, log_level))
    });

    let result = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    result.map_err(|e| Error::configuration(format!("failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

async fn run_serve(args: &ServeArgs, config: Config) -> Result<()> {
    let config = args.apply(config);
    config.validate_for_serve()?;
    let address = config.socket_addr()?;

    info!(
        "Serving eidenv reads from {} (timeout {}s, {:?} parsing)",
        config.eidenv_program.display(),
        config.read_timeout_secs,
        config.policy
    );

    let service = CardService::new(config.to_reader(), config.to_parser());
    let state = Arc::new(AppState::new(service, config.auth_token.clone()));
    server::serve(address, state).await
}

async fn run_read(args: &ReadArgs, config: Config) -> Result<()> {
    let config = args.reader.apply(config);
    config.validate()?;

    let service = CardService::new(config.to_reader(), config.to_parser());
    let record = tokio::select! {
        record = service.read_card() => record?,
        _ = tokio::signal::ctrl_c() => {
            return Err(Error::interrupted("card read cancelled by user"));
        }
    };

    print_record(&record, args.format)
}

async fn run_parse(args: &ParseArgs, mut config: Config) -> Result<()> {
    if args.strict {
        config = config.with_strict();
    }

    let stdout = read_input(args).await?;
    let output = ReaderOutput::new(stdout, Some(args.exit_code));
    let result = config
        .to_parser()
        .parse_with_stats(&output.text(), output.exit_code)?;

    let stats = &result.stats;
    info!(
        "Parsed {} lines: {} fields, {} noise lines",
        stats.lines_read, stats.fields_assigned, stats.noise_lines
    );
    if !stats.unknown_keys.is_empty() {
        info!("Ignored keys: {}", stats.unknown_keys.join(", "));
    }
    if config.policy == ParsePolicy::Lenient && !stats.degraded_fields.is_empty() {
        info!("Fields left empty: {}", stats.degraded_fields.join(", "));
    }

    print_record(&result.record, args.format)
}

async fn read_input(args: &ParseArgs) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if args.reads_stdin() {
        tokio::io::stdin()
            .read_to_end(&mut buffer)
            .await
            .map_err(|e| Error::io("Failed to read stdin", e))?;
    } else {
        buffer = tokio::fs::read(&args.input).await.map_err(|e| {
            Error::io(format!("Failed to read {}", args.input.display()), e)
        })?;
    }
    Ok(buffer)
}

fn print_record(record: &CardRecord, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(record)?);
        }
        OutputFormat::Text => print!("{}", format_record_text(record)),
    }
    Ok(())
}

/// Render a card record as an aligned, coloured table
pub fn format_record_text(record: &CardRecord) -> String {
    let date = |value: Option<NaiveDate>| {
        value
            .map(|day| day.format("%d.%m.%Y").to_string())
            .unwrap_or_default()
    };
    let display = |value: Option<String>| value.unwrap_or_default();

    let rows: Vec<(&str, String)> = vec![
        ("Card number", record.card_number().to_string()),
        ("Valid from", date(record.valid_from())),
        ("Valid till", date(record.valid_till())),
        (
            "Delivering municipality",
            record.delivering_municipality().to_string(),
        ),
        ("National number", record.national_number().to_string()),
        ("Name", record.name().to_string()),
        ("First names", record.first_names().to_string()),
        ("Initial", record.initial().to_string()),
        ("Nationality", record.nationality().to_string()),
        ("Birth location", record.birth_location().to_string()),
        ("Birth date", date(record.birth_date())),
        ("Gender", display(record.gender().map(|g| g.to_string()))),
        ("Noble condition", record.noble_condition().to_string()),
        (
            "Document type",
            display(record.document_type().map(|d| d.to_string())),
        ),
        (
            "Special status",
            display(record.special_status().map(|s| s.to_string())),
        ),
        ("Address", record.address().to_string()),
        ("Zipcode", record.zipcode().to_string()),
        ("Municipality", record.municipality().to_string()),
    ];

    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let mut text = format!("{}\n", "Belgian eID card".bright_green().bold());
    for (label, value) in rows {
        text.push_str(&format!(
            "  {:<width$}  {}\n",
            label.cyan(),
            value.bright_white(),
            width = width
        ));
    }
    text
}
