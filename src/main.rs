use anyhow::Context;
use clap::{CommandFactory, Parser};
use eid_rest::cli::{args::Args, commands};
use std::process;

/// Exit status when the reader holds no card
const EXIT_CARD_NOT_PRESENT: i32 = 2;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Without a subcommand, show help
    let Some(command_name) = args.command.as_ref().map(|command| command.name()) else {
        let _ = Args::command().print_help();
        println!();
        process::exit(0);
    };

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result: anyhow::Result<()> = runtime.block_on(async {
        commands::run(args)
            .await
            .with_context(|| format!("{} command failed", command_name))
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        let code = match error.downcast_ref::<eid_rest::Error>() {
            Some(eid_rest::Error::CardNotPresent) => EXIT_CARD_NOT_PRESENT,
            _ => 1,
        };
        process::exit(code);
    }
}
