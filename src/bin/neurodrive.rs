//! NeuroDrive CLI Binary
//!
//! Workspace file browser for the NeuroZsis materials catalog.

use clap::Parser;
use neurodrive::logging;
use neurodrive::tooling::cli::{Cli, CliContext};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Logging config: file settings overridden by CLI flags.
    let mut logging_config = match CliContext::load_config(cli.config.as_deref()) {
        Ok(config) => config.logging,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };
    if let Some(level) = &cli.log_level {
        logging_config.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        logging_config.format = format.clone();
    }
    if let Some(output) = &cli.log_output {
        logging_config.output = output.clone();
    }
    if let Some(file) = &cli.log_file {
        logging_config.file = Some(file.clone());
    }
    if let Err(e) = logging::init_logging(&logging_config) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    let context = match CliContext::new(
        cli.workspace.clone(),
        cli.store.clone(),
        cli.config.clone(),
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error initializing workspace: {}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
