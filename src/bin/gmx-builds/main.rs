//! gmx-builds CLI - GROMACS build matrix planning and runtime selection

use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use gmx_builds::host::{ConfigurationError, ProbeError};
use gmx_builds::util::diagnostic::emit;
use gmx_builds::{SelectError, VariantError};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::io::stderr().is_terminal();

    if let Err(e) = run(cli) {
        std::process::exit(report(&e, color));
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("gmx_builds=debug")
    } else {
        EnvFilter::new("gmx_builds=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Matrix(args) => commands::matrix::execute(args),
        Commands::Probe(args) => commands::probe::execute(args),
        Commands::Select(args) => commands::select::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print an error and return the exit code for it.
fn report(e: &anyhow::Error, color: bool) -> i32 {
    if let Some(err) = e.downcast_ref::<SelectError>() {
        emit(&err.to_diagnostic(), color);
        return err.exit_code();
    }

    if let Some(err) = e.downcast_ref::<VariantError>() {
        emit(&err.to_diagnostic(), color);
    } else if let Some(err) = e.downcast_ref::<ProbeError>() {
        emit(&err.to_diagnostic(), color);
    } else if let Some(err) = e.downcast_ref::<ConfigurationError>() {
        emit(&err.to_diagnostic(), color);
    } else {
        eprintln!("error: {:#}", e);
    }
    1
}
