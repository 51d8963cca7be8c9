//! gmx-chooser - runs the best installed GROMACS build for this host
//!
//! Installed as the target of the per-program wrappers: the wrapper passes
//! its own invocation name followed by the user's arguments. Chooser options
//! are only recognised before the invoked name; everything from the name on
//! is forwarded untouched.

use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gmx_builds::core::catalog::INSTALL_ROOT;
use gmx_builds::ops::flag_source;
use gmx_builds::runtime::dispatch;
use gmx_builds::util::diagnostic::{emit, suggestions};
use gmx_builds::SelectError;

/// Run the most specialized installed GROMACS build this host supports
#[derive(Parser)]
#[command(name = "gmx-chooser")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Installation root holding the bin.<SUFFIX> directories
    #[arg(long, value_name = "DIR", env = "GMX_BUILDS_ROOT", default_value = INSTALL_ROOT)]
    root: PathBuf,

    /// Select for these CPU flags instead of this host's
    #[arg(long, value_name = "FLAGS")]
    flags: Option<String>,

    /// Invoked name (e.g. /usr/local/bin/gmx_mpi) followed by its arguments
    #[arg(
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    command: Vec<OsString>,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("gmx_builds=debug")
    } else {
        EnvFilter::new("gmx_builds=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            let color = std::io::stderr().is_terminal();
            if let Some(err) = e.downcast_ref::<SelectError>() {
                emit(&err.to_diagnostic().with_suggestion(suggestions::VERBOSE), color);
                std::process::exit(err.exit_code());
            }
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let Some((invoked, args)) = cli.command.split_first() else {
        anyhow::bail!("missing invoked program name");
    };

    let source = flag_source(cli.flags.as_deref())?;
    let selection = dispatch::resolve(source.as_ref(), invoked, &cli.root)?;
    dispatch::run(&selection, args)
}
