//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// gmx-builds - Plan and select GROMACS builds per CPU capability tier
#[derive(Parser)]
#[command(name = "gmx-builds")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan one build configuration per requested engine
    Matrix(MatrixArgs),

    /// Show the SIMD tier and RDTSCP support of this host
    Probe(ProbeArgs),

    /// Print the installed binary a program would run on this host
    Select(SelectArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct MatrixArgs {
    /// Engines to build, as simd=<tier>:rdtscp=<on|off>
    ///
    /// Defaults to the configured engines, or the best engine for this host.
    #[arg(long, value_name = "SPEC", num_args = 1.., value_delimiter = ',')]
    pub engines: Vec<String>,

    /// Build with MPI
    #[arg(long)]
    pub mpi: bool,

    /// Build in double precision
    #[arg(long)]
    pub double: bool,

    /// Enable CUDA GPU support
    #[arg(long)]
    pub cuda: bool,

    /// Download and run the regression tests
    #[arg(long)]
    pub regtest: bool,

    /// Link an externally built FFTW
    #[arg(long)]
    pub external_fftw: bool,

    /// GROMACS release to build
    #[arg(long, value_name = "VERSION")]
    pub gromacs: Option<String>,

    /// Installation prefix
    #[arg(long, value_name = "DIR")]
    pub prefix: Option<PathBuf>,

    /// Detect the default engine from these flags instead of this host
    #[arg(long, value_name = "FLAGS")]
    pub flags: Option<String>,

    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ProbeArgs {
    /// Probe this flag string instead of this host
    #[arg(long, value_name = "FLAGS")]
    pub flags: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SelectArgs {
    /// Program name, e.g. gmx_mpi
    pub program: String,

    /// Installation root holding the bin.<SUFFIX> directories
    #[arg(long, value_name = "DIR", env = "GMX_BUILDS_ROOT")]
    pub root: Option<PathBuf>,

    /// Select for this flag string instead of this host
    #[arg(long, value_name = "FLAGS")]
    pub flags: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
