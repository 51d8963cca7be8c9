//! Build matrix generation.
//!
//! Expands a set of requested variant specifications into one
//! [`BuildConfiguration`] per distinct variant. The configurations are plain
//! data handed to whatever assembles the container recipe; nothing here
//! compiles anything.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::cmake::CmakeOptions;
use crate::core::catalog::{SimdTier, INSTALL_ROOT, PROGRAM_NAME, SCRIPTS_DIR};
use crate::core::suffix::wrapper_name;
use crate::core::{BuildOptions, SuffixSet, VariantDescriptor, VariantError};

/// Directory the GROMACS sources are unpacked under during the build.
pub const SOURCE_ROOT: &str = "/var/tmp";

/// Name of the AVX-512 FMA unit detection program.
pub const FMA_DETECTOR: &str = "identifyavx512fmaunits";

/// A command attached to a build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCommand {
    /// Program to run
    pub program: String,
    /// Arguments
    pub args: Vec<String>,
}

impl StepCommand {
    /// Create a new step command.
    pub fn new(program: impl Into<String>) -> Self {
        StepCommand {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }
}

impl fmt::Display for StepCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = vec![self.program.as_str()];
        parts.extend(self.args.iter().map(String::as_str));
        write!(f, "{}", parts.join(" "))
    }
}

/// A fully parameterized build of one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfiguration {
    /// The variant being built
    pub descriptor: VariantDescriptor,
    /// Installation prefix shared by every variant
    pub install_prefix: PathBuf,
    /// `<prefix>/bin.<TIER>`
    pub bin_dir: PathBuf,
    /// `<prefix>/lib.<TIER>`
    pub lib_dir: PathBuf,
    /// Out-of-tree build directory, relative to the source directory
    pub build_dir: String,
    /// Naming suffixes
    pub suffixes: SuffixSet,
    /// Commands run before CMake configure
    pub pre_build_steps: Vec<StepCommand>,
    /// Commands run after install
    pub post_install_steps: Vec<StepCommand>,
    /// Rendered CMake arguments
    pub cmake_options: Vec<String>,
}

impl BuildConfiguration {
    /// Construct the configuration of one variant.
    pub fn new(
        descriptor: VariantDescriptor,
        options: &BuildOptions,
        install_prefix: &Path,
    ) -> Self {
        let tier = descriptor.tier;
        let suffixes = SuffixSet::resolve(options, descriptor.rdtscp);
        let bin_dir = install_prefix.join(tier.bin_dir_name());
        let lib_dir = install_prefix.join(tier.lib_dir_name());

        let (pre_build_steps, post_install_steps) = if tier == SimdTier::most_specialized() {
            fma_detector_steps(options, &bin_dir)
        } else {
            (Vec::new(), Vec::new())
        };

        let cmake_options = CmakeOptions::for_variant(&descriptor, &suffixes, options).to_args();

        BuildConfiguration {
            descriptor,
            install_prefix: install_prefix.to_path_buf(),
            build_dir: format!("build.{}{}", tier.suffix(), suffixes.binary),
            bin_dir,
            lib_dir,
            suffixes,
            pre_build_steps,
            post_install_steps,
            cmake_options,
        }
    }

    /// File name of the main program of this variant (`gmx_mpi_rdtscp`).
    pub fn program_name(&self) -> String {
        self.suffixes.program_name(PROGRAM_NAME)
    }
}

/// Steps that build the AVX-512 FMA unit detector and install it next to
/// the AVX-512 binaries. The number of FMA units cannot be determined when
/// GROMACS itself is compiled, so the detector is shipped and run on the
/// host.
fn fma_detector_steps(
    options: &BuildOptions,
    bin_dir: &Path,
) -> (Vec<StepCommand>, Vec<StepCommand>) {
    let source_dir = Path::new(SOURCE_ROOT).join(options.source_dir_name());
    let detector = source_dir.join("bin").join(FMA_DETECTOR);
    let detector_src = source_dir
        .join("src")
        .join("gromacs")
        .join("hardware")
        .join(format!("{}.cpp", FMA_DETECTOR));

    let pre = vec![
        StepCommand::new("mkdir")
            .arg("-p")
            .arg(source_dir.join("bin").display().to_string()),
        StepCommand::new("g++")
            .args(["-O3", "-mavx512f", "-std=c++11"])
            .args([
                "-DGMX_IDENTIFY_AVX512_FMA_UNITS_STANDALONE=1",
                "-DGMX_X86_GCC_INLINE_ASM=1",
                "-DSIMD_AVX_512_CXX_SUPPORTED=1",
            ])
            .arg(detector_src.display().to_string())
            .arg("-o")
            .arg(detector.display().to_string()),
    ];

    let post = vec![StepCommand::new("cp")
        .arg(detector.display().to_string())
        .arg(bin_dir.display().to_string())];

    (pre, post)
}

/// Expand variant specifications into build configurations.
///
/// Repeated specifications, and distinct spellings of the same variant,
/// collapse to one configuration. The first invalid specification rejects
/// the whole batch. Configurations are ordered by tier priority, then with
/// RDTSCP off before on.
pub fn generate<I, S>(
    specs: I,
    options: &BuildOptions,
    install_prefix: &Path,
) -> Result<Vec<BuildConfiguration>, VariantError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let specs: BTreeSet<String> = specs
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .collect();

    let mut descriptors = BTreeSet::new();
    for spec in &specs {
        let descriptor = VariantDescriptor::parse(spec)?;
        if !descriptors.insert(descriptor) {
            tracing::debug!("`{}` duplicates an earlier engine, skipping", spec);
        }
    }

    let configurations: Vec<_> = descriptors
        .into_iter()
        .map(|descriptor| BuildConfiguration::new(descriptor, options, install_prefix))
        .collect();

    tracing::debug!(
        "generated {} build configuration(s) under {}",
        configurations.len(),
        install_prefix.display()
    );

    Ok(configurations)
}

/// Everything the recipe assembler needs for one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    /// GROMACS release being built
    pub gromacs_version: String,
    /// Installation prefix of every variant
    pub install_prefix: PathBuf,
    /// Name of the wrapper users invoke (`gmx_mpi`)
    pub wrapper: String,
    /// Directory the wrapper and chooser are installed into
    pub scripts_dir: PathBuf,
    /// One entry per distinct variant
    pub configurations: Vec<BuildConfiguration>,
}

impl BuildPlan {
    /// Generate the plan for a set of variant specifications.
    pub fn new<I, S>(
        specs: I,
        options: &BuildOptions,
        install_prefix: &Path,
    ) -> Result<Self, VariantError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let configurations = generate(specs, options, install_prefix)?;

        Ok(BuildPlan {
            gromacs_version: options.gromacs_version.clone(),
            install_prefix: install_prefix.to_path_buf(),
            wrapper: wrapper_name(options),
            scripts_dir: install_prefix.join(SCRIPTS_DIR),
            configurations,
        })
    }
}

/// The default installation prefix.
pub fn default_install_prefix() -> PathBuf {
    PathBuf::from(INSTALL_ROOT)
}
