//! Configuration file support for gmx-builds.
//!
//! Two configuration file locations are read:
//! - Global: `~/.gmx-builds/config.toml` - User-wide defaults
//! - Project: `.gmx-builds/config.toml` - Per-image overrides
//!
//! Project config takes precedence over global config. Command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::BuildOptions;

/// Directory name used for both config locations.
pub const CONFIG_DIR_NAME: &str = ".gmx-builds";

/// gmx-builds configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Build matrix defaults
    pub build: BuildConfig,

    /// Runtime selection settings
    pub runtime: RuntimeConfig,
}

/// Defaults for `gmx-builds matrix`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Variant specifications to build when none are given
    pub engines: Vec<String>,

    pub mpi: Option<bool>,

    pub double: Option<bool>,

    pub cuda: Option<bool>,

    pub regtest: Option<bool>,

    /// Link an externally built FFTW
    pub external_fftw: Option<bool>,

    /// GROMACS release (e.g., "2020.1")
    pub gromacs: Option<String>,

    /// Installation prefix
    pub prefix: Option<PathBuf>,
}

/// Runtime selection settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Root holding the `bin.<SUFFIX>` directories
    pub install_root: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if !other.build.engines.is_empty() {
            self.build.engines = other.build.engines;
        }
        if other.build.mpi.is_some() {
            self.build.mpi = other.build.mpi;
        }
        if other.build.double.is_some() {
            self.build.double = other.build.double;
        }
        if other.build.cuda.is_some() {
            self.build.cuda = other.build.cuda;
        }
        if other.build.regtest.is_some() {
            self.build.regtest = other.build.regtest;
        }
        if other.build.external_fftw.is_some() {
            self.build.external_fftw = other.build.external_fftw;
        }
        if other.build.gromacs.is_some() {
            self.build.gromacs = other.build.gromacs;
        }
        if other.build.prefix.is_some() {
            self.build.prefix = other.build.prefix;
        }

        if other.runtime.install_root.is_some() {
            self.runtime.install_root = other.runtime.install_root;
        }
    }

    /// Build options with configured values applied over the defaults.
    pub fn build_options(&self) -> BuildOptions {
        let defaults = BuildOptions::default();
        BuildOptions {
            mpi: self.build.mpi.unwrap_or(defaults.mpi),
            double: self.build.double.unwrap_or(defaults.double),
            cuda: self.build.cuda.unwrap_or(defaults.cuda),
            regtest: self.build.regtest.unwrap_or(defaults.regtest),
            external_fftw: self.build.external_fftw.unwrap_or(defaults.external_fftw),
            gromacs_version: self
                .build
                .gromacs
                .clone()
                .unwrap_or(defaults.gromacs_version),
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.gmx-builds/config.toml)
/// 2. Global config (~/.gmx-builds/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        config.merge(Config::load_or_default(global_path));
    }

    if project_path.exists() {
        config.merge(Config::load_or_default(project_path));
    }

    config
}

/// Get the global config directory (~/.gmx-builds).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(CONFIG_DIR_NAME))
}

/// Get the global config path (~/.gmx-builds/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.gmx-builds/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(CONFIG_DIR_NAME).join("config.toml")
}

/// Load the merged configuration for a working directory.
pub fn load_for(project_root: &Path) -> Config {
    let project = project_config_path(project_root);
    match global_config_path() {
        Some(global) => load_config(&global, &project),
        None => load_config(Path::new(""), &project),
    }
}
