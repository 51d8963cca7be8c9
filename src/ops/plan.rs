//! Build matrix planning.
//!
//! Merges configuration with command-line overrides and expands the
//! requested engines into a [`BuildPlan`]. When no engines are requested
//! anywhere, the host is probed and its best variant is planned.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::matrix::{default_install_prefix, BuildPlan};
use crate::core::BuildOptions;
use crate::ops::probe::probe_host;
use crate::util::config::Config;

/// Command-line overrides for a matrix plan.
///
/// `None` and empty values fall back to the configuration.
#[derive(Debug, Clone, Default)]
pub struct MatrixOptions {
    /// Variant specifications
    pub engines: Vec<String>,
    pub mpi: Option<bool>,
    pub double: Option<bool>,
    pub cuda: Option<bool>,
    pub regtest: Option<bool>,
    pub external_fftw: Option<bool>,
    /// GROMACS release
    pub gromacs: Option<String>,
    /// Installation prefix
    pub prefix: Option<PathBuf>,
    /// Host flags to detect from instead of probing the machine
    pub flags: Option<String>,
}

impl MatrixOptions {
    /// Build options with these overrides applied over `config`.
    pub fn build_options(&self, config: &Config) -> BuildOptions {
        let base = config.build_options();
        BuildOptions {
            mpi: self.mpi.unwrap_or(base.mpi),
            double: self.double.unwrap_or(base.double),
            cuda: self.cuda.unwrap_or(base.cuda),
            regtest: self.regtest.unwrap_or(base.regtest),
            external_fftw: self.external_fftw.unwrap_or(base.external_fftw),
            gromacs_version: self.gromacs.clone().unwrap_or(base.gromacs_version),
        }
    }

    /// Installation prefix from the overrides, the config, or the default.
    pub fn install_prefix(&self, config: &Config) -> PathBuf {
        self.prefix
            .clone()
            .or_else(|| config.build.prefix.clone())
            .unwrap_or_else(default_install_prefix)
    }

    /// Engines to build, probing the host when none are requested.
    pub fn engines(&self, config: &Config) -> Result<Vec<String>> {
        if !self.engines.is_empty() {
            return Ok(self.engines.clone());
        }
        if !config.build.engines.is_empty() {
            return Ok(config.build.engines.clone());
        }

        let host = probe_host(self.flags.as_deref())?;
        let engine = host.default_variant().to_string();
        tracing::info!("no engines requested, building `{}` for this host", engine);
        Ok(vec![engine])
    }
}

/// Plan the build matrix.
pub fn plan(config: &Config, opts: &MatrixOptions) -> Result<BuildPlan> {
    let options = opts.build_options(config);
    let prefix = opts.install_prefix(config);
    let engines = opts.engines(config)?;

    let plan = BuildPlan::new(&engines, &options, &prefix)?;

    tracing::debug!(
        "planned {} configuration(s) of GROMACS {}",
        plan.configurations.len(),
        plan.gromacs_version
    );

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::SimdTier;
    use crate::core::VariantError;

    #[test]
    fn test_cli_overrides_config() {
        let mut config = Config::default();
        config.build.mpi = Some(true);
        config.build.double = Some(true);
        config.build.gromacs = Some("2019.6".to_string());

        let opts = MatrixOptions {
            mpi: Some(false),
            gromacs: Some("2020.1".to_string()),
            ..Default::default()
        };

        let options = opts.build_options(&config);
        assert!(!options.mpi);
        assert!(options.double);
        assert_eq!(options.gromacs_version, "2020.1");
    }

    #[test]
    fn test_install_prefix_precedence() {
        let mut config = Config::default();
        assert_eq!(
            MatrixOptions::default().install_prefix(&config),
            PathBuf::from("/usr/local/gromacs")
        );

        config.build.prefix = Some(PathBuf::from("/opt/config"));
        assert_eq!(
            MatrixOptions::default().install_prefix(&config),
            PathBuf::from("/opt/config")
        );

        let opts = MatrixOptions {
            prefix: Some(PathBuf::from("/opt/cli")),
            ..Default::default()
        };
        assert_eq!(opts.install_prefix(&config), PathBuf::from("/opt/cli"));
    }

    #[test]
    fn test_plan_uses_configured_engines() {
        let mut config = Config::default();
        config.build.engines = vec![
            "simd=sse2:rdtscp=off".to_string(),
            "simd=avx2:rdtscp=on".to_string(),
        ];

        let plan = plan(&config, &MatrixOptions::default()).unwrap();
        let tiers: Vec<_> = plan
            .configurations
            .iter()
            .map(|c| c.descriptor.tier)
            .collect();
        assert_eq!(tiers, vec![SimdTier::Avx2, SimdTier::Sse2]);
    }

    #[test]
    fn test_plan_probes_when_no_engines() {
        let opts = MatrixOptions {
            flags: Some("fpu sse2 avx avx2 rdtscp".to_string()),
            mpi: Some(true),
            ..Default::default()
        };

        let plan = plan(&Config::default(), &opts).unwrap();
        assert_eq!(plan.configurations.len(), 1);

        let config = &plan.configurations[0];
        assert_eq!(config.descriptor.to_string(), "simd=avx2:rdtscp=on");
        assert_eq!(config.suffixes.binary, "_mpi_rdtscp");
        assert_eq!(plan.wrapper, "gmx_mpi");
    }

    #[test]
    fn test_plan_reports_invalid_engine() {
        let opts = MatrixOptions {
            engines: vec!["simd=neon:rdtscp=off".to_string()],
            ..Default::default()
        };

        let err = plan(&Config::default(), &opts).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<VariantError>(),
            Some(VariantError::InvalidValue { .. })
        ));
    }
}
