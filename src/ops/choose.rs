//! Choosing an installed build for a program.

use std::ffi::OsStr;
use std::path::PathBuf;

use anyhow::Result;

use crate::core::catalog::INSTALL_ROOT;
use crate::ops::probe::flag_source;
use crate::runtime::{resolve, Selection};
use crate::util::config::Config;

/// Inputs to a selection.
#[derive(Debug, Clone, Default)]
pub struct ChooseOptions {
    /// Program name or invocation path
    pub program: String,
    /// Installation root, overriding the config
    pub install_root: Option<PathBuf>,
    /// Host flags to select for instead of probing the machine
    pub flags: Option<String>,
}

impl ChooseOptions {
    pub fn new(program: impl Into<String>) -> Self {
        ChooseOptions {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Installation root from the options, the config, or the default.
    pub fn install_root(&self, config: &Config) -> PathBuf {
        self.install_root
            .clone()
            .or_else(|| config.runtime.install_root.clone())
            .unwrap_or_else(|| PathBuf::from(INSTALL_ROOT))
    }
}

/// Select the installed build `opts.program` should run.
///
/// A [`crate::runtime::SelectError`] in the returned error carries the
/// exit code to use.
pub fn choose(config: &Config, opts: &ChooseOptions) -> Result<Selection> {
    let source = flag_source(opts.flags.as_deref())?;
    let root = opts.install_root(config);

    let selection = resolve(source.as_ref(), OsStr::new(&opts.program), &root)?;
    tracing::debug!(
        "`{}` resolves to {}",
        opts.program,
        selection.binary_path().display()
    );
    Ok(selection)
}
