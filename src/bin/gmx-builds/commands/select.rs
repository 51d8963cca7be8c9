//! `gmx-builds select` command

use anyhow::Result;

use crate::cli::SelectArgs;
use crate::commands::load_config;
use gmx_builds::ops::{choose, ChooseOptions};

pub fn execute(args: SelectArgs) -> Result<()> {
    let config = load_config()?;

    let opts = ChooseOptions {
        program: args.program,
        install_root: args.root,
        flags: args.flags,
    };

    let selection = choose(&config, &opts)?;
    tracing::debug!("selected {} build", selection.tier);
    println!("{}", selection.binary_path().display());

    Ok(())
}
