//! `gmx-builds probe` command

use anyhow::Result;

use crate::cli::ProbeArgs;
use gmx_builds::ops::{format_report, probe_host, ProbeReport};

pub fn execute(args: ProbeArgs) -> Result<()> {
    let host = probe_host(args.flags.as_deref())?;
    let report = ProbeReport::new(&host);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    Ok(())
}
