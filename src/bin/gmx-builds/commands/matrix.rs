//! `gmx-builds matrix` command

use anyhow::Result;

use crate::cli::MatrixArgs;
use crate::commands::load_config;
use gmx_builds::builder::{BuildConfiguration, BuildPlan};
use gmx_builds::ops::{plan, MatrixOptions};

pub fn execute(args: MatrixArgs) -> Result<()> {
    let config = load_config()?;

    // Flags only ever switch an option on; leaving one off defers to the config.
    let opts = MatrixOptions {
        engines: args.engines,
        mpi: args.mpi.then_some(true),
        double: args.double.then_some(true),
        cuda: args.cuda.then_some(true),
        regtest: args.regtest.then_some(true),
        external_fftw: args.external_fftw.then_some(true),
        gromacs: args.gromacs,
        prefix: args.prefix,
        flags: args.flags,
    };

    let plan = plan(&config, &opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }

    Ok(())
}

fn print_plan(plan: &BuildPlan) {
    println!(
        "GROMACS {} -> {} (wrapper `{}` in {})",
        plan.gromacs_version,
        plan.install_prefix.display(),
        plan.wrapper,
        plan.scripts_dir.display()
    );

    for config in &plan.configurations {
        println!();
        print_configuration(config);
    }
}

fn print_configuration(config: &BuildConfiguration) {
    println!("{}", config.descriptor);
    println!("  program: {}", config.program_name());
    println!("  bin:     {}", config.bin_dir.display());
    println!("  lib:     {}", config.lib_dir.display());
    println!("  build:   {}", config.build_dir);

    for step in &config.pre_build_steps {
        println!("  pre:     {}", step);
    }

    println!("  cmake:");
    for option in &config.cmake_options {
        println!("    {}", option);
    }

    for step in &config.post_install_steps {
        println!("  post:    {}", step);
    }
}
