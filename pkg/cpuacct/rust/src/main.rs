// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use anyhow::Result;
use cgroup_parser::cli::{Args, Command};
use cgroup_parser::config::{Settings, load_config};
use cgroup_parser::run;
use clap::Parser;
use log::info;
use simple_logger::SimpleLogger;

fn main() -> Result<()> {
    let args = Args::parse();
    let file = load_config(args.config.as_deref())?;

    match &args.command {
        Command::CpuacctStat(stat_args) => {
            let settings = Settings::resolve(&args, stat_args, file)?;
            SimpleLogger::new().with_level(settings.log_level).init()?;
            info!(
                "cgroup-parser starting (version {})",
                env!("CARGO_PKG_VERSION")
            );

            let config = settings.sample_config()?;
            let tick_source = settings.tick_source.source();
            let mut reporter = settings.output.reporter();
            run(&config, tick_source.as_ref(), reporter.as_mut())?;
        }
    }

    Ok(())
}
