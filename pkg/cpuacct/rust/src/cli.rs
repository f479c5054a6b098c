// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::report::OutputKind;
use crate::tick::TickSourceKind;
use crate::validate::CounterResetPolicy;

#[derive(Parser, Debug)]
#[command(name = "cgroup-parser")]
#[command(about = "a commandline tool for parsing linux cgroup files", long_about = None)]
#[command(version)]
pub struct Args {
    /// the directory path of target cgroup
    #[arg(short = 'p', long, global = true, env = "CGROUP_PARSER_CGROUP_PATH")]
    pub cgroup_path: Option<PathBuf>,

    /// YAML file with default settings; flags take precedence
    #[arg(short, long, global = true, env = "CGROUP_PARSER_CONFIG")]
    pub config: Option<PathBuf>,

    /// error, warn, info, debug or trace
    #[arg(long, global = true, env = "CGROUP_PARSER_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// sample cpuacct.stat and report the cpu usage in milli-cores
    CpuacctStat(StatArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct StatArgs {
    /// sampling interval in milliseconds
    #[arg(short, long, allow_negative_numbers = true)]
    pub interval: Option<i64>,

    /// total sampling duration in milliseconds
    #[arg(short, long, allow_negative_numbers = true)]
    pub duration: Option<i64>,

    /// where usage readings go
    #[arg(long, value_enum)]
    pub output: Option<OutputKind>,

    /// what to do when the tick counter decreases
    #[arg(long, value_enum)]
    pub on_counter_reset: Option<CounterResetPolicy>,

    /// how to query the clock-tick frequency
    #[arg(long, value_enum)]
    pub tick_source: Option<TickSourceKind>,

    /// comma separated field names accepted in cpuacct.stat
    #[arg(long, value_delimiter = ',')]
    pub stat_keys: Option<Vec<String>>,
}
