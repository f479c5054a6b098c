// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use serde::Deserialize;

use crate::cli::{Args, StatArgs};
use crate::errors::ConfigurationError;
use crate::report::OutputKind;
use crate::stat::StatKeys;
use crate::tick::TickSourceKind;
use crate::validate::{CounterResetPolicy, SampleConfig};

const DEFAULT_INTERVAL_MS: i64 = 1000;
const DEFAULT_DURATION_MS: i64 = 10_000;
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

/// Optional YAML settings. Every key may be overridden on the command line.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub cgroup_path: Option<PathBuf>,
    pub interval_ms: Option<i64>,
    pub duration_ms: Option<i64>,
    pub log_level: Option<String>,
    pub stat_keys: Option<Vec<String>>,
    pub on_counter_reset: Option<CounterResetPolicy>,
    pub output: Option<OutputKind>,
    pub tick_source: Option<TickSourceKind>,
}

/// Loads the YAML file when one is given. An explicitly named file must exist.
pub fn load_config(path: Option<&Path>) -> Result<FileConfig> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    let config: FileConfig =
        serde_yaml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?;
    Ok(config)
}

/// Settings for one run after layering flags over the config file over defaults.
#[derive(Debug, PartialEq)]
pub struct Settings {
    pub cgroup_path: PathBuf,
    pub interval_ms: i64,
    pub duration_ms: i64,
    pub log_level: LevelFilter,
    pub stat_keys: Vec<String>,
    pub on_counter_reset: CounterResetPolicy,
    pub output: OutputKind,
    pub tick_source: TickSourceKind,
}

impl Settings {
    pub fn resolve(args: &Args, stat: &StatArgs, file: FileConfig) -> Result<Self> {
        let cgroup_path = args
            .cgroup_path
            .clone()
            .or(file.cgroup_path)
            .ok_or_else(|| anyhow!("required flag \"cgroup-path\" not set"))?;

        let log_level = match args.log_level.as_deref().or(file.log_level.as_deref()) {
            Some(level) => level
                .parse::<LevelFilter>()
                .with_context(|| format!("invalid log level {level:?}"))?,
            None => DEFAULT_LOG_LEVEL,
        };

        Ok(Settings {
            cgroup_path,
            interval_ms: stat
                .interval
                .or(file.interval_ms)
                .unwrap_or(DEFAULT_INTERVAL_MS),
            duration_ms: stat
                .duration
                .or(file.duration_ms)
                .unwrap_or(DEFAULT_DURATION_MS),
            log_level,
            stat_keys: stat
                .stat_keys
                .clone()
                .or(file.stat_keys)
                .unwrap_or_else(|| StatKeys::default().iter().map(str::to_string).collect()),
            on_counter_reset: stat
                .on_counter_reset
                .or(file.on_counter_reset)
                .unwrap_or_default(),
            output: stat.output.or(file.output).unwrap_or_default(),
            tick_source: stat.tick_source.or(file.tick_source).unwrap_or_default(),
        })
    }

    /// Runs the argument checks and builds the sampling config.
    pub fn sample_config(&self) -> Result<SampleConfig, ConfigurationError> {
        let stat_keys = StatKeys::new(self.stat_keys.iter().cloned())?;
        Ok(
            SampleConfig::for_cgroup(&self.cgroup_path, self.interval_ms, self.duration_ms)?
                .with_stat_keys(stat_keys)
                .with_counter_reset(self.on_counter_reset),
        )
    }
}
