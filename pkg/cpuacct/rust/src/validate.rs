// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::ConfigurationError;
use crate::stat::{STAT_FILE_NAME, StatKeys};

/// What to do when the cumulative tick counter goes down between two reads.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CounterResetPolicy {
    /// Report the negative usage as computed.
    #[default]
    Report,
    /// Report zero usage instead.
    Clamp,
    /// Abort the run.
    Fail,
}

/// Checks the sampling arguments without touching the counter file's content.
///
/// Checks run in order and the first violation is returned.
pub fn validate_args(
    counter_path: &Path,
    interval_ms: i64,
    duration_ms: i64,
) -> Result<(), ConfigurationError> {
    fs::metadata(counter_path).map_err(|source| ConfigurationError::CounterPath {
        path: counter_path.to_path_buf(),
        source,
    })?;
    if interval_ms <= 0 {
        return Err(ConfigurationError::Interval(interval_ms));
    }
    if duration_ms <= 0 {
        return Err(ConfigurationError::Duration(duration_ms));
    }
    Ok(())
}

/// A validated sampling run against a single `cpuacct.stat` file.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    counter_path: PathBuf,
    interval: Duration,
    total_duration: Duration,
    stat_keys: StatKeys,
    on_counter_reset: CounterResetPolicy,
}

impl SampleConfig {
    /// Validates and builds a config for `<cgroup_path>/cpuacct.stat`.
    pub fn for_cgroup(
        cgroup_path: &Path,
        interval_ms: i64,
        duration_ms: i64,
    ) -> Result<Self, ConfigurationError> {
        Self::new(cgroup_path.join(STAT_FILE_NAME), interval_ms, duration_ms)
    }

    pub fn new(
        counter_path: PathBuf,
        interval_ms: i64,
        duration_ms: i64,
    ) -> Result<Self, ConfigurationError> {
        validate_args(&counter_path, interval_ms, duration_ms)?;
        Ok(SampleConfig {
            counter_path,
            interval: Duration::from_millis(interval_ms.unsigned_abs()),
            total_duration: Duration::from_millis(duration_ms.unsigned_abs()),
            stat_keys: StatKeys::default(),
            on_counter_reset: CounterResetPolicy::default(),
        })
    }

    pub fn with_stat_keys(mut self, stat_keys: StatKeys) -> Self {
        self.stat_keys = stat_keys;
        self
    }

    pub fn with_counter_reset(mut self, policy: CounterResetPolicy) -> Self {
        self.on_counter_reset = policy;
        self
    }

    pub fn counter_path(&self) -> &Path {
        &self.counter_path
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Field names accepted in the counter file.
    pub fn stat_keys(&self) -> &StatKeys {
        &self.stat_keys
    }

    pub fn on_counter_reset(&self) -> CounterResetPolicy {
        self.on_counter_reset
    }

    /// Number of reads in the run. Truncating division.
    pub fn sample_count(&self) -> u64 {
        let interval = self.interval.as_millis();
        u64::try_from(self.total_duration.as_millis() / interval).unwrap_or(u64::MAX)
    }
}
