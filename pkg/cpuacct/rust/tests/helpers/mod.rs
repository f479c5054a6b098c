// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use cgroup_parser::clock::Clock;
use cgroup_parser::{
    PlatformQueryError, STAT_FILE_NAME, TickRateSource, UsageReading, UsageReporter,
};
use tempfile::TempDir;

/// A cgroup directory holding a `cpuacct.stat` file.
pub struct CgroupDir {
    dir: TempDir,
}

impl CgroupDir {
    pub fn new(initial: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STAT_FILE_NAME), initial).unwrap();
        CgroupDir { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn stat_path(&self) -> PathBuf {
        self.dir.path().join(STAT_FILE_NAME)
    }
}

pub fn stat_content(user: i64, system: i64) -> String {
    format!("user {user}\nsystem {system}\n")
}

/// What the next sleep does to the counter file.
pub enum Next {
    Write(Vec<u8>),
    Remove,
}

/// Deterministic clock. Each sleep moves time by the next step and applies
/// the next file change, simulating the kernel updating the counters.
pub struct FakeClock {
    now: SystemTime,
    steps: VecDeque<i64>,
    default_step: Duration,
    counter_path: PathBuf,
    changes: VecDeque<Next>,
    pub sleeps: Vec<Duration>,
}

impl FakeClock {
    pub fn new(counter_path: PathBuf, step: Duration) -> Self {
        FakeClock {
            now: UNIX_EPOCH + Duration::from_secs(1_700_000_000),
            steps: VecDeque::new(),
            default_step: step,
            counter_path,
            changes: VecDeque::new(),
            sleeps: Vec::new(),
        }
    }

    /// Queues file contents, one per sleep.
    pub fn then_write<I, S>(mut self, contents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.changes.extend(
            contents
                .into_iter()
                .map(|c| Next::Write(c.into().into_bytes())),
        );
        self
    }

    /// Queues raw file content for the next sleep.
    pub fn then_write_bytes(mut self, content: &[u8]) -> Self {
        self.changes.push_back(Next::Write(content.to_vec()));
        self
    }

    pub fn then_remove(mut self) -> Self {
        self.changes.push_back(Next::Remove);
        self
    }

    /// Signed millisecond steps used instead of the default step, one per sleep.
    pub fn with_steps_ms(mut self, steps: impl IntoIterator<Item = i64>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn start(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_700_000_000)
    }
}

impl Clock for FakeClock {
    fn now(&self) -> SystemTime {
        self.now
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        self.now = match self.steps.pop_front() {
            Some(ms) if ms >= 0 => self.now + Duration::from_millis(ms.unsigned_abs()),
            Some(ms) => self.now - Duration::from_millis(ms.unsigned_abs()),
            None => self.now + self.default_step,
        };
        match self.changes.pop_front() {
            Some(Next::Write(content)) => fs::write(&self.counter_path, content).unwrap(),
            Some(Next::Remove) => fs::remove_file(&self.counter_path).unwrap(),
            None => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub counter_path: PathBuf,
    pub timestamp: SystemTime,
    pub usage_milli_cores: f64,
}

#[derive(Default)]
pub struct RecordingReporter {
    pub readings: Vec<Recorded>,
}

impl RecordingReporter {
    pub fn usages(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.usage_milli_cores).collect()
    }
}

impl UsageReporter for RecordingReporter {
    fn report(&mut self, reading: &UsageReading<'_>) -> io::Result<()> {
        self.readings.push(Recorded {
            counter_path: reading.counter_path.to_path_buf(),
            timestamp: reading.timestamp,
            usage_milli_cores: reading.usage_milli_cores,
        });
        Ok(())
    }
}

pub struct FailingReporter;

impl UsageReporter for FailingReporter {
    fn report(&mut self, _: &UsageReading<'_>) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

pub struct FixedTicks(pub i64);

impl TickRateSource for FixedTicks {
    fn ticks_per_second(&self) -> Result<i64, PlatformQueryError> {
        Ok(self.0)
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}
