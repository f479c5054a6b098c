// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! The fixed-interval read loop.
//!
//! Each iteration reads `cpuacct.stat`, sums its fields into a cumulative tick
//! count and, from the second iteration on, turns the difference with the
//! previous read into milli-cores:
//!
//! ```text
//! usage = (ticks_cur - ticks_prev) / elapsed_seconds * seconds_per_tick * 1000
//! ```

use std::fs;
use std::time::{Duration, SystemTime};

use log::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::errors::{Error, FormatError, Result, TimingError};
use crate::report::{UsageReading, UsageReporter};
use crate::stat::RawSample;
use crate::tick::{TickRate, TickRateSource, resolve_tick_rate};
use crate::validate::{CounterResetPolicy, SampleConfig};

/// Shortest elapsed time a rate is computed over.
const MIN_ELAPSED: Duration = Duration::from_micros(1);

/// Cumulative ticks at the time of one read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub timestamp: SystemTime,
    pub cumulative_ticks: i64,
}

/// The loop's only history: the previous observation, once there is one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Window {
    #[default]
    Empty,
    Primed(Observation),
}

impl Window {
    /// Moves `current` in as the new previous observation. Returns the
    /// `(previous, current)` pair to difference when a previous one existed.
    pub fn push(self, current: Observation) -> (Window, Option<(Observation, Observation)>) {
        let pair = match self {
            Window::Empty => None,
            Window::Primed(previous) => Some((previous, current)),
        };
        (Window::Primed(current), pair)
    }
}

/// Milli-cores consumed between two observations.
pub fn usage_milli_cores(
    previous: &Observation,
    current: &Observation,
    tick_rate: TickRate,
) -> Result<f64, TimingError> {
    let elapsed = current
        .timestamp
        .duration_since(previous.timestamp)
        .map_err(|e| TimingError::Reversed(e.duration()))?;
    if elapsed < MIN_ELAPSED {
        return Err(TimingError::Degenerate(elapsed));
    }

    // Widened so that opposite-sign extremes cannot overflow.
    let delta = i128::from(current.cumulative_ticks) - i128::from(previous.cumulative_ticks);
    Ok(delta as f64 / elapsed.as_secs_f64() * tick_rate.seconds_per_tick() * 1000.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub reads: u64,
    pub reports: u64,
}

pub struct SamplingLoop<'a, C> {
    config: &'a SampleConfig,
    tick_rate: TickRate,
    clock: C,
}

impl<'a, C: Clock> SamplingLoop<'a, C> {
    pub fn new(config: &'a SampleConfig, tick_rate: TickRate, clock: C) -> Self {
        SamplingLoop {
            config,
            tick_rate,
            clock,
        }
    }

    /// Runs `sample_count` iterations. The first error ends the run.
    pub fn run(&mut self, reporter: &mut dyn UsageReporter) -> Result<RunSummary> {
        let config = self.config;
        let path = config.counter_path();
        let mut window = Window::Empty;
        let mut summary = RunSummary::default();

        for _ in 0..config.sample_count() {
            let current = self.observe()?;
            summary.reads += 1;
            debug!(
                "read {} cumulative ticks from {}",
                current.cumulative_ticks,
                path.display()
            );

            let (next, pair) = window.push(current);
            window = next;

            if let Some((previous, current)) = pair {
                let usage_milli_cores = self.usage(&previous, &current)?;
                let reading = UsageReading {
                    counter_path: path,
                    timestamp: current.timestamp,
                    usage_milli_cores,
                };
                reporter.report(&reading).map_err(|source| Error::Report {
                    path: path.to_path_buf(),
                    source,
                })?;
                summary.reports += 1;
            }

            self.clock.sleep(config.interval());
        }

        Ok(summary)
    }

    fn observe(&self) -> Result<Observation> {
        let path = self.config.counter_path();
        let content = fs::read(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let timestamp = self.clock.now();

        let cumulative_ticks = std::str::from_utf8(&content)
            .map_err(|source| FormatError::Utf8 { source })
            .and_then(|content| RawSample::parse(content, self.config.stat_keys()))
            .and_then(|sample| sample.cumulative_ticks())
            .map_err(|source| Error::Format {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Observation {
            timestamp,
            cumulative_ticks,
        })
    }

    fn usage(&self, previous: &Observation, current: &Observation) -> Result<f64> {
        let path = self.config.counter_path();
        let usage = usage_milli_cores(previous, current, self.tick_rate).map_err(|source| {
            Error::Timing {
                path: path.to_path_buf(),
                source,
            }
        })?;
        if current.cumulative_ticks >= previous.cumulative_ticks {
            return Ok(usage);
        }

        match self.config.on_counter_reset() {
            CounterResetPolicy::Report => {
                warn!(
                    "cpu ticks of {} decreased from {} to {}, reporting negative usage",
                    path.display(),
                    previous.cumulative_ticks,
                    current.cumulative_ticks
                );
                Ok(usage)
            }
            CounterResetPolicy::Clamp => {
                warn!(
                    "cpu ticks of {} decreased from {} to {}, reporting zero usage",
                    path.display(),
                    previous.cumulative_ticks,
                    current.cumulative_ticks
                );
                Ok(0.0)
            }
            CounterResetPolicy::Fail => Err(Error::CounterReset {
                path: path.to_path_buf(),
                previous: previous.cumulative_ticks,
                current: current.cumulative_ticks,
            }),
        }
    }
}

/// Resolves the tick rate once, then samples `config` on the system clock.
pub fn run(
    config: &SampleConfig,
    tick_source: &dyn TickRateSource,
    reporter: &mut dyn UsageReporter,
) -> Result<RunSummary> {
    info!("start parse cpuacct.stat");
    let tick_rate = resolve_tick_rate(tick_source)?;
    let summary = SamplingLoop::new(config, tick_rate, SystemClock).run(reporter)?;
    info!(
        "finished sampling {}: {} reads, {} usage reports",
        config.counter_path().display(),
        summary.reads,
        summary.reports
    );
    Ok(summary)
}
