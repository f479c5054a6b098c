// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Resolution of the host clock-tick length.
//!
//! `cpuacct.stat` counts CPU time in clock ticks (USER_HZ). The tick frequency
//! is queried once per run and turned into the number of seconds a single tick
//! represents:
//!
//! ```text
//! tick_rate = 1 / CLK_TCK        (100 Hz -> 0.01 s)
//! ```

use std::process::Command;

use log::info;
use nix::unistd::{SysconfVar, sysconf};
use serde::Deserialize;

use crate::errors::PlatformQueryError;

/// Seconds represented by one accounting tick. Always positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickRate(f64);

impl TickRate {
    pub fn from_ticks_per_second(ticks_per_second: i64) -> Result<Self, PlatformQueryError> {
        if ticks_per_second <= 0 {
            return Err(PlatformQueryError::NonPositive(ticks_per_second));
        }
        Ok(TickRate(1.0 / ticks_per_second as f64))
    }

    pub fn seconds_per_tick(self) -> f64 {
        self.0
    }
}

/// Something that knows the host's clock-tick frequency.
pub trait TickRateSource {
    /// Ticks per second as reported by the host. Positivity is checked by the caller.
    fn ticks_per_second(&self) -> Result<i64, PlatformQueryError>;
}

/// Queries the tick frequency once and converts it to a [`TickRate`].
pub fn resolve_tick_rate(source: &dyn TickRateSource) -> Result<TickRate, PlatformQueryError> {
    let tick_rate = TickRate::from_ticks_per_second(source.ticks_per_second()?)?;
    info!("get jiffies {} (seconds)", tick_rate.seconds_per_tick());
    Ok(tick_rate)
}

/// Parses the output of a tick-rate query: one base-10 integer, optionally
/// surrounded by whitespace.
pub fn parse_ticks_per_second(output: &str) -> Result<i64, PlatformQueryError> {
    let trimmed = output.trim();
    trimmed
        .parse::<i64>()
        .map_err(|source| PlatformQueryError::Unparsable {
            output: trimmed.to_string(),
            source,
        })
}

/// Runs an external command and reads the tick frequency from its stdout.
#[derive(Debug, Clone)]
pub struct CommandTickSource {
    program: String,
    args: Vec<String>,
}

impl CommandTickSource {
    /// `getconf CLK_TCK`
    pub fn getconf() -> Self {
        Self::new("getconf", ["CLK_TCK"])
    }

    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandTickSource {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl TickRateSource for CommandTickSource {
    fn ticks_per_second(&self) -> Result<i64, PlatformQueryError> {
        let out = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|source| PlatformQueryError::Spawn {
                command: self.program.clone(),
                source,
            })?;

        if !out.status.success() {
            return Err(PlatformQueryError::ExitStatus {
                command: self.program.clone(),
                status: out.status,
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }

        parse_ticks_per_second(&String::from_utf8_lossy(&out.stdout))
    }
}

/// Asks libc directly through `sysconf(_SC_CLK_TCK)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysconfTickSource;

impl TickRateSource for SysconfTickSource {
    fn ticks_per_second(&self) -> Result<i64, PlatformQueryError> {
        match sysconf(SysconfVar::CLK_TCK)? {
            Some(v) => Ok(i64::from(v)),
            None => Err(PlatformQueryError::Unsupported),
        }
    }
}

/// Which [`TickRateSource`] a run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TickSourceKind {
    #[default]
    Getconf,
    Sysconf,
}

impl TickSourceKind {
    pub fn source(self) -> Box<dyn TickRateSource> {
        match self {
            TickSourceKind::Getconf => Box::new(CommandTickSource::getconf()),
            TickSourceKind::Sysconf => Box::new(SysconfTickSource),
        }
    }
}
