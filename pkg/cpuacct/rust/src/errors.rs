// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::str::Utf8Error;
use std::time::Duration;

use thiserror::Error;

/// Any failure that aborts a sampling run.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    PlatformQuery(#[from] PlatformQueryError),

    #[error("failed to read cgroup file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid content in {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("cannot compute usage of {}: {source}", .path.display())]
    Timing {
        path: PathBuf,
        #[source]
        source: TimingError,
    },

    #[error("cpu ticks of {} decreased from {previous} to {current}", .path.display())]
    CounterReset {
        path: PathBuf,
        previous: i64,
        current: i64,
    },

    #[error("failed to report usage for {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Rejected inputs, detected before any sampling happens.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("invalid cgroup-path {}: {source}", .path.display())]
    CounterPath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("interval should be larger than zero, got {0}")]
    Interval(i64),

    #[error("duration should be larger than zero, got {0}")]
    Duration(i64),

    #[error("stat keys should not be empty")]
    EmptyStatKeys,
}

#[derive(Error, Debug)]
pub enum PlatformQueryError {
    #[error("failed to get jiffies: could not run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to get jiffies: {command} exited with {status}: {stderr}")]
    ExitStatus {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("failed to get jiffies: cannot parse {output:?}: {source}")]
    Unparsable {
        output: String,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid jiffies {0}")]
    NonPositive(i64),

    #[error("failed to get jiffies: sysconf(CLK_TCK): {0}")]
    Sysconf(#[from] nix::Error),

    #[error("failed to get jiffies: sysconf(CLK_TCK) is not supported on this host")]
    Unsupported,
}

/// Malformed `cpuacct.stat` content.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid rows: expected 1 to {max} lines, found {found}")]
    LineCount { found: usize, max: usize },

    #[error("invalid columns: {line:?}")]
    Columns { line: String },

    #[error("unrecognized field {field:?}")]
    UnknownField { field: String },

    #[error("invalid ticks in {line:?}: {source}")]
    Ticks {
        line: String,
        #[source]
        source: ParseIntError,
    },

    #[error("cumulative ticks overflow")]
    Overflow,

    #[error("content is not valid UTF-8: {source}")]
    Utf8 {
        #[source]
        source: Utf8Error,
    },
}

/// Elapsed time between two reads that cannot carry a rate.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TimingError {
    #[error("clock went backwards by {0:?} between reads")]
    Reversed(Duration),

    #[error("elapsed time {0:?} between reads is too small to compute a rate")]
    Degenerate(Duration),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
