// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

use std::io::{self, Write};
use std::path::Path;
use std::time::SystemTime;

use log::info;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// One usage value computed from two consecutive reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageReading<'a> {
    pub counter_path: &'a Path,
    pub timestamp: SystemTime,
    pub usage_milli_cores: f64,
}

impl UsageReading<'_> {
    /// The cgroup directory holding the counter file.
    pub fn cgroup(&self) -> &Path {
        self.counter_path.parent().unwrap_or(self.counter_path)
    }
}

/// Receives every usage reading of a run, synchronously and in order.
pub trait UsageReporter {
    fn report(&mut self, reading: &UsageReading<'_>) -> io::Result<()>;
}

/// Emits readings as `info` log lines.
#[derive(Debug, Default)]
pub struct LogReporter;

impl UsageReporter for LogReporter {
    fn report(&mut self, reading: &UsageReading<'_>) -> io::Result<()> {
        info!(
            "cgroup {} cpu usage is {} (milli-cores)",
            reading.cgroup().display(),
            reading.usage_milli_cores
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    cgroup: &'a Path,
    timestamp: String,
    usage_milli_cores: f64,
}

/// Writes one JSON object per reading, newline delimited.
#[derive(Debug)]
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        JsonReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> UsageReporter for JsonReporter<W> {
    fn report(&mut self, reading: &UsageReading<'_>) -> io::Result<()> {
        let timestamp = OffsetDateTime::from(reading.timestamp)
            .format(&Rfc3339)
            .map_err(io::Error::other)?;
        let line = JsonLine {
            cgroup: reading.cgroup(),
            timestamp,
            usage_milli_cores: reading.usage_milli_cores,
        };
        serde_json::to_writer(&mut self.out, &line)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

/// Reporter selection for the command line and config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Log,
    Json,
}

impl OutputKind {
    pub fn reporter(self) -> Box<dyn UsageReporter> {
        match self {
            OutputKind::Log => Box::new(LogReporter),
            OutputKind::Json => Box::new(JsonReporter::new(io::stdout())),
        }
    }
}
