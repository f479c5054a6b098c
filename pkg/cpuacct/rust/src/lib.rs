// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

// Correctness
#![deny(clippy::indexing_slicing)]
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

pub mod cli;
pub mod clock;
pub mod config;
mod errors;
pub mod report;
pub mod sampling;
pub mod stat;
pub mod tick;
pub mod validate;

// Re-export the public API
pub use errors::{ConfigurationError, Error, FormatError, PlatformQueryError, Result, TimingError};
pub use report::{JsonReporter, LogReporter, OutputKind, UsageReading, UsageReporter};
pub use sampling::{Observation, RunSummary, SamplingLoop, Window, run, usage_milli_cores};
pub use stat::{RawSample, STAT_FILE_NAME, StatKeys};
pub use tick::{TickRate, TickRateSource, TickSourceKind, resolve_tick_rate};
pub use validate::{CounterResetPolicy, SampleConfig, validate_args};
