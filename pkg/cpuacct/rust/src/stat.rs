// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2025-present Datadog, Inc.

//! Parsing of `cpuacct.stat`.
//!
//! The cgroup v1 cpuacct controller exposes cumulative CPU time in clock ticks:
//!
//! ```text
//! user 4253
//! system 1120
//! ```

use std::collections::BTreeSet;

use crate::errors::{ConfigurationError, FormatError};

/// Name of the accounting file inside a cgroup directory.
pub const STAT_FILE_NAME: &str = "cpuacct.stat";

const DEFAULT_KEYS: [&str; 2] = ["user", "system"];

/// Field names accepted in `cpuacct.stat`. Never empty.
///
/// The number of lines a file may hold is bounded by the size of this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatKeys(BTreeSet<String>);

impl StatKeys {
    pub fn new<I, S>(keys: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: BTreeSet<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(ConfigurationError::EmptyStatKeys);
        }
        Ok(StatKeys(keys))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for StatKeys {
    fn default() -> Self {
        StatKeys(DEFAULT_KEYS.iter().map(|k| k.to_string()).collect())
    }
}

/// The fields of one `cpuacct.stat` read, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSample {
    fields: Vec<(String, i64)>,
}

impl RawSample {
    /// Parses file content against the recognized `keys`.
    pub fn parse(content: &str, keys: &StatKeys) -> Result<Self, FormatError> {
        let lines: Vec<&str> = content
            .trim()
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect();

        if lines.is_empty() || lines.len() > keys.len() {
            return Err(FormatError::LineCount {
                found: lines.len(),
                max: keys.len(),
            });
        }

        let mut fields = Vec::with_capacity(lines.len());
        for line in lines {
            let mut columns = line.split_whitespace();
            let (Some(name), Some(ticks), None) = (columns.next(), columns.next(), columns.next())
            else {
                return Err(FormatError::Columns {
                    line: line.to_string(),
                });
            };

            if !keys.contains(name) {
                return Err(FormatError::UnknownField {
                    field: name.to_string(),
                });
            }

            let ticks = ticks.parse::<i64>().map_err(|source| FormatError::Ticks {
                line: line.to_string(),
                source,
            })?;
            fields.push((name.to_string(), ticks));
        }

        Ok(RawSample { fields })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, i64)> {
        self.fields.iter().map(|(name, ticks)| (name.as_str(), *ticks))
    }

    /// Sum of all field values.
    pub fn cumulative_ticks(&self) -> Result<i64, FormatError> {
        self.fields
            .iter()
            .try_fold(0i64, |acc, (_, ticks)| acc.checked_add(*ticks))
            .ok_or(FormatError::Overflow)
    }
}
