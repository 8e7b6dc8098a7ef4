//! Interval ladder: stage index -> days until the next review.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Strictly increasing, positive day counts. Fixed at deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct IntervalLadder(Vec<u32>);

impl IntervalLadder {
    /// Validate and build a ladder.
    pub fn new(days: Vec<u32>) -> Result<Self, ConfigurationError> {
        if days.is_empty() {
            return Err(ConfigurationError::EmptyLadder);
        }
        for (index, &d) in days.iter().enumerate() {
            if d == 0 {
                return Err(ConfigurationError::NonPositiveInterval { index });
            }
            if index > 0 && d <= days[index - 1] {
                return Err(ConfigurationError::NonIncreasing {
                    index,
                    previous: days[index - 1],
                    days: d,
                });
            }
        }
        Ok(Self(days))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a validated ladder.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest reachable stage.
    pub fn last_stage(&self) -> u32 {
        (self.0.len() - 1) as u32
    }

    /// Days scheduled for `stage`, or `None` when the stage is off the ladder.
    pub fn days(&self, stage: u32) -> Option<u32> {
        self.0.get(stage as usize).copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl Default for IntervalLadder {
    fn default() -> Self {
        Self(vec![1, 3, 7, 14, 30])
    }
}

impl TryFrom<Vec<u32>> for IntervalLadder {
    type Error = ConfigurationError;

    fn try_from(days: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<IntervalLadder> for Vec<u32> {
    fn from(ladder: IntervalLadder) -> Self {
        ladder.0
    }
}

/// Parses comma-separated day counts, e.g. `"1, 3, 7, 14, 30"`.
impl FromStr for IntervalLadder {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ConfigurationError::EmptyLadder);
        }
        let days = s
            .split(',')
            .enumerate()
            .map(|(index, part)| {
                part.trim()
                    .parse::<u32>()
                    .map_err(|_| ConfigurationError::InvalidInterval {
                        index,
                        value: part.trim().to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(days)
    }
}

impl fmt::Display for IntervalLadder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&parts.join(","))
    }
}
