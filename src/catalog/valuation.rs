//! Value tier shown next to each record.
//!
//! The tier is derived from the midpoint of the estimated value bounds.

use super::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueTier {
    Low,
    Mid,
    High,
}

impl ValueTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueTier::Low => "low",
            ValueTier::Mid => "mid",
            ValueTier::High => "high",
        }
    }
}

impl fmt::Display for ValueTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cutoffs applied to the value midpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValuationConfig {
    /// Midpoints at or above this are at least `Mid`.
    pub mid_from: f64,
    /// Midpoints at or above this are `High`.
    pub high_from: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            mid_from: 25.0,
            high_from: 100.0,
        }
    }
}

/// Midpoint of the estimated value bounds, missing bounds counting as zero.
/// Bounds given in the wrong order produce the same midpoint.
pub fn value_midpoint(record: &Record) -> f64 {
    (record.value_low() + record.value_high()) / 2.0
}

pub fn classify_value(record: &Record, config: &ValuationConfig) -> ValueTier {
    let midpoint = value_midpoint(record);
    if midpoint < config.mid_from {
        ValueTier::Low
    } else if midpoint < config.high_from {
        ValueTier::Mid
    } else {
        ValueTier::High
    }
}
