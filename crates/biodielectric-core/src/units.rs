//! Frequency units and normalisation to Hz.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Frequency unit enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FrequencyUnit {
    Hz,
    #[serde(rename = "kHz")]
    KHz,
    MHz,
    #[default]
    GHz,
}

impl FrequencyUnit {
    pub const ALL: [FrequencyUnit; 4] = [
        FrequencyUnit::Hz,
        FrequencyUnit::KHz,
        FrequencyUnit::MHz,
        FrequencyUnit::GHz,
    ];

    /// Get the multiplier to convert to Hz
    pub fn multiplier(&self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1.0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "hz" => Some(FrequencyUnit::Hz),
            "khz" => Some(FrequencyUnit::KHz),
            "mhz" => Some(FrequencyUnit::MHz),
            "ghz" => Some(FrequencyUnit::GHz),
            _ => None,
        }
    }

    /// Parse from string, falling back to GHz for unknown units.
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Convert a value in this unit to Hz.
    #[inline]
    pub fn to_hz(&self, value: f64) -> f64 {
        value * self.multiplier()
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            FrequencyUnit::Hz => "Hz",
            FrequencyUnit::KHz => "kHz",
            FrequencyUnit::MHz => "MHz",
            FrequencyUnit::GHz => "GHz",
        }
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
