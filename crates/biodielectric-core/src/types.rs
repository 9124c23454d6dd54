//! Result records and selectors shared by the façade and its callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use biodielectric_materials::DielectricError;

/// Dielectric properties at a single operating point.
///
/// Undefined quantities (e.g. the loss tangent when ε' is 0) are NaN rather
/// than errors so that a display layer can render them as "N/A".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertyResult {
    /// Relative permittivity ε'.
    pub epsilon_real: f64,
    /// Loss factor ε'' (or its conductivity equivalent σ/ωε₀).
    pub epsilon_imag: f64,
    /// Conductivity (S/m).
    pub conductivity: f64,
    /// tan δ = ε''/ε'.
    pub loss_tangent: f64,
}

/// How tissue properties are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TissueMode {
    /// Four-pole Cole–Cole dispersion.
    #[default]
    ColeCole,
    /// Straight-line fit in log-frequency through measured reference points.
    Table,
}

impl TissueMode {
    pub const ALL: [TissueMode; 2] = [TissueMode::ColeCole, TissueMode::Table];

    pub fn key(&self) -> &'static str {
        match self {
            TissueMode::ColeCole => "cole-cole",
            TissueMode::Table => "table",
        }
    }
}

impl fmt::Display for TissueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TissueMode {
    type Err = DielectricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cole-cole" | "cole_cole" | "colecole" => Ok(TissueMode::ColeCole),
            "table" | "table-fit" | "table_fit" => Ok(TissueMode::Table),
            _ => Err(DielectricError::InvalidSelector {
                kind: "mode",
                key: s.to_string(),
            }),
        }
    }
}
