//! Anchor tables for glucose-loaded blood plasma and water.
//!
//! Each table maps an anchor frequency (GHz) to the reference permittivity
//! and conductivity at a set of glucose concentrations (mg/dL). Tables are
//! embedded at compile time and are never mutated.

use crate::constants::{ANCHOR_COMPOSITIONS_MGDL, ANCHOR_FREQUENCIES_GHZ};
use crate::provider::DielectricError;

/// A measured value at one composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    /// Glucose concentration (mg/dL).
    pub composition: f64,
    pub permittivity: f64,
    /// Conductivity (S/m).
    pub conductivity: f64,
}

/// All measurements taken at one anchor frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorRow {
    pub frequency_ghz: f64,
    pub points: Vec<ReferencePoint>,
}

impl AnchorRow {
    /// Number of distinct compositions in this row.
    pub fn distinct_compositions(&self) -> usize {
        let mut cs: Vec<f64> = self.points.iter().map(|p| p.composition).collect();
        cs.sort_by(f64::total_cmp);
        cs.dedup();
        cs.len()
    }
}

/// Anchor table sorted by frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorTable {
    name: String,
    rows: Vec<AnchorRow>,
}

impl AnchorTable {
    /// Construct from rows in any order.
    pub fn new(name: impl Into<String>, mut rows: Vec<AnchorRow>) -> Self {
        rows.sort_by(|a, b| a.frequency_ghz.total_cmp(&b.frequency_ghz));
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Build from a grid of `(permittivity, conductivity)` values, one row
    /// per anchor frequency and one column per composition.
    ///
    /// Fails with [`DielectricError::DatasetIncomplete`] when the grid has a
    /// missing row or a row shorter than `compositions`.
    pub fn from_grid(
        name: impl Into<String>,
        frequencies_ghz: &[f64],
        compositions: &[f64],
        grid: &[&[(f64, f64)]],
    ) -> Result<Self, DielectricError> {
        let name = name.into();
        if grid.len() != frequencies_ghz.len() {
            return Err(DielectricError::DatasetIncomplete {
                dataset: name,
                required: frequencies_ghz.len(),
                found: grid.len(),
            });
        }

        let mut rows = Vec::with_capacity(grid.len());
        for (&frequency_ghz, values) in frequencies_ghz.iter().zip(grid) {
            if values.len() < compositions.len() {
                return Err(DielectricError::DatasetIncomplete {
                    dataset: format!("{} @ {} GHz", name, frequency_ghz),
                    required: compositions.len(),
                    found: values.len(),
                });
            }
            rows.push(AnchorRow {
                frequency_ghz,
                points: compositions
                    .iter()
                    .zip(values.iter())
                    .map(|(&composition, &(permittivity, conductivity))| ReferencePoint {
                        composition,
                        permittivity,
                        conductivity,
                    })
                    .collect(),
            });
        }
        Ok(Self::new(name, rows))
    }

    /// Blood plasma reference grid.
    ///
    /// The (72 mg/dL, 0.5 GHz) entry is measured. The remaining entries are
    /// the legacy coefficient calibration
    /// ([`Medium::legacy_coefficients`](crate::media::Medium::legacy_coefficients))
    /// evaluated at the grid nodes and rounded to four decimals.
    pub fn blood_plasma() -> Result<Self, DielectricError> {
        Self::from_grid(
            "blood plasma",
            &ANCHOR_FREQUENCIES_GHZ,
            &ANCHOR_COMPOSITIONS_MGDL,
            &[
                &[(72.75, 2.065), (72.7332, 2.0506), (72.7201, 2.0448), (72.6574, 1.9953)],
                &[(69.7149, 3.4856), (69.7097, 3.4860), (69.6897, 3.4796), (69.5858, 3.4398)],
                &[(64.5400, 7.0733), (64.5750, 7.0708), (64.5626, 7.0661), (64.4025, 7.0448)],
                &[(53.2544, 16.9115), (53.0741, 16.9099), (52.9949, 16.9080), (53.0066, 16.9007)],
            ],
        )
    }

    /// De-ionized water measurements (72–600 mg/dL).
    pub fn deionized_water() -> Result<Self, DielectricError> {
        Self::from_grid(
            "de-ionized water",
            &ANCHOR_FREQUENCIES_GHZ,
            &ANCHOR_COMPOSITIONS_MGDL,
            &[
                &[(80.94, 5.55e-2), (80.90, 5.57e-2), (80.87, 5.58e-2), (80.79, 5.62e-2)],
                &[(79.64, 13.62e-1), (79.58, 13.67e-1), (79.54, 13.70e-1), (79.43, 13.78e-1)],
                &[(75.86, 51.59e-1), (75.76, 51.71e-1), (75.69, 51.80e-1), (75.51, 52.01e-1)],
                &[(64.07, 17.00), (63.90, 17.00), (63.76, 16.99), (63.44, 16.97)],
            ],
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[AnchorRow] {
        &self.rows
    }

    /// Anchor frequencies in ascending order (GHz).
    pub fn frequencies(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.frequency_ghz).collect()
    }

    /// The measured point at an exact anchor frequency and composition.
    pub fn lookup(&self, frequency_ghz: f64, composition: f64) -> Option<&ReferencePoint> {
        self.rows
            .iter()
            .find(|r| r.frequency_ghz == frequency_ghz)?
            .points
            .iter()
            .find(|p| p.composition == composition)
    }
}
