//! Frequency sweeps and comparison curves for charting.
//!
//! For a glucose-loaded medium, [`comparison_curves`] evaluates a fixed set
//! of reference concentrations plus the caller's own concentration over a
//! frequency grid. The result serialises to JSON for an external chart layer.

use serde::Serialize;

use biodielectric_materials::{CorrectionStrategy, DielectricError, Medium, Tissue};

use crate::properties::{dielectric, tissue_properties};
use crate::types::{PropertyResult, TissueMode};

/// Reference glucose levels (mg/dL) drawn on every comparison chart.
pub const REFERENCE_COMPOSITIONS_MGDL: [f64; 4] = [72.0, 216.0, 330.0, 600.0];

/// Two concentrations closer than this are the same curve.
const COMPOSITION_MATCH_TOLERANCE: f64 = 1e-6;

/// Default chart grid: 0.5 to 10.0 GHz in 0.5 GHz steps.
pub fn default_frequency_grid_ghz() -> Vec<f64> {
    (0..20).map(|i| 0.5 + 0.5 * i as f64).collect()
}

/// Evenly spaced grid of `points` frequencies from `start` to `stop`.
pub fn linear_grid(start: f64, stop: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + i as f64 * step).collect()
        }
    }
}

/// One concentration's permittivity and conductivity over the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub label: String,
    pub composition_mgdl: f64,
    pub permittivity: Vec<f64>,
    pub conductivity: Vec<f64>,
    /// Whether this curve belongs to the caller's concentration.
    #[serde(rename = "isUser")]
    pub is_user: bool,
}

/// Comparison curves for one medium.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveSet {
    pub medium: String,
    pub frequency_ghz: Vec<f64>,
    pub datasets: Vec<Curve>,
}

/// Build comparison curves for `medium` over `frequencies_ghz`.
///
/// If `user_composition` matches a reference concentration, that curve is
/// flagged and relabelled; otherwise an extra curve is appended.
pub fn comparison_curves(
    medium: Medium,
    strategy: CorrectionStrategy,
    user_composition: f64,
    frequencies_ghz: &[f64],
) -> Result<CurveSet, DielectricError> {
    let mut entries: Vec<(f64, String, bool)> = REFERENCE_COMPOSITIONS_MGDL
        .iter()
        .map(|&c| (c, format!("{:.0} mg/dL", c), false))
        .collect();

    match entries
        .iter_mut()
        .find(|(c, _, _)| (c - user_composition).abs() < COMPOSITION_MATCH_TOLERANCE)
    {
        Some((c, label, is_user)) => {
            *is_user = true;
            *label = format!("{:.0} mg/dL (input)", c);
        }
        None => entries.push((
            user_composition,
            format!("Input {:.2} mg/dL", user_composition),
            true,
        )),
    }

    let datasets = entries
        .into_iter()
        .map(|(composition, label, is_user)| {
            let points = frequencies_ghz
                .iter()
                .map(|&f| dielectric(medium, strategy, composition, f))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Curve {
                label,
                composition_mgdl: composition,
                permittivity: points.iter().map(|p| p.permittivity).collect(),
                conductivity: points.iter().map(|p| p.conductivity).collect(),
                is_user,
            })
        })
        .collect::<Result<Vec<_>, DielectricError>>()?;

    Ok(CurveSet {
        medium: medium.label().to_string(),
        frequency_ghz: frequencies_ghz.to_vec(),
        datasets,
    })
}

/// A tissue property sample at one frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub frequency_hz: f64,
    #[serde(flatten)]
    pub properties: PropertyResult,
}

/// Evaluate `tissue` in `mode` at every frequency in `frequencies_hz`.
pub fn tissue_sweep(
    tissue: Tissue,
    mode: TissueMode,
    frequencies_hz: &[f64],
) -> Result<Vec<SweepPoint>, DielectricError> {
    frequencies_hz
        .iter()
        .map(|&frequency_hz| {
            Ok(SweepPoint {
                frequency_hz,
                properties: tissue_properties(frequency_hz, tissue, mode)?,
            })
        })
        .collect()
}
