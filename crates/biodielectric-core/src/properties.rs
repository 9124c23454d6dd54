//! Property façade: unit normalisation, selector dispatch and result packaging.
//!
//! Callers hand in raw (frequency, unit, selector, mode) values and receive
//! a [`PropertyResult`]. Selector and dataset problems are returned as
//! [`DielectricError`]s; mathematically undefined values are NaN.

use log::trace;

use biodielectric_materials::constants::{angular_frequency, HZ_PER_GHZ, VACUUM_PERMITTIVITY};
use biodielectric_materials::media::calibrated;
use biodielectric_materials::provider::check_frequency;
use biodielectric_materials::{CorrectionStrategy, DielectricError, DispersionPoint, Medium, Tissue};

use crate::types::{PropertyResult, TissueMode};
use crate::units::FrequencyUnit;

/// Corrected blood-plasma permittivity and conductivity.
///
/// # Arguments
/// * `composition_mgdl` - Glucose concentration (mg/dL), ≥ 0.
/// * `frequency_ghz` - Frequency (GHz), > 0.
pub fn dielectric_bp(
    composition_mgdl: f64,
    frequency_ghz: f64,
) -> Result<DispersionPoint, DielectricError> {
    dielectric(
        Medium::BloodPlasma,
        CorrectionStrategy::default(),
        composition_mgdl,
        frequency_ghz,
    )
}

/// Corrected de-ionized water permittivity and conductivity.
pub fn dielectric_dw(
    composition_mgdl: f64,
    frequency_ghz: f64,
) -> Result<DispersionPoint, DielectricError> {
    dielectric(
        Medium::DeionizedWater,
        CorrectionStrategy::default(),
        composition_mgdl,
        frequency_ghz,
    )
}

/// Corrected permittivity and conductivity of `medium` under `strategy`.
pub fn dielectric(
    medium: Medium,
    strategy: CorrectionStrategy,
    composition_mgdl: f64,
    frequency_ghz: f64,
) -> Result<DispersionPoint, DielectricError> {
    calibrated(medium, strategy)?.evaluate(composition_mgdl, frequency_ghz)
}

/// Loss tangent tan δ = σ / (ωε₀ε').
///
/// Returns NaN when `epsilon_real` is 0 or the frequency is not positive.
pub fn compute_loss_tangent(epsilon_real: f64, conductivity: f64, frequency_ghz: f64) -> f64 {
    if epsilon_real == 0.0 || !(frequency_ghz > 0.0) {
        return f64::NAN;
    }
    let w = angular_frequency(frequency_ghz * HZ_PER_GHZ);
    conductivity / (w * VACUUM_PERMITTIVITY * epsilon_real)
}

/// Tissue properties at `frequency_hz` for selector keys such as
/// `("skin", "table")` or `("muscle", "cole-cole")`.
pub fn compute_properties(
    frequency_hz: f64,
    tissue_key: &str,
    mode_key: &str,
) -> Result<PropertyResult, DielectricError> {
    let tissue: Tissue = tissue_key.parse()?;
    let mode: TissueMode = mode_key.parse()?;
    tissue_properties(frequency_hz, tissue, mode)
}

/// Like [`compute_properties`], with the frequency given in `unit`.
/// Unknown units are read as GHz.
pub fn compute(
    frequency: f64,
    unit: &str,
    tissue_key: &str,
    mode_key: &str,
) -> Result<PropertyResult, DielectricError> {
    let frequency_hz = FrequencyUnit::parse_or_default(unit).to_hz(frequency);
    compute_properties(frequency_hz, tissue_key, mode_key)
}

/// Tissue properties for already-resolved selectors.
pub fn tissue_properties(
    frequency_hz: f64,
    tissue: Tissue,
    mode: TissueMode,
) -> Result<PropertyResult, DielectricError> {
    check_frequency(frequency_hz)?;

    let result = match mode {
        TissueMode::ColeCole => {
            let r = tissue.cole_cole().response_at(frequency_hz)?;
            PropertyResult {
                epsilon_real: r.epsilon_real,
                epsilon_imag: r.epsilon_imag,
                conductivity: r.conductivity,
                loss_tangent: r.loss_tangent,
            }
        }
        TissueMode::Table => {
            let fit = tissue.reference_table().fit_at(frequency_hz / HZ_PER_GHZ)?;
            let epsilon_imag = (fit.permittivity * fit.loss_tangent).abs();
            PropertyResult {
                epsilon_real: fit.permittivity,
                epsilon_imag,
                conductivity: angular_frequency(frequency_hz) * VACUUM_PERMITTIVITY * epsilon_imag,
                loss_tangent: fit.loss_tangent,
            }
        }
    };

    trace!("{} ({}) at {} Hz: {:?}", tissue, mode, frequency_hz, result);
    Ok(result)
}

/// Properties of a glucose-loaded medium at `frequency_hz`.
///
/// ε'' is reported as the conductivity equivalent σ/(ωε₀).
pub fn medium_properties(
    frequency_hz: f64,
    medium: Medium,
    strategy: CorrectionStrategy,
    composition_mgdl: f64,
) -> Result<PropertyResult, DielectricError> {
    let frequency_ghz = frequency_hz / HZ_PER_GHZ;
    let point = dielectric(medium, strategy, composition_mgdl, frequency_ghz)?;
    let w = angular_frequency(frequency_hz);

    Ok(PropertyResult {
        epsilon_real: point.permittivity,
        epsilon_imag: point.conductivity / (w * VACUUM_PERMITTIVITY),
        conductivity: point.conductivity,
        loss_tangent: compute_loss_tangent(point.permittivity, point.conductivity, frequency_ghz),
    })
}

/// Like [`medium_properties`], with selector keys and the frequency given
/// in `unit`. Uses the default correction strategy.
pub fn compute_medium(
    frequency: f64,
    unit: &str,
    medium_key: &str,
    composition_mgdl: f64,
) -> Result<PropertyResult, DielectricError> {
    let medium: Medium = medium_key.parse()?;
    let frequency_hz = FrequencyUnit::parse_or_default(unit).to_hz(frequency);
    medium_properties(
        frequency_hz,
        medium,
        CorrectionStrategy::default(),
        composition_mgdl,
    )
}
