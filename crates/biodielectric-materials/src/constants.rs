//! Physical constants and fixed calibration parameters.

/// Vacuum permittivity ε₀ (F/m).
pub const VACUUM_PERMITTIVITY: f64 = 8.854187817e-12;

/// Glucose: mg/dL per mmol/L.
pub const MGDL_PER_MMOL: f64 = 18.0;

/// Relaxation-time polynomials are expressed in picoseconds.
pub const PICOSECOND: f64 = 1e-12;

pub const HZ_PER_GHZ: f64 = 1e9;

/// Calibration anchor frequencies (GHz) of the plasma and water tables.
pub const ANCHOR_FREQUENCIES_GHZ: [f64; 4] = [0.5, 2.5, 5.0, 10.0];

/// Glucose levels (mg/dL) sampled at every anchor frequency.
pub const ANCHOR_COMPOSITIONS_MGDL: [f64; 4] = [72.0, 219.0, 330.0, 600.0];

/// Minimum distinct compositions per anchor for either correction strategy.
pub const MIN_CORRECTION_POINTS: usize = 2;

/// Minimum reference frequencies per tissue for the table-fit mode.
pub const MIN_TABLE_FIT_POINTS: usize = 2;

/// Convert a glucose concentration in mg/dL to mmol/L.
#[inline]
pub fn mgdl_to_mmol(composition_mgdl: f64) -> f64 {
    composition_mgdl / MGDL_PER_MMOL
}

/// Angular frequency ω = 2πf (rad/s) for a frequency in Hz.
#[inline]
pub fn angular_frequency(frequency_hz: f64) -> f64 {
    2.0 * std::f64::consts::PI * frequency_hz
}
