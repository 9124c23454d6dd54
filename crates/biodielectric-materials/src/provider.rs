//! Dispersion model trait and error taxonomy.
//!
//! All dispersion models implement [`DispersionModel`], which returns the
//! complex relative permittivity at a composition and frequency, and a
//! family-specific reduction of it to real permittivity and conductivity.

use num_complex::Complex64;
use thiserror::Error;

/// Errors from dispersion models, reference tables and selectors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DielectricError {
    #[error("Frequency {frequency_hz} Hz is not a positive finite value")]
    InvalidFrequency { frequency_hz: f64 },

    #[error("Composition {composition} must be a non-negative finite value")]
    InvalidComposition { composition: f64 },

    #[error("Unknown {kind} '{key}'")]
    InvalidSelector { kind: &'static str, key: String },

    #[error("Dataset '{dataset}' is incomplete: {required} reference points required, {found} available")]
    DatasetIncomplete {
        dataset: String,
        required: usize,
        found: usize,
    },
}

/// Real permittivity and conductivity (S/m) at one operating point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispersionPoint {
    pub permittivity: f64,
    pub conductivity: f64,
}

impl DispersionPoint {
    pub fn new(permittivity: f64, conductivity: f64) -> Self {
        Self {
            permittivity,
            conductivity,
        }
    }
}

/// Provides composition- and frequency-dependent dielectric response.
///
/// Implementations are pure functions of their parameters: no state is
/// touched during evaluation, so a model can be shared across threads.
pub trait DispersionModel: Send + Sync {
    /// Human-readable name of this model.
    fn name(&self) -> &str;

    /// Complex relative permittivity $\hat\epsilon(c, f)$.
    ///
    /// Models without a composition axis ignore `composition`.
    fn complex_permittivity(
        &self,
        composition: f64,
        frequency_hz: f64,
    ) -> Result<Complex64, DielectricError>;

    /// Real permittivity and conductivity derived from
    /// [`complex_permittivity`](Self::complex_permittivity), following the
    /// sign convention of the model family.
    fn evaluate(&self, composition: f64, frequency_hz: f64)
        -> Result<DispersionPoint, DielectricError>;
}

/// Reject frequencies that are not strictly positive and finite.
pub fn check_frequency(frequency_hz: f64) -> Result<f64, DielectricError> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Ok(frequency_hz)
    } else {
        Err(DielectricError::InvalidFrequency { frequency_hz })
    }
}

/// Reject negative or non-finite compositions.
pub fn check_composition(composition: f64) -> Result<f64, DielectricError> {
    if composition.is_finite() && composition >= 0.0 {
        Ok(composition)
    } else {
        Err(DielectricError::InvalidComposition { composition })
    }
}
