//! Multi-pole Cole–Cole dispersion for biological tissues.
//!
//! $$\hat\epsilon(\omega) = \epsilon_\infty
//!   + \sum_{i=1}^{4} \frac{\Delta\epsilon_i}{1 + (j\omega\tau_i)^{1-\alpha_i}}
//!   + \frac{\sigma_i}{j\omega\epsilon_0}$$
//!
//! Reference: S. Gabriel, R. W. Lau and C. Gabriel, *Phys. Med. Biol.*
//! **41**, 2271 (1996).

use num_complex::Complex64;

use crate::constants::{angular_frequency, VACUUM_PERMITTIVITY};
use crate::provider::{check_frequency, DielectricError, DispersionModel, DispersionPoint};

/// Number of relaxation poles in a tissue parameter set.
pub const POLE_COUNT: usize = 4;

/// One Cole–Cole relaxation term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColeColePole {
    pub delta_eps: f64,
    /// Relaxation time (s).
    pub tau: f64,
    /// Broadening exponent, 0 for a Debye pole.
    pub alpha: f64,
}

impl ColeColePole {
    /// Placeholder pole that contributes nothing.
    pub const INERT: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(delta_eps: f64, tau: f64, alpha: f64) -> Self {
        Self {
            delta_eps,
            tau,
            alpha,
        }
    }

    /// Poles with zero strength or zero relaxation time are skipped.
    pub fn is_inert(&self) -> bool {
        self.delta_eps == 0.0 || self.tau == 0.0
    }

    fn contribution(&self, w: f64) -> Complex64 {
        let jwt = Complex64::new(0.0, w * self.tau);
        self.delta_eps / (1.0 + jwt.powf(1.0 - self.alpha))
    }
}

/// Tissue response at one frequency, in the tissue sign convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TissueResponse {
    /// Re(ε̂), floored at 0.
    pub epsilon_real: f64,
    /// |Im(ε̂)|.
    pub epsilon_imag: f64,
    /// ωε₀|Im(ε̂)| (S/m).
    pub conductivity: f64,
    /// |Im(ε̂)| / Re(ε̂), NaN when Re(ε̂) is 0.
    pub loss_tangent: f64,
}

/// Four-pole Cole–Cole parameter set with static ionic conductivity.
#[derive(Debug, Clone)]
pub struct ColeColeModel {
    name: String,
    eps_inf: f64,
    poles: [ColeColePole; POLE_COUNT],
    ionic_conductivity: f64,
}

impl ColeColeModel {
    pub fn new(
        name: impl Into<String>,
        eps_inf: f64,
        poles: [ColeColePole; POLE_COUNT],
        ionic_conductivity: f64,
    ) -> Self {
        Self {
            name: name.into(),
            eps_inf,
            poles,
            ionic_conductivity,
        }
    }

    pub fn eps_inf(&self) -> f64 {
        self.eps_inf
    }

    pub fn poles(&self) -> &[ColeColePole; POLE_COUNT] {
        &self.poles
    }

    pub fn ionic_conductivity(&self) -> f64 {
        self.ionic_conductivity
    }

    /// Complex permittivity at `frequency_hz`.
    pub fn permittivity_at(&self, frequency_hz: f64) -> Result<Complex64, DielectricError> {
        check_frequency(frequency_hz)?;
        let w = angular_frequency(frequency_hz);

        let relaxation: Complex64 = self
            .poles
            .iter()
            .filter(|pole| !pole.is_inert())
            .map(|pole| pole.contribution(w))
            .sum();
        let conduction = self.ionic_conductivity / Complex64::new(0.0, w * VACUUM_PERMITTIVITY);

        Ok(self.eps_inf + relaxation + conduction)
    }

    /// Evaluate permittivity, loss and conductivity at `frequency_hz`.
    pub fn response_at(&self, frequency_hz: f64) -> Result<TissueResponse, DielectricError> {
        let eps = self.permittivity_at(frequency_hz)?;
        let w = angular_frequency(frequency_hz);

        let epsilon_real = eps.re.max(0.0);
        let epsilon_imag = eps.im.abs();
        let loss_tangent = if epsilon_real == 0.0 {
            f64::NAN
        } else {
            epsilon_imag / epsilon_real
        };

        Ok(TissueResponse {
            epsilon_real,
            epsilon_imag,
            conductivity: w * VACUUM_PERMITTIVITY * epsilon_imag,
            loss_tangent,
        })
    }
}

impl DispersionModel for ColeColeModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn complex_permittivity(
        &self,
        _composition: f64,
        frequency_hz: f64,
    ) -> Result<Complex64, DielectricError> {
        self.permittivity_at(frequency_hz)
    }

    fn evaluate(
        &self,
        _composition: f64,
        frequency_hz: f64,
    ) -> Result<DispersionPoint, DielectricError> {
        let r = self.response_at(frequency_hz)?;
        Ok(DispersionPoint::new(r.epsilon_real, r.conductivity))
    }
}
