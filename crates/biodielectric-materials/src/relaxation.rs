//! Single-pole relaxation models for glucose-loaded blood plasma and
//! de-ionized water.
//!
//! Each model parameter is a quadratic polynomial in the glucose
//! concentration $\chi$ (mmol/L, converted from mg/dL by dividing by 18):
//!
//! $$\hat\epsilon(\chi, \omega) = \epsilon_\infty(\chi)
//!   + \frac{\Delta\epsilon(\chi)}{1 + j\omega\tau(\chi)}$$
//!
//! with $\tau$ tabulated in picoseconds. Conductivity is the loss term
//! $\omega\epsilon_0(-\mathrm{Im}\,\hat\epsilon)$, plus a static ionic
//! term $\sigma_i(\chi)$ for plasma.

use num_complex::Complex64;

use crate::constants::{angular_frequency, mgdl_to_mmol, PICOSECOND, VACUUM_PERMITTIVITY};
use crate::provider::{check_composition, check_frequency, DielectricError, DispersionModel, DispersionPoint};

/// Quadratic polynomial `a2 χ² + a1 χ + a0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadratic {
    pub a2: f64,
    pub a1: f64,
    pub a0: f64,
}

impl Quadratic {
    pub const fn new(a2: f64, a1: f64, a0: f64) -> Self {
        Self { a2, a1, a0 }
    }

    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.a2 * x * x + self.a1 * x + self.a0
    }
}

/// How the relaxation strength is tabulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelaxationStrength {
    /// $\Delta\epsilon(\chi)$ directly.
    Increment(Quadratic),
    /// Static permittivity $\epsilon_s(\chi)$; $\Delta\epsilon = \epsilon_s - \epsilon_\infty$.
    Static(Quadratic),
}

/// Model parameters resolved at one concentration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelaxationParameters {
    pub eps_inf: f64,
    pub delta_eps: f64,
    /// Relaxation time (s).
    pub tau: f64,
    /// Static ionic conductivity (S/m); zero for water.
    pub ionic_conductivity: f64,
}

impl RelaxationParameters {
    /// $\hat\epsilon$ at angular frequency `w` (rad/s).
    #[inline]
    pub fn permittivity(&self, w: f64) -> Complex64 {
        self.eps_inf + self.delta_eps / Complex64::new(1.0, w * self.tau)
    }
}

/// A single-pole relaxation model with concentration-dependent parameters.
#[derive(Debug, Clone)]
pub struct SinglePoleModel {
    name: String,
    eps_inf: Quadratic,
    strength: RelaxationStrength,
    /// Relaxation time polynomial, in picoseconds.
    tau_ps: Quadratic,
    ionic_conductivity: Option<Quadratic>,
}

impl SinglePoleModel {
    /// Construct a model from its polynomial coefficients.
    ///
    /// # Arguments
    /// * `name` - Model name.
    /// * `eps_inf` - $\epsilon_\infty(\chi)$.
    /// * `strength` - $\Delta\epsilon(\chi)$ or $\epsilon_s(\chi)$.
    /// * `tau_ps` - $\tau(\chi)$ in picoseconds.
    /// * `ionic_conductivity` - $\sigma_i(\chi)$ in S/m, if the medium carries one.
    pub fn new(
        name: impl Into<String>,
        eps_inf: Quadratic,
        strength: RelaxationStrength,
        tau_ps: Quadratic,
        ionic_conductivity: Option<Quadratic>,
    ) -> Self {
        Self {
            name: name.into(),
            eps_inf,
            strength,
            tau_ps,
            ionic_conductivity,
        }
    }

    /// Blood plasma: Cole–Cole with α ≈ 0 plus an ionic conduction term.
    pub fn blood_plasma() -> Self {
        Self::new(
            "Blood plasma (Cole–Cole)",
            Quadratic::new(0.0099, 0.047, 2.3),
            RelaxationStrength::Increment(Quadratic::new(0.0093, -0.21, 71.0)),
            Quadratic::new(0.0012, 0.23, 8.7),
            Some(Quadratic::new(0.0063, -0.14, 2.0)),
        )
    }

    /// De-ionized water: Debye relaxation without ionic conduction.
    pub fn deionized_water() -> Self {
        Self::new(
            "De-ionized water (Debye)",
            Quadratic::new(-8.214e-8, 2.148e-3, 8.722),
            RelaxationStrength::Static(Quadratic::new(2.318e-9, -2.793e-4, 81.015)),
            Quadratic::new(-8.370e-9, 5.150e-4, 8.776),
            None,
        )
    }

    /// Resolve the polynomials at a glucose concentration in mg/dL.
    pub fn parameters_at(&self, composition_mgdl: f64) -> RelaxationParameters {
        let chi = mgdl_to_mmol(composition_mgdl);
        let eps_inf = self.eps_inf.evaluate(chi);
        let delta_eps = match self.strength {
            RelaxationStrength::Increment(delta) => delta.evaluate(chi),
            RelaxationStrength::Static(eps_s) => eps_s.evaluate(chi) - eps_inf,
        };
        RelaxationParameters {
            eps_inf,
            delta_eps,
            tau: self.tau_ps.evaluate(chi) * PICOSECOND,
            ionic_conductivity: self
                .ionic_conductivity
                .map_or(0.0, |sigma| sigma.evaluate(chi)),
        }
    }
}

impl DispersionModel for SinglePoleModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn complex_permittivity(
        &self,
        composition: f64,
        frequency_hz: f64,
    ) -> Result<Complex64, DielectricError> {
        check_composition(composition)?;
        check_frequency(frequency_hz)?;

        let w = angular_frequency(frequency_hz);
        Ok(self.parameters_at(composition).permittivity(w))
    }

    fn evaluate(
        &self,
        composition: f64,
        frequency_hz: f64,
    ) -> Result<DispersionPoint, DielectricError> {
        check_composition(composition)?;
        check_frequency(frequency_hz)?;

        let p = self.parameters_at(composition);
        let w = angular_frequency(frequency_hz);
        let eps = p.permittivity(w);
        // Loss convention of the calibration tables: σ = σ_i + ωε₀(−Im ε̂).
        let conductivity = p.ionic_conductivity + w * VACUUM_PERMITTIVITY * (-eps.im);
        Ok(DispersionPoint::new(eps.re, conductivity))
    }
}
