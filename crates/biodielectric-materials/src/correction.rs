//! Calibration of model output against measured anchor tables.
//!
//! Two interchangeable strategies share one interface:
//!
//! - **Coefficient blend**: at each anchor frequency an affine map
//!   `ε = a·ε_model + b`, `σ = c·σ_model + d` is either pre-fitted by least
//!   squares over the anchor's compositions or loaded from a fixed set
//!   ([`CorrectionTable::from_coefficients`]).
//! - **Residual blend**: at each anchor frequency the additive residual
//!   (measured − model) is stored per composition and interpolated across
//!   normalised concentration (mg/dL ÷ 18) with a Lagrange polynomial.
//!   This reproduces every tabulated point exactly.
//!
//! In both cases the correction between two anchors is blended linearly by
//! `t = (f − f₀)/(f₁ − f₀)`; outside the anchor span the boundary anchor's
//! correction is used unchanged.

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};

use crate::constants::{mgdl_to_mmol, HZ_PER_GHZ, MIN_CORRECTION_POINTS};
use crate::interpolation::{bracket, lagrange, lerp, Bracket, Line};
use crate::provider::{DielectricError, DispersionModel, DispersionPoint};
use crate::reference::AnchorTable;

/// Selects the correction algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CorrectionStrategy {
    /// Piecewise-linear blend of per-anchor affine coefficients.
    CoefficientBlend,
    /// Piecewise-linear blend of Lagrange-interpolated residuals.
    #[default]
    ResidualBlend,
}

impl CorrectionStrategy {
    pub const ALL: [CorrectionStrategy; 2] = [
        CorrectionStrategy::CoefficientBlend,
        CorrectionStrategy::ResidualBlend,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CorrectionStrategy::CoefficientBlend => "coefficient",
            CorrectionStrategy::ResidualBlend => "residual",
        }
    }
}

impl fmt::Display for CorrectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CorrectionStrategy {
    type Err = DielectricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "coefficient" | "coefficient-blend" | "linear" => Ok(Self::CoefficientBlend),
            "residual" | "residual-blend" | "lagrange" => Ok(Self::ResidualBlend),
            _ => Err(DielectricError::InvalidSelector {
                kind: "correction strategy",
                key: s.to_string(),
            }),
        }
    }
}

/// Affine correction `(a·ε + b, c·σ + d)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl Coefficients {
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 1.0,
        d: 0.0,
    };

    fn blend(&self, other: &Self, t: f64) -> Self {
        Self {
            a: lerp(self.a, other.a, t),
            b: lerp(self.b, other.b, t),
            c: lerp(self.c, other.c, t),
            d: lerp(self.d, other.d, t),
        }
    }

    pub fn apply(&self, raw: DispersionPoint) -> DispersionPoint {
        DispersionPoint::new(
            self.a * raw.permittivity + self.b,
            self.c * raw.conductivity + self.d,
        )
    }
}

/// Additive correction `(ε + Δε, σ + Δσ)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Residual {
    pub permittivity: f64,
    pub conductivity: f64,
}

impl Residual {
    fn blend(&self, other: &Self, t: f64) -> Self {
        Self {
            permittivity: lerp(self.permittivity, other.permittivity, t),
            conductivity: lerp(self.conductivity, other.conductivity, t),
        }
    }

    pub fn apply(&self, raw: DispersionPoint) -> DispersionPoint {
        DispersionPoint::new(
            raw.permittivity + self.permittivity,
            raw.conductivity + self.conductivity,
        )
    }
}

/// The correction in effect at one (composition, frequency).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correction {
    Affine(Coefficients),
    Additive(Residual),
}

impl Correction {
    pub fn apply(&self, raw: DispersionPoint) -> DispersionPoint {
        match self {
            Correction::Affine(c) => c.apply(raw),
            Correction::Additive(r) => r.apply(raw),
        }
    }
}

/// Residual curve at one anchor, keyed by normalised concentration.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualCurve {
    nodes: Vec<f64>,
    permittivity: Vec<f64>,
    conductivity: Vec<f64>,
}

impl ResidualCurve {
    /// Normalised concentrations (mmol/L) of the interpolation nodes.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    fn at(&self, normalised: f64) -> Residual {
        Residual {
            permittivity: lagrange(&self.nodes, &self.permittivity, normalised),
            conductivity: lagrange(&self.nodes, &self.conductivity, normalised),
        }
    }
}

/// Derived, read-only correction data for one medium.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectionTable {
    CoefficientBlend {
        anchors_ghz: Vec<f64>,
        coefficients: Vec<Coefficients>,
    },
    ResidualBlend {
        anchors_ghz: Vec<f64>,
        residuals: Vec<ResidualCurve>,
    },
}

impl CorrectionTable {
    /// Derive the correction table for `model` from the measured `table`.
    ///
    /// Fails with [`DielectricError::DatasetIncomplete`] when the table has no
    /// anchors or an anchor has fewer than two distinct compositions.
    pub fn build(
        model: &dyn DispersionModel,
        table: &AnchorTable,
        strategy: CorrectionStrategy,
    ) -> Result<Self, DielectricError> {
        if table.rows().is_empty() {
            return Err(DielectricError::DatasetIncomplete {
                dataset: table.name().to_string(),
                required: 1,
                found: 0,
            });
        }

        let anchors_ghz = table.frequencies();
        let mut coefficients = Vec::new();
        let mut residuals = Vec::new();

        for row in table.rows() {
            let found = row.distinct_compositions();
            if found < MIN_CORRECTION_POINTS {
                return Err(DielectricError::DatasetIncomplete {
                    dataset: format!("{} @ {} GHz", table.name(), row.frequency_ghz),
                    required: MIN_CORRECTION_POINTS,
                    found,
                });
            }

            let mut points = row.points.clone();
            points.sort_by(|a, b| a.composition.total_cmp(&b.composition));
            points.dedup_by(|a, b| a.composition == b.composition);

            let frequency_hz = row.frequency_ghz * HZ_PER_GHZ;
            let modelled = points
                .iter()
                .map(|p| model.evaluate(p.composition, frequency_hz))
                .collect::<Result<Vec<_>, _>>()?;

            match strategy {
                CorrectionStrategy::CoefficientBlend => {
                    let eps_model: Vec<f64> = modelled.iter().map(|m| m.permittivity).collect();
                    let sig_model: Vec<f64> = modelled.iter().map(|m| m.conductivity).collect();
                    let eps_meas: Vec<f64> = points.iter().map(|p| p.permittivity).collect();
                    let sig_meas: Vec<f64> = points.iter().map(|p| p.conductivity).collect();

                    let ab = Line::least_squares(&eps_model, &eps_meas);
                    let cd = Line::least_squares(&sig_model, &sig_meas);
                    coefficients.push(Coefficients {
                        a: ab.slope,
                        b: ab.intercept,
                        c: cd.slope,
                        d: cd.intercept,
                    });
                }
                CorrectionStrategy::ResidualBlend => {
                    residuals.push(ResidualCurve {
                        nodes: points.iter().map(|p| mgdl_to_mmol(p.composition)).collect(),
                        permittivity: points
                            .iter()
                            .zip(&modelled)
                            .map(|(p, m)| p.permittivity - m.permittivity)
                            .collect(),
                        conductivity: points
                            .iter()
                            .zip(&modelled)
                            .map(|(p, m)| p.conductivity - m.conductivity)
                            .collect(),
                    });
                }
            }
        }

        debug!(
            "Built {} correction for '{}' over {} anchors",
            strategy,
            table.name(),
            anchors_ghz.len()
        );

        Ok(match strategy {
            CorrectionStrategy::CoefficientBlend => CorrectionTable::CoefficientBlend {
                anchors_ghz,
                coefficients,
            },
            CorrectionStrategy::ResidualBlend => CorrectionTable::ResidualBlend {
                anchors_ghz,
                residuals,
            },
        })
    }

    /// A coefficient-blend table from fixed per-anchor coefficients.
    ///
    /// Anchors may be given in any order. Fails with
    /// [`DielectricError::DatasetIncomplete`] when `anchors` is empty.
    pub fn from_coefficients(
        name: &str,
        mut anchors: Vec<(f64, Coefficients)>,
    ) -> Result<Self, DielectricError> {
        if anchors.is_empty() {
            return Err(DielectricError::DatasetIncomplete {
                dataset: name.to_string(),
                required: 1,
                found: 0,
            });
        }
        anchors.sort_by(|a, b| a.0.total_cmp(&b.0));
        debug!("Loaded fixed coefficients for '{}' over {} anchors", name, anchors.len());
        let (anchors_ghz, coefficients) = anchors.into_iter().unzip();
        Ok(CorrectionTable::CoefficientBlend {
            anchors_ghz,
            coefficients,
        })
    }

    pub fn strategy(&self) -> CorrectionStrategy {
        match self {
            CorrectionTable::CoefficientBlend { .. } => CorrectionStrategy::CoefficientBlend,
            CorrectionTable::ResidualBlend { .. } => CorrectionStrategy::ResidualBlend,
        }
    }

    pub fn anchors_ghz(&self) -> &[f64] {
        match self {
            CorrectionTable::CoefficientBlend { anchors_ghz, .. }
            | CorrectionTable::ResidualBlend { anchors_ghz, .. } => anchors_ghz,
        }
    }

    /// The correction in effect at `composition` (mg/dL) and `frequency_ghz`.
    pub fn correction_at(&self, composition: f64, frequency_ghz: f64) -> Correction {
        let position = bracket(self.anchors_ghz(), frequency_ghz);
        if let Bracket::Clamped(i) = position {
            warn!(
                "{} GHz is outside the anchor span; using the {} GHz correction",
                frequency_ghz,
                self.anchors_ghz()[i]
            );
        }

        match self {
            CorrectionTable::CoefficientBlend { coefficients, .. } => {
                Correction::Affine(match position {
                    Bracket::Exact(i) | Bracket::Clamped(i) => coefficients[i],
                    Bracket::Between { lo, hi, t } => coefficients[lo].blend(&coefficients[hi], t),
                })
            }
            CorrectionTable::ResidualBlend { residuals, .. } => {
                let x = mgdl_to_mmol(composition);
                Correction::Additive(match position {
                    Bracket::Exact(i) | Bracket::Clamped(i) => residuals[i].at(x),
                    Bracket::Between { lo, hi, t } => residuals[lo].at(x).blend(&residuals[hi].at(x), t),
                })
            }
        }
    }

    /// Correct raw model output at `composition` and `frequency_ghz`.
    pub fn apply(
        &self,
        composition: f64,
        frequency_ghz: f64,
        raw: DispersionPoint,
    ) -> DispersionPoint {
        self.correction_at(composition, frequency_ghz).apply(raw)
    }
}
