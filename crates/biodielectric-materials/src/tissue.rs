//! Tissue registry: Cole–Cole parameter sets and two-point reference tables.
//!
//! ## Available tissues
//!
//! | Key | Cole–Cole source | Reference frequencies |
//! |-----|------------------|-----------------------|
//! | `skin` | Gabriel (1996), dry skin | 0.433, 1.575 GHz |
//! | `fat` | Gabriel (1996), not infiltrated | 0.433, 1.575 GHz |
//! | `muscle` | Gabriel (1996) | 0.433, 1.575 GHz |
//! | `blood` | Gabriel (1996) | 0.433, 1.575 GHz |
//! | `bone` | Gabriel (1996), cortical | 0.433, 1.575 GHz |
//!
//! The table-fit mode replaces the Cole–Cole formula with a straight line
//! in $\log_{10} f_{\mathrm{GHz}}$ through the reference points, for both
//! $\epsilon'$ and $\tan\delta$.

use std::fmt;
use std::str::FromStr;

use crate::cole_cole::{ColeColeModel, ColeColePole};
use crate::constants::{HZ_PER_GHZ, MIN_TABLE_FIT_POINTS};
use crate::interpolation::{bracket, Bracket, Line};
use crate::provider::{check_frequency, DielectricError};

/// Tissue types with built-in parameter sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tissue {
    Skin,
    Fat,
    Muscle,
    Blood,
    Bone,
}

impl Tissue {
    pub const ALL: [Tissue; 5] = [
        Tissue::Skin,
        Tissue::Fat,
        Tissue::Muscle,
        Tissue::Blood,
        Tissue::Bone,
    ];

    /// Selector key accepted by [`FromStr`].
    pub fn key(&self) -> &'static str {
        match self {
            Tissue::Skin => "skin",
            Tissue::Fat => "fat",
            Tissue::Muscle => "muscle",
            Tissue::Blood => "blood",
            Tissue::Bone => "bone",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tissue::Skin => "Skin (dry)",
            Tissue::Fat => "Fat (not infiltrated)",
            Tissue::Muscle => "Muscle",
            Tissue::Blood => "Blood",
            Tissue::Bone => "Bone (cortical)",
        }
    }

    /// Four-pole Cole–Cole parameters.
    pub fn cole_cole(&self) -> ColeColeModel {
        let ps = 1e-12;
        let ns = 1e-9;
        let us = 1e-6;
        let ms = 1e-3;
        // (ε∞, [(Δε, τ, α); 4], σ)
        let (eps_inf, poles, sigma) = match self {
            Tissue::Skin => (
                4.0,
                [
                    ColeColePole::new(32.0, 7.234 * ps, 0.0),
                    ColeColePole::new(1100.0, 32.481 * ns, 0.20),
                    ColeColePole::new(0.0, 159.155 * us, 0.20),
                    ColeColePole::new(0.0, 15.915 * ms, 0.20),
                ],
                0.0002,
            ),
            Tissue::Fat => (
                2.5,
                [
                    ColeColePole::new(3.0, 7.958 * ps, 0.20),
                    ColeColePole::new(15.0, 15.915 * ns, 0.10),
                    ColeColePole::new(3.3e4, 159.155 * us, 0.05),
                    ColeColePole::new(1.0e7, 7.958 * ms, 0.01),
                ],
                0.010,
            ),
            Tissue::Muscle => (
                4.0,
                [
                    ColeColePole::new(50.0, 7.234 * ps, 0.10),
                    ColeColePole::new(7000.0, 353.678 * ns, 0.10),
                    ColeColePole::new(1.2e6, 318.310 * us, 0.10),
                    ColeColePole::new(2.5e7, 2.274 * ms, 0.0),
                ],
                0.200,
            ),
            Tissue::Blood => (
                4.0,
                [
                    ColeColePole::new(56.0, 8.377 * ps, 0.10),
                    ColeColePole::new(5200.0, 132.629 * ns, 0.10),
                    ColeColePole::new(0.0, 159.155 * us, 0.20),
                    ColeColePole::new(0.0, 15.915 * ms, 0.0),
                ],
                0.700,
            ),
            Tissue::Bone => (
                2.5,
                [
                    ColeColePole::new(10.0, 13.263 * ps, 0.20),
                    ColeColePole::new(180.0, 79.577 * ns, 0.20),
                    ColeColePole::new(5.0e3, 159.155 * us, 0.20),
                    ColeColePole::new(1.0e5, 15.915 * ms, 0.0),
                ],
                0.020,
            ),
        };
        ColeColeModel::new(self.label(), eps_inf, poles, sigma)
    }

    /// Measured reference points for the table-fit mode.
    pub fn reference_table(&self) -> TissueTable {
        // (f/GHz, ε', tan δ)
        let data: &[(f64, f64, f64)] = match self {
            Tissue::Skin => &[(0.433, 46.08, 0.63), (1.575, 39.28, 0.32)],
            Tissue::Fat => &[(0.433, 5.57, 0.31), (1.575, 5.37, 0.15)],
            Tissue::Muscle => &[(0.433, 56.87, 0.59), (1.575, 53.86, 0.26)],
            Tissue::Blood => &[(0.433, 63.84, 0.88), (1.575, 59.78, 0.36)],
            Tissue::Bone => &[(0.433, 13.07, 0.30), (1.575, 11.93, 0.23)],
        };
        TissueTable::new(
            self.key(),
            data.iter()
                .map(|&(frequency_ghz, permittivity, loss_tangent)| TissuePoint {
                    frequency_ghz,
                    permittivity,
                    loss_tangent,
                })
                .collect(),
        )
    }
}

impl fmt::Display for Tissue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Tissue {
    type Err = DielectricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tissue::ALL
            .into_iter()
            .find(|t| t.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DielectricError::InvalidSelector {
                kind: "tissue",
                key: s.to_string(),
            })
    }
}

/// One measured tissue reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TissuePoint {
    pub frequency_ghz: f64,
    pub permittivity: f64,
    pub loss_tangent: f64,
}

/// Permittivity and loss tangent read from a table fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableFit {
    pub permittivity: f64,
    pub loss_tangent: f64,
}

/// Reference points of one tissue, sorted by frequency.
#[derive(Debug, Clone)]
pub struct TissueTable {
    name: String,
    points: Vec<TissuePoint>,
}

impl TissueTable {
    pub fn new(name: impl Into<String>, mut points: Vec<TissuePoint>) -> Self {
        points.sort_by(|a, b| a.frequency_ghz.total_cmp(&b.frequency_ghz));
        points.dedup_by(|a, b| a.frequency_ghz == b.frequency_ghz);
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn points(&self) -> &[TissuePoint] {
        &self.points
    }

    /// Straight-line fit in log10(f/GHz) through the pair of reference
    /// points bracketing the query, or the outermost pair outside the span.
    pub fn fit_at(&self, frequency_ghz: f64) -> Result<TableFit, DielectricError> {
        check_frequency(frequency_ghz * HZ_PER_GHZ)?;
        if self.points.len() < MIN_TABLE_FIT_POINTS {
            return Err(DielectricError::DatasetIncomplete {
                dataset: self.name.clone(),
                required: MIN_TABLE_FIT_POINTS,
                found: self.points.len(),
            });
        }

        let log_f: Vec<f64> = self.points.iter().map(|p| p.frequency_ghz.log10()).collect();
        let x = frequency_ghz.log10();
        let last = log_f.len() - 1;
        let (lo, hi) = match bracket(&log_f, x) {
            Bracket::Between { lo, hi, .. } => (lo, hi),
            Bracket::Exact(i) | Bracket::Clamped(i) => {
                if i == last {
                    (last - 1, last)
                } else {
                    (i, i + 1)
                }
            }
        };

        let (p0, p1) = (&self.points[lo], &self.points[hi]);
        let eps_line = Line::through((log_f[lo], p0.permittivity), (log_f[hi], p1.permittivity));
        let tan_line = Line::through((log_f[lo], p0.loss_tangent), (log_f[hi], p1.loss_tangent));

        Ok(TableFit {
            permittivity: eps_line.evaluate(x),
            loss_tangent: tan_line.evaluate(x),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tissue_keys_round_trip() {
        for tissue in Tissue::ALL {
            assert_eq!(tissue.key().parse::<Tissue>().unwrap(), tissue);
        }
        assert_eq!("SKIN".parse::<Tissue>().unwrap(), Tissue::Skin);
        assert!(matches!(
            "liver".parse::<Tissue>(),
            Err(DielectricError::InvalidSelector { kind: "tissue", .. })
        ));
    }

    #[test]
    fn test_table_fit_reproduces_reference_points() {
        for tissue in Tissue::ALL {
            let table = tissue.reference_table();
            for p in table.points() {
                let fit = table.fit_at(p.frequency_ghz).unwrap();
                assert_relative_eq!(fit.permittivity, p.permittivity, epsilon = 1e-9);
                assert_relative_eq!(fit.loss_tangent, p.loss_tangent, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_table_fit_is_linear_in_log_frequency() {
        let table = Tissue::Muscle.reference_table();
        let pts = table.points();
        // Geometric mean of the two reference frequencies sits midway in log space.
        let f_mid = (pts[0].frequency_ghz * pts[1].frequency_ghz).sqrt();
        let fit = table.fit_at(f_mid).unwrap();
        assert_relative_eq!(
            fit.permittivity,
            0.5 * (pts[0].permittivity + pts[1].permittivity),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_table_fit_needs_two_points() {
        let table = TissueTable::new(
            "sparse",
            vec![TissuePoint {
                frequency_ghz: 1.0,
                permittivity: 40.0,
                loss_tangent: 0.3,
            }],
        );
        assert_eq!(
            table.fit_at(1.0),
            Err(DielectricError::DatasetIncomplete {
                dataset: "sparse".into(),
                required: 2,
                found: 1,
            })
        );
    }

    #[test]
    fn test_table_fit_uses_bracketing_pair() {
        let table = TissueTable::new(
            "three",
            vec![
                TissuePoint { frequency_ghz: 10.0, permittivity: 30.0, loss_tangent: 0.1 },
                TissuePoint { frequency_ghz: 0.1, permittivity: 50.0, loss_tangent: 0.5 },
                TissuePoint { frequency_ghz: 1.0, permittivity: 40.0, loss_tangent: 0.4 },
            ],
        );
        let fit = table.fit_at(10f64.sqrt()).unwrap();
        assert_relative_eq!(fit.permittivity, 35.0, epsilon = 1e-9);
        assert_relative_eq!(fit.loss_tangent, 0.25, epsilon = 1e-9);

        // Beyond the span the outermost pair is extended.
        let fit = table.fit_at(100.0).unwrap();
        assert_relative_eq!(fit.permittivity, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_skin_cole_cole_near_reference_table() {
        let r = Tissue::Skin.cole_cole().response_at(1.575e9).unwrap();
        assert_relative_eq!(r.epsilon_real, 39.28, epsilon = 0.01);
        assert_relative_eq!(r.loss_tangent, 0.32, epsilon = 0.005);
    }
}
