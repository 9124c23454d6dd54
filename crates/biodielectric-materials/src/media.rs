//! Calibrated glucose-loaded media and their process-wide registry.
//!
//! A [`CalibratedMedium`] pairs a [`SinglePoleModel`] with its
//! [`AnchorTable`] and a [`CorrectionTable`]. Residual blending derives the
//! correction from the table; coefficient blending uses the medium's fixed
//! legacy coefficients. The registry builds every (medium, strategy) pair
//! once, on first use, and hands out shared references afterwards.

use std::fmt;
use std::str::FromStr;
use log::{debug, trace};
use once_cell::sync::Lazy;

use crate::constants::HZ_PER_GHZ;
use crate::correction::{Coefficients, CorrectionStrategy, CorrectionTable};
use crate::provider::{DielectricError, DispersionModel, DispersionPoint};
use crate::reference::AnchorTable;
use crate::relaxation::SinglePoleModel;

/// Glucose-loaded media with calibrated models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Medium {
    BloodPlasma,
    DeionizedWater,
}

impl Medium {
    pub const ALL: [Medium; 2] = [Medium::BloodPlasma, Medium::DeionizedWater];

    pub fn key(&self) -> &'static str {
        match self {
            Medium::BloodPlasma => "plasma",
            Medium::DeionizedWater => "water",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Medium::BloodPlasma => "Blood Plasma (Cole–Cole)",
            Medium::DeionizedWater => "De-ionized Water (Debye)",
        }
    }

    pub fn model(&self) -> SinglePoleModel {
        match self {
            Medium::BloodPlasma => SinglePoleModel::blood_plasma(),
            Medium::DeionizedWater => SinglePoleModel::deionized_water(),
        }
    }

    pub fn anchor_table(&self) -> Result<AnchorTable, DielectricError> {
        match self {
            Medium::BloodPlasma => AnchorTable::blood_plasma(),
            Medium::DeionizedWater => AnchorTable::deionized_water(),
        }
    }

    /// Fixed per-anchor coefficients of the legacy calculator.
    pub fn legacy_coefficients(&self) -> Result<CorrectionTable, DielectricError> {
        // (f/GHz, (a, b), (c, d))
        let data: &[(f64, (f64, f64), (f64, f64))] = match self {
            Medium::BloodPlasma => &[
                (0.5, (-0.005088461538990333, 73.11012377474047), (-0.017562290382174762, 2.0734308671230948)),
                (2.5, (-0.010341673171182033, 70.45308166601832), (-0.011413282710042128, 3.5196930980494745)),
                (5.0, (-0.029920370091606023, 66.54609393255069), (-0.004631947865658022, 7.105555211777496)),
                (10.0, (0.04139278837204885, 51.01564247651889), (-0.0017949573949271238, 16.945335478485262)),
            ],
            Medium::DeionizedWater => &[
                (0.5, (0.999, 0.100), (1.0005, 0.00001)),
                (2.5, (0.999, 0.800), (0.9990, 0.0008)),
                (5.0, (0.999, -0.100), (0.9985, 0.0011)),
                (10.0, (1.001, -0.050), (0.9950, 0.0500)),
            ],
        };
        CorrectionTable::from_coefficients(
            self.label(),
            data.iter()
                .map(|&(f, (a, b), (c, d))| (f, Coefficients { a, b, c, d }))
                .collect(),
        )
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Medium {
    type Err = DielectricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "plasma" | "bp" | "blood-plasma" | "blood_plasma" => Ok(Medium::BloodPlasma),
            "water" | "dw" | "deionized-water" | "deionized_water" => Ok(Medium::DeionizedWater),
            _ => Err(DielectricError::InvalidSelector {
                kind: "medium",
                key: s.to_string(),
            }),
        }
    }
}

/// A medium model corrected against its anchor table.
#[derive(Debug, Clone)]
pub struct CalibratedMedium {
    medium: Medium,
    model: SinglePoleModel,
    table: AnchorTable,
    correction: CorrectionTable,
}

impl CalibratedMedium {
    /// The built-in calibration of `medium`.
    ///
    /// Residual blending is derived from the anchor table. Coefficient
    /// blending uses [`Medium::legacy_coefficients`]; use [`with_table`]
    /// with [`CorrectionStrategy::CoefficientBlend`] to pre-fit coefficients
    /// against the table instead.
    ///
    /// [`with_table`]: CalibratedMedium::with_table
    pub fn new(medium: Medium, strategy: CorrectionStrategy) -> Result<Self, DielectricError> {
        let table = medium.anchor_table()?;
        match strategy {
            CorrectionStrategy::ResidualBlend => Self::with_table(medium, table, strategy),
            CorrectionStrategy::CoefficientBlend => Ok(Self {
                medium,
                model: medium.model(),
                table,
                correction: medium.legacy_coefficients()?,
            }),
        }
    }

    /// Calibrate `medium`'s model against a caller-supplied table.
    pub fn with_table(
        medium: Medium,
        table: AnchorTable,
        strategy: CorrectionStrategy,
    ) -> Result<Self, DielectricError> {
        let model = medium.model();
        let correction = CorrectionTable::build(&model, &table, strategy)?;
        Ok(Self {
            medium,
            model,
            table,
            correction,
        })
    }

    pub fn medium(&self) -> Medium {
        self.medium
    }

    pub fn model(&self) -> &SinglePoleModel {
        &self.model
    }

    pub fn table(&self) -> &AnchorTable {
        &self.table
    }

    pub fn correction(&self) -> &CorrectionTable {
        &self.correction
    }

    /// Corrected permittivity and conductivity at `composition` (mg/dL) and
    /// `frequency_ghz`.
    pub fn evaluate(
        &self,
        composition: f64,
        frequency_ghz: f64,
    ) -> Result<DispersionPoint, DielectricError> {
        let raw = self.model.evaluate(composition, frequency_ghz * HZ_PER_GHZ)?;
        let corrected = self.correction.apply(composition, frequency_ghz, raw);
        trace!(
            "{} c={} mg/dL f={} GHz: model={:?} corrected={:?}",
            self.medium,
            composition,
            frequency_ghz,
            raw,
            corrected
        );
        Ok(corrected)
    }
}

/// Every (medium, strategy) pair, indexed by declaration order.
struct Registry {
    entries: [[Result<CalibratedMedium, DielectricError>; 2]; 2],
}

impl Registry {
    fn build() -> Self {
        let entries = Medium::ALL
            .map(|medium| CorrectionStrategy::ALL.map(|strategy| CalibratedMedium::new(medium, strategy)));
        debug!("Calibrated media registry initialised");
        Self { entries }
    }
}

static REGISTRY: Lazy<Registry> = Lazy::new(Registry::build);

/// Shared calibrated medium for `(medium, strategy)`, built on first use.
pub fn calibrated(
    medium: Medium,
    strategy: CorrectionStrategy,
) -> Result<&'static CalibratedMedium, DielectricError> {
    REGISTRY.entries[medium as usize][strategy as usize]
        .as_ref()
        .map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_medium_keys_parse() {
        for medium in Medium::ALL {
            assert_eq!(medium.key().parse::<Medium>().unwrap(), medium);
        }
        assert_eq!("BP".parse::<Medium>().unwrap(), Medium::BloodPlasma);
        assert_eq!("dw".parse::<Medium>().unwrap(), Medium::DeionizedWater);
        assert!(matches!(
            "saline".parse::<Medium>(),
            Err(DielectricError::InvalidSelector { kind: "medium", .. })
        ));
    }

    #[test]
    fn test_registry_builds_every_pair() {
        for medium in Medium::ALL {
            for strategy in CorrectionStrategy::ALL {
                let entry = calibrated(medium, strategy).unwrap();
                assert_eq!(entry.medium(), medium);
                assert_eq!(entry.correction().strategy(), strategy);
            }
        }
    }

    #[test]
    fn test_registry_hands_out_shared_instances() {
        let a = calibrated(Medium::BloodPlasma, CorrectionStrategy::ResidualBlend).unwrap();
        let b = calibrated(Medium::BloodPlasma, CorrectionStrategy::ResidualBlend).unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_plasma_reproduces_reference_entry() {
        let plasma = calibrated(Medium::BloodPlasma, CorrectionStrategy::ResidualBlend).unwrap();
        let point = plasma.evaluate(72.0, 0.5).unwrap();
        assert_relative_eq!(point.permittivity, 72.75, epsilon = 1e-9);
        assert_relative_eq!(point.conductivity, 2.065, epsilon = 1e-9);
    }

    #[test]
    fn test_coefficient_strategy_matches_legacy_calculator() {
        let plasma = calibrated(Medium::BloodPlasma, CorrectionStrategy::CoefficientBlend).unwrap();
        let p = plasma.evaluate(600.0, 0.5).unwrap();
        assert_relative_eq!(p.permittivity, 72.65739894383307, epsilon = 1e-9);
        assert_relative_eq!(p.conductivity, 1.995314599802446, epsilon = 1e-9);

        // Between anchors the coefficients blend linearly.
        let p = plasma.evaluate(200.0, 3.7).unwrap();
        assert_relative_eq!(p.permittivity, 67.21028450696225, epsilon = 1e-9);
        assert_relative_eq!(p.conductivity, 5.201895295879633, epsilon = 1e-9);

        // Above the top anchor the 10 GHz coefficients are held.
        let p = plasma.evaluate(150.0, 20.0).unwrap();
        assert_relative_eq!(p.permittivity, 52.185868610303785, epsilon = 1e-9);
        assert_relative_eq!(p.conductivity, 16.87620956980446, epsilon = 1e-9);

        let water = calibrated(Medium::DeionizedWater, CorrectionStrategy::CoefficientBlend).unwrap();
        let p = water.evaluate(150.0, 3.0).unwrap();
        assert_relative_eq!(p.permittivity, 79.62668881218816, epsilon = 1e-9);
        assert_relative_eq!(p.conductivity, 1.9418378170413855, epsilon = 1e-9);
    }

    #[test]
    fn test_plasma_table_follows_legacy_calibration() {
        let plasma = calibrated(Medium::BloodPlasma, CorrectionStrategy::CoefficientBlend).unwrap();
        for row in plasma.table().rows() {
            for p in &row.points {
                if (row.frequency_ghz, p.composition) == (0.5, 72.0) {
                    continue;
                }
                let point = plasma.evaluate(p.composition, row.frequency_ghz).unwrap();
                assert_relative_eq!(point.permittivity, p.permittivity, epsilon = 1e-4);
                assert_relative_eq!(point.conductivity, p.conductivity, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn test_prefit_coefficients_close_to_table() {
        // Least-squares fit is not exact at the nodes, but stays close.
        let table = Medium::DeionizedWater.anchor_table().unwrap();
        let water = CalibratedMedium::with_table(
            Medium::DeionizedWater,
            table.clone(),
            CorrectionStrategy::CoefficientBlend,
        )
        .unwrap();
        for row in table.rows() {
            for p in &row.points {
                let point = water.evaluate(p.composition, row.frequency_ghz).unwrap();
                assert_relative_eq!(point.permittivity, p.permittivity, epsilon = 0.05);
                assert_relative_eq!(point.conductivity, p.conductivity, epsilon = 0.01);
            }
        }
    }
}
