//! End-to-end checks of the property façade against the calibration data.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use biodielectric_core::sweep::{comparison_curves, default_frequency_grid_ghz, tissue_sweep};
use biodielectric_core::{
    compute, compute_medium, compute_properties, dielectric, dielectric_bp, dielectric_dw,
    CorrectionStrategy, DielectricError, Medium, Tissue, TissueMode,
};
use biodielectric_materials::constants::{ANCHOR_COMPOSITIONS_MGDL, ANCHOR_FREQUENCIES_GHZ};
use biodielectric_materials::media::calibrated;
use biodielectric_materials::DispersionModel;

#[test]
fn test_blood_plasma_reference_entry() {
    let p = dielectric_bp(72.0, 0.5).unwrap();
    assert_abs_diff_eq!(p.permittivity, 72.75, epsilon = 1e-3);
    assert_abs_diff_eq!(p.conductivity, 2.065, epsilon = 1e-3);
}

#[test]
fn test_residual_strategy_reproduces_every_anchor() {
    for medium in Medium::ALL {
        let table = medium.anchor_table().unwrap();
        for row in table.rows() {
            for point in &row.points {
                let p = dielectric(
                    medium,
                    CorrectionStrategy::ResidualBlend,
                    point.composition,
                    row.frequency_ghz,
                )
                .unwrap();
                assert_relative_eq!(p.permittivity, point.permittivity, epsilon = 1e-9);
                assert_relative_eq!(p.conductivity, point.conductivity, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn test_water_entry_point_matches_registry() {
    let direct = dielectric_dw(150.0, 3.0).unwrap();
    let via = dielectric(
        Medium::DeionizedWater,
        CorrectionStrategy::default(),
        150.0,
        3.0,
    )
    .unwrap();
    assert_eq!(direct, via);
}

#[test]
fn test_corrected_output_is_continuous_across_anchors() {
    let h = 1e-7;
    for medium in Medium::ALL {
        for strategy in CorrectionStrategy::ALL {
            for &f in &ANCHOR_FREQUENCIES_GHZ[1..3] {
                for &c in &[90.0, 250.0, 450.0] {
                    let below = dielectric(medium, strategy, c, f - h).unwrap();
                    let above = dielectric(medium, strategy, c, f + h).unwrap();
                    assert_abs_diff_eq!(below.permittivity, above.permittivity, epsilon = 1e-4);
                    assert_abs_diff_eq!(below.conductivity, above.conductivity, epsilon = 1e-4);
                }
            }
        }
    }
}

#[test]
fn test_dense_sweep_between_anchors_has_no_jumps() {
    const STEPS: usize = 400;
    // Upper bound on |d(value)/df| per GHz for these media.
    const MAX_SLOPE: f64 = 50.0;

    for medium in Medium::ALL {
        let table = medium.anchor_table().unwrap();
        for strategy in CorrectionStrategy::ALL {
            for pair in ANCHOR_FREQUENCIES_GHZ.windows(2) {
                let (f0, f1) = (pair[0], pair[1]);
                let step = (f1 - f0) / STEPS as f64;
                for &c in &ANCHOR_COMPOSITIONS_MGDL {
                    let sweep: Vec<_> = (0..=STEPS)
                        .map(|i| {
                            let f = if i == STEPS { f1 } else { f0 + i as f64 * step };
                            dielectric(medium, strategy, c, f).unwrap()
                        })
                        .collect();

                    let start = dielectric(medium, strategy, c, f0).unwrap();
                    let end = dielectric(medium, strategy, c, f1).unwrap();
                    assert_eq!(sweep[0], start);
                    assert_eq!(sweep[STEPS], end);

                    if strategy == CorrectionStrategy::ResidualBlend {
                        for (f, point) in [(f0, start), (f1, end)] {
                            let reference = table.lookup(f, c).unwrap();
                            assert_relative_eq!(point.permittivity, reference.permittivity, epsilon = 1e-9);
                            assert_relative_eq!(point.conductivity, reference.conductivity, epsilon = 1e-9);
                        }
                    }

                    for w in sweep.windows(2) {
                        assert!(
                            (w[1].permittivity - w[0].permittivity).abs() <= MAX_SLOPE * step,
                            "{} {} at {} mg/dL: ε' jumps between {} and {} GHz",
                            medium,
                            strategy,
                            c,
                            f0,
                            f1
                        );
                        assert!(
                            (w[1].conductivity - w[0].conductivity).abs() <= MAX_SLOPE * step,
                            "{} {} at {} mg/dL: σ jumps between {} and {} GHz",
                            medium,
                            strategy,
                            c,
                            f0,
                            f1
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_correction_is_clamped_outside_anchor_span() {
    let plasma = calibrated(Medium::BloodPlasma, CorrectionStrategy::ResidualBlend).unwrap();
    let table = plasma.correction();
    for &c in &ANCHOR_COMPOSITIONS_MGDL {
        assert_eq!(table.correction_at(c, 25.0), table.correction_at(c, 10.0));
        assert_eq!(table.correction_at(c, 0.1), table.correction_at(c, 0.5));
    }

    // The model itself still runs at the requested frequency.
    let raw_far = plasma.model().evaluate(200.0, 25.0e9).unwrap();
    let raw_edge = plasma.model().evaluate(200.0, 10.0e9).unwrap();
    assert!((raw_far.permittivity - raw_edge.permittivity).abs() > 1.0);
}

#[test]
fn test_non_positive_frequency_rejected() {
    for f in [0.0, -1.0] {
        assert!(matches!(
            dielectric_bp(72.0, f),
            Err(DielectricError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            compute_properties(f, "skin", "cole-cole"),
            Err(DielectricError::InvalidFrequency { .. })
        ));
        assert!(matches!(
            compute_properties(f, "skin", "table"),
            Err(DielectricError::InvalidFrequency { .. })
        ));
    }
}

#[test]
fn test_unknown_selectors_rejected() {
    assert!(matches!(
        compute_properties(1.0e9, "kidney", "cole-cole"),
        Err(DielectricError::InvalidSelector { kind: "tissue", .. })
    ));
    assert!(matches!(
        compute_properties(1.0e9, "skin", "polynomial"),
        Err(DielectricError::InvalidSelector { kind: "mode", .. })
    ));
}

#[test]
fn test_cole_cole_permittivity_never_negative() {
    let frequencies: Vec<f64> = (0..=60).map(|i| 10f64.powf(6.0 + i as f64 * 0.1)).collect();
    for tissue in Tissue::ALL {
        let sweep = tissue_sweep(tissue, TissueMode::ColeCole, &frequencies).unwrap();
        for point in sweep {
            assert!(point.properties.epsilon_real >= 0.0);
            assert!(point.properties.epsilon_imag >= 0.0);
            assert!(point.properties.conductivity >= 0.0);
        }
    }
}

#[test]
fn test_skin_table_fit_at_reference_frequency() {
    let r = compute_properties(1.575e9, "skin", "table").unwrap();
    assert_abs_diff_eq!(r.epsilon_real, 39.28, epsilon = 1e-6);
    assert_abs_diff_eq!(r.loss_tangent, 0.32, epsilon = 1e-6);
}

#[test]
fn test_skin_cole_cole_agrees_with_table() {
    let cc = compute_properties(1.575e9, "skin", "cole-cole").unwrap();
    assert_abs_diff_eq!(cc.epsilon_real, 39.28, epsilon = 0.01);
    assert_abs_diff_eq!(cc.loss_tangent, 0.32, epsilon = 0.01);
}

#[test]
fn test_unit_normalisation_is_equivalent() {
    let mhz = compute(1575.0, "MHz", "skin", "table").unwrap();
    let ghz = compute(1.575, "GHz", "skin", "table").unwrap();
    assert_relative_eq!(mhz.epsilon_real, ghz.epsilon_real, epsilon = 1e-9);
    assert_relative_eq!(mhz.loss_tangent, ghz.loss_tangent, epsilon = 1e-9);
    assert_relative_eq!(mhz.conductivity, ghz.conductivity, epsilon = 1e-9);

    // Unrecognised units fall back to GHz.
    let fallback = compute(1.575, "parsecs", "skin", "table").unwrap();
    assert_relative_eq!(fallback.epsilon_real, ghz.epsilon_real, epsilon = 1e-12);
}

#[test]
fn test_medium_result_loss_tangent_is_positive() {
    let r = compute_medium(2400.0, "MHz", "plasma", 120.0).unwrap();
    assert!(r.epsilon_real > 0.0);
    assert!(r.loss_tangent > 0.0 && r.loss_tangent.is_finite());
}

#[test]
fn test_comparison_curves_over_default_grid() {
    let grid = default_frequency_grid_ghz();
    let set = comparison_curves(Medium::BloodPlasma, CorrectionStrategy::ResidualBlend, 330.0, &grid)
        .unwrap();
    assert_eq!(set.datasets.len(), 4);
    let user = set.datasets.iter().find(|c| c.is_user).unwrap();
    // 0.5 GHz is an anchor, so the 330 mg/dL curve starts on the table value.
    assert_relative_eq!(user.permittivity[0], 72.7201, epsilon = 1e-9);
    assert_relative_eq!(user.conductivity[0], 2.0448, epsilon = 1e-9);
}

#[test]
fn test_coefficient_strategy_reproduces_legacy_plasma() {
    let p = dielectric(Medium::BloodPlasma, CorrectionStrategy::CoefficientBlend, 600.0, 0.5).unwrap();
    assert_abs_diff_eq!(p.permittivity, 72.657, epsilon = 1e-3);
    assert_abs_diff_eq!(p.conductivity, 1.995, epsilon = 1e-3);
}
