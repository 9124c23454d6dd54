//! Cross-model checks through the `DispersionModel` trait.

use approx::assert_relative_eq;
use biodielectric_materials::constants::{angular_frequency, VACUUM_PERMITTIVITY};
use biodielectric_materials::media::{calibrated, CalibratedMedium};
use biodielectric_materials::relaxation::SinglePoleModel;
use biodielectric_materials::{CorrectionStrategy, DispersionModel, Medium, Tissue};

fn all_models() -> Vec<Box<dyn DispersionModel>> {
    let mut models: Vec<Box<dyn DispersionModel>> = vec![
        Box::new(SinglePoleModel::blood_plasma()),
        Box::new(SinglePoleModel::deionized_water()),
    ];
    for tissue in Tissue::ALL {
        models.push(Box::new(tissue.cole_cole()));
    }
    models
}

#[test]
fn test_every_model_is_lossy_and_finite() {
    for model in all_models() {
        for &f in &[0.433e9, 1.0e9, 2.45e9, 5.8e9, 10.0e9] {
            let point = model.evaluate(100.0, f).unwrap();
            assert!(
                point.permittivity.is_finite() && point.permittivity > 0.0,
                "{} at {} Hz: ε' = {}",
                model.name(),
                f,
                point.permittivity
            );
            assert!(point.conductivity > 0.0, "{} at {} Hz", model.name(), f);
        }
    }
}

#[test]
fn test_relaxation_conductivity_matches_loss_term() {
    let water = SinglePoleModel::deionized_water();
    let f = 3.0e9;
    let eps = water.complex_permittivity(200.0, f).unwrap();
    let point = water.evaluate(200.0, f).unwrap();
    assert_relative_eq!(point.permittivity, eps.re, epsilon = 1e-12);
    assert_relative_eq!(
        point.conductivity,
        angular_frequency(f) * VACUUM_PERMITTIVITY * -eps.im,
        epsilon = 1e-12
    );
}

#[test]
fn test_permittivity_falls_with_frequency() {
    for model in all_models() {
        let low = model.evaluate(72.0, 0.5e9).unwrap();
        let high = model.evaluate(72.0, 10.0e9).unwrap();
        assert!(low.permittivity > high.permittivity, "{}", model.name());
    }
}

#[test]
fn test_registry_is_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                let entry = calibrated(Medium::DeionizedWater, CorrectionStrategy::ResidualBlend)
                    .unwrap();
                entry as *const CalibratedMedium as usize
            })
        })
        .collect();
    let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
}
