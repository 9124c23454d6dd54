//! # Biodielectric Materials
//!
//! Dispersion models and calibration data for biological media. Every model
//! implements the [`DispersionModel`](provider::DispersionModel) trait, which
//! returns the complex relative permittivity at a given composition and
//! frequency.
//!
//! ## Available models
//!
//! | Medium | Module | Model |
//! |--------|--------|-------|
//! | Blood plasma (glucose-loaded) | [`relaxation`] | Single-pole, quadratic in concentration, ionic term |
//! | De-ionized water (glucose-loaded) | [`relaxation`] | Single-pole Debye, quadratic in concentration |
//! | Skin, fat, muscle, blood, bone | [`cole_cole`], [`tissue`] | Four-pole Cole–Cole |
//!
//! ## Calibration
//!
//! Model output for plasma and water is corrected against measured anchor
//! tables ([`reference`]) by one of two strategies in [`correction`]:
//! per-anchor affine coefficients, or additive residuals interpolated with
//! Lagrange polynomials across concentration. Both blend linearly between
//! anchor frequencies and clamp outside the anchor span.

pub mod cole_cole;
pub mod constants;
pub mod correction;
pub mod interpolation;
pub mod media;
pub mod provider;
pub mod reference;
pub mod relaxation;
pub mod tissue;

pub use correction::CorrectionStrategy;
pub use media::{CalibratedMedium, Medium};
pub use provider::{DielectricError, DispersionModel, DispersionPoint};
pub use tissue::Tissue;
