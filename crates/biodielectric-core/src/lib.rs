//! # Biodielectric Core
//!
//! Caller-facing façade over the dispersion models in
//! [`biodielectric_materials`]. Frequencies arrive with a unit and media are
//! picked by string selectors, so the same entry points serve a CLI, a
//! config-driven sweep, or an interactive front end.
//!
//! ## Modules
//!
//! - [`units`] — Frequency units and normalisation to Hz.
//! - [`types`] — [`PropertyResult`] and the tissue evaluation mode.
//! - [`properties`] — Corrected plasma/water evaluation, tissue properties, loss tangent.
//! - [`sweep`] — Frequency sweeps and concentration comparison curves.

pub mod properties;
pub mod sweep;
pub mod types;
pub mod units;

pub use biodielectric_materials::{CorrectionStrategy, DielectricError, DispersionPoint, Medium, Tissue};
pub use properties::{
    compute, compute_loss_tangent, compute_medium, compute_properties, dielectric, dielectric_bp,
    dielectric_dw, medium_properties, tissue_properties,
};
pub use types::{PropertyResult, TissueMode};
pub use units::FrequencyUnit;
