//! Constants for spoolcalc Core
//!
//! Every numeric value the rules depend on lives here with its unit, so the
//! rule code reads as arithmetic rather than as magic numbers.
//!
//! ## Organization
//!
//! - **Units**: unit conversion factors and rounding precisions
//! - **Materials**: typical densities of common filament materials

/// Unit conversion factors and rounding precisions.
pub mod units;

/// Densities of common filament materials.
pub mod materials;

pub use units::{
    G_PER_MM3_PER_G_PER_CM3, LENGTH_PRECISION, PERCENTAGE_PRECISION, PERCENT_FULL,
    WEIGHT_PRECISION,
};

pub use materials::{density_for_material, MATERIAL_DENSITIES};
