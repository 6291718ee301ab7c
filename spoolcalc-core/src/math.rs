//! Conversion Math for Filament Quantities
//!
//! ## Overview
//!
//! Pure functions, no state. Everything the consistency rules compute goes
//! through here so rounding is applied the same way everywhere.
//!
//! ## Weight ⇄ Length
//!
//! Filament is a cylinder of known diameter, so mass and length are related
//! through its volume:
//!
//! ```text
//! volume [mm³] = weight [g] / (density [g/cm³] × 10⁻³)
//! area   [mm²] = π/4 × diameter [mm]²
//! length [mm]  = volume / area
//! ```
//!
//! Lengths are rounded to whole millimetres and weights to 0.1 g, so a round
//! trip through [`to_length`] and [`to_weight`] reproduces the weight within
//! 0.1 g.
//!
//! ## Percentages
//!
//! [`percentage_pair`] returns NaN for both shares whenever the inputs do not
//! describe a partially used spool (no total, negative usage, usage above the
//! total). The caller must treat NaN as "cannot display"; nothing is clamped.
//!
//! ## Rounding
//!
//! [`round_with_precision`] rounds half up (towards +∞) after nudging the
//! value by `f64::EPSILON`, so `1.005` at two decimals becomes `1.01` rather
//! than falling to `1.00` through binary representation error.

use core::f64::consts::PI;

use crate::constants::units::{
    G_PER_MM3_PER_G_PER_CM3, LENGTH_PRECISION, PERCENTAGE_PRECISION, PERCENT_FULL,
    WEIGHT_PRECISION,
};

/// Round `value` to `precision` decimal places, half up
pub fn round_with_precision(value: f64, precision: i32) -> f64 {
    let increments = libm::pow(10.0, precision as f64);
    libm::floor((value + f64::EPSILON) * increments + 0.5) / increments
}

/// Operand substitution used by every arithmetic rule: unset means zero
pub fn value_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// True when density and diameter allow a weight/length conversion
pub fn conversion_valid(density: f64, diameter: f64) -> bool {
    density.is_finite() && density > 0.0 && diameter.is_finite() && diameter > 0.0
}

/// Cross-section of the filament in mm²
fn cross_section(diameter: f64) -> f64 {
    (PI / 4.0) * diameter * diameter
}

/// Filament length (mm) for a weight (g)
pub fn to_length(weight: f64, density: f64, diameter: f64) -> f64 {
    let volume = weight / (density * G_PER_MM3_PER_G_PER_CM3);
    round_with_precision(volume / cross_section(diameter), LENGTH_PRECISION)
}

/// Filament weight (g) for a length (mm)
pub fn to_weight(length: f64, density: f64, diameter: f64) -> f64 {
    let volume = cross_section(diameter) * length;
    round_with_precision(volume * density * G_PER_MM3_PER_G_PER_CM3, WEIGHT_PRECISION)
}

/// Used and remaining share of `total`, NaN for both when undefined
pub fn percentage_pair(total: f64, used: f64) -> (f64, f64) {
    if !total.is_finite() || total <= 0.0 || !used.is_finite() || used < 0.0 || used > total {
        return (f64::NAN, f64::NAN);
    }

    let used_pct = round_with_precision(PERCENT_FULL * used / total, PERCENTAGE_PRECISION);
    (used_pct, PERCENT_FULL - used_pct)
}

/// Which way a unit conversion goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Weight (g) to length (mm)
    WeightToLength,
    /// Length (mm) to weight (g)
    LengthToWeight,
}

impl Conversion {
    /// Apply this conversion
    pub fn apply(self, source: f64, density: f64, diameter: f64) -> f64 {
        match self {
            Conversion::WeightToLength => to_length(source, density, diameter),
            Conversion::LengthToWeight => to_weight(source, density, diameter),
        }
    }
}
