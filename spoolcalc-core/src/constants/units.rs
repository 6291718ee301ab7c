//! Unit Constants for Spool Quantities
//!
//! Weights are grams, lengths are millimetres, density is g/cm³ and diameter
//! is millimetres. The only conversion factor needed is the one between
//! g/cm³ and g/mm³.

/// g/mm³ per g/cm³.
///
/// 1 cm³ = 1000 mm³, so a density in g/cm³ times this factor is g/mm³.
pub const G_PER_MM3_PER_G_PER_CM3: f64 = 1e-3;

/// Decimal places kept for weights (0.1 g).
pub const WEIGHT_PRECISION: i32 = 1;

/// Decimal places kept for lengths (1 mm).
pub const LENGTH_PRECISION: i32 = 0;

/// Decimal places kept for percentages (whole percent).
pub const PERCENTAGE_PRECISION: i32 = 0;

/// A percentage pair always sums to this.
pub const PERCENT_FULL: f64 = 100.0;
