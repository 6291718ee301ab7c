//! Driven Scope Selection
//!
//! ## Overview
//!
//! Three weights are tied together by one equation:
//!
//! ```text
//! totalCombinedWeight = totalWeight + spoolWeight
//! ```
//!
//! Any two determine the third, so one of them has to be treated as derived.
//! Which one depends on what the user actually knows:
//!
//! | Scope | User knows | Engine derives |
//! |---|---|---|
//! | `FILAMENT` | spool weight, combined weight (put it on a scale) | `totalWeight` |
//! | `SPOOL` | filament amount, combined weight | `spoolWeight` |
//! | `COMBINED` | filament amount, spool weight (from the label) | `totalCombinedWeight` |
//!
//! The scope is selector state only. Changing it recomputes nothing; the
//! trio becomes consistent under the new scope on the next edit to one of
//! its members.

use core::fmt;
use core::str::FromStr;

use crate::errors::EngineError;
use crate::fields::Field;

/// Which member of the spool/combined weight trio is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum DrivenScope {
    /// Filament amount is derived from combined and spool weight
    Filament,
    /// Spool weight is derived from combined weight and filament amount
    Spool,
    /// Combined weight is derived from filament amount and spool weight
    #[default]
    Combined,
}

impl DrivenScope {
    /// Every scope
    pub const ALL: [DrivenScope; 3] = [DrivenScope::Filament, DrivenScope::Spool, DrivenScope::Combined];

    /// Wire name
    pub const fn name(&self) -> &'static str {
        match self {
            DrivenScope::Filament => "FILAMENT",
            DrivenScope::Spool => "SPOOL",
            DrivenScope::Combined => "COMBINED",
        }
    }

    /// Label shown next to the selector
    pub const fn label(&self) -> &'static str {
        match self {
            DrivenScope::Filament => "Filament Amount",
            DrivenScope::Spool => "Spool Weight",
            DrivenScope::Combined => "Combined Weight",
        }
    }

    /// Trio member the engine recomputes in this scope
    pub const fn derived_field(&self) -> Field {
        match self {
            DrivenScope::Filament => Field::TotalWeight,
            DrivenScope::Spool => Field::SpoolWeight,
            DrivenScope::Combined => Field::TotalCombinedWeight,
        }
    }
}

impl fmt::Display for DrivenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DrivenScope {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DrivenScope::ALL
            .iter()
            .copied()
            .find(|scope| scope.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(EngineError::UnknownScope)
    }
}
