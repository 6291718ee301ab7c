//! Tracked Spool Quantities
//!
//! ## Overview
//!
//! A spool is described by fifteen numeric quantities that are not
//! independent of each other:
//!
//! ```text
//!                 spoolWeight
//!                      │
//!   totalWeight ───────┼──────── totalCombinedWeight
//!       │  ╲           │
//!       │   usedWeight │
//!       │  ╱           │
//!   remainingWeight ───┴──────── remainingCombinedWeight
//!
//!   each weight ⇄ matching length   (needs density + diameter)
//!   total/used  → percentage pair   (weight pair and length pair)
//! ```
//!
//! [`Field`] names one quantity, [`FieldSet`] is a compact set of them used
//! as the cascade lock set.
//!
//! ## Record Keys
//!
//! [`Field::name`] returns the camelCase key used by the stored spool
//! document (`totalWeight`, `remainingCombinedWeight`, ...), so field names
//! coming from a form or a document can be mapped with [`Field::from_name`].

use core::fmt;
use core::str::FromStr;

use crate::errors::{EngineError, EngineResult};

/// Number of tracked quantities
pub const FIELD_COUNT: usize = 15;

/// One tracked spool quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Field {
    /// Filament mass when the spool was new (g)
    TotalWeight = 0,
    /// Filament mass consumed (g)
    UsedWeight = 1,
    /// Filament mass left (g)
    RemainingWeight = 2,
    /// Filament length when the spool was new (mm)
    TotalLength = 3,
    /// Filament length consumed (mm)
    UsedLength = 4,
    /// Filament length left (mm)
    RemainingLength = 5,
    /// Empty spool mass (g)
    SpoolWeight = 6,
    /// Total filament plus spool (g)
    TotalCombinedWeight = 7,
    /// Remaining filament plus spool (g)
    RemainingCombinedWeight = 8,
    /// Material density (g/cm³)
    Density = 9,
    /// Filament diameter (mm)
    Diameter = 10,
    /// Weight based used share (%)
    UsedPercentage = 11,
    /// Weight based remaining share (%)
    RemainingPercentage = 12,
    /// Length based used share (%)
    UsedLengthPercentage = 13,
    /// Length based remaining share (%)
    RemainingLengthPercentage = 14,
}

/// Physical kind of a quantity, selects unit and rounding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Mass in grams
    Weight,
    /// Length in millimetres
    Length,
    /// Share in percent
    Percentage,
    /// Density or diameter
    Material,
}

impl Field {
    /// Every field, in declaration order
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::TotalWeight,
        Field::UsedWeight,
        Field::RemainingWeight,
        Field::TotalLength,
        Field::UsedLength,
        Field::RemainingLength,
        Field::SpoolWeight,
        Field::TotalCombinedWeight,
        Field::RemainingCombinedWeight,
        Field::Density,
        Field::Diameter,
        Field::UsedPercentage,
        Field::RemainingPercentage,
        Field::UsedLengthPercentage,
        Field::RemainingLengthPercentage,
    ];

    /// Position in [`Field::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Record key for this field
    pub const fn name(&self) -> &'static str {
        match self {
            Field::TotalWeight => "totalWeight",
            Field::UsedWeight => "usedWeight",
            Field::RemainingWeight => "remainingWeight",
            Field::TotalLength => "totalLength",
            Field::UsedLength => "usedLength",
            Field::RemainingLength => "remainingLength",
            Field::SpoolWeight => "spoolWeight",
            Field::TotalCombinedWeight => "totalCombinedWeight",
            Field::RemainingCombinedWeight => "remainingCombinedWeight",
            Field::Density => "density",
            Field::Diameter => "diameter",
            Field::UsedPercentage => "usedPercentage",
            Field::RemainingPercentage => "remainingPercentage",
            Field::UsedLengthPercentage => "usedLengthPercentage",
            Field::RemainingLengthPercentage => "remainingLengthPercentage",
        }
    }

    /// Physical kind
    pub const fn kind(&self) -> FieldKind {
        match self {
            Field::TotalWeight
            | Field::UsedWeight
            | Field::RemainingWeight
            | Field::SpoolWeight
            | Field::TotalCombinedWeight
            | Field::RemainingCombinedWeight => FieldKind::Weight,
            Field::TotalLength | Field::UsedLength | Field::RemainingLength => FieldKind::Length,
            Field::UsedPercentage
            | Field::RemainingPercentage
            | Field::UsedLengthPercentage
            | Field::RemainingLengthPercentage => FieldKind::Percentage,
            Field::Density | Field::Diameter => FieldKind::Material,
        }
    }

    /// Display unit
    pub const fn unit(&self) -> &'static str {
        match self {
            Field::Density => "g/cm³",
            Field::Diameter => "mm",
            _ => match self.kind() {
                FieldKind::Weight => "g",
                FieldKind::Length => "mm",
                FieldKind::Percentage => "%",
                FieldKind::Material => "",
            },
        }
    }

    /// Look up a field by its record key
    pub fn from_name(name: &str) -> EngineResult<Field> {
        Field::ALL
            .iter()
            .copied()
            .find(|field| field.name() == name)
            .ok_or(EngineError::UnknownField)
    }

    /// True for the four percentage outputs
    pub const fn is_percentage(&self) -> bool {
        matches!(self.kind(), FieldKind::Percentage)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_name(s)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Field {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name())
    }
}

/// Bit set of fields
///
/// One bit per [`Field`], so the whole lock set of a cascade is a single
/// `u32` and locking is a mask operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSet(u32);

impl FieldSet {
    /// Set with no fields
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Set with every field
    pub const fn all() -> Self {
        Self((1 << FIELD_COUNT) - 1)
    }

    const fn bit(field: Field) -> u32 {
        1 << field as u32
    }

    /// Add a field, returns false if it was already present
    pub fn insert(&mut self, field: Field) -> bool {
        let present = self.contains(field);
        self.0 |= Self::bit(field);
        !present
    }

    /// Remove a field
    pub fn remove(&mut self, field: Field) {
        self.0 &= !Self::bit(field);
    }

    /// Membership test
    pub const fn contains(&self, field: Field) -> bool {
        (self.0 & Self::bit(field)) != 0
    }

    /// True if no field is present
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of fields present
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Remove every field
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Fields present, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL.into_iter().filter(move |field| self.contains(*field))
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = FieldSet::empty();
        for field in iter {
            set.insert(field);
        }
        set
    }
}
