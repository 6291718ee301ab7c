//! Error Types for the Spool Consistency Engine
//!
//! ## Where Errors Can Happen
//!
//! A cascade never fails. Bad numeric input is absorbed by the rules
//! themselves:
//!
//! - Arithmetic rules substitute `0` for unset operands
//! - Percentage pairs become "undefined" (NaN) instead of a misleading number
//! - Weight/length conversions are skipped when density or diameter is invalid
//!
//! What remains are boundary errors: a caller naming a field or a scope the
//! engine does not know. These come from untyped sources (form field ids,
//! stored documents) and are reported so the caller can reject the input.
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use spoolcalc_core::{EngineError, SpoolEngine};
//!
//! let mut engine = SpoolEngine::new();
//! match engine.set_field_by_name("totalWeight", 1000.0) {
//!     Ok(report) => assert!(!report.is_empty()),
//!     Err(EngineError::UnknownField) => {
//!         // form sent a field id we do not track
//!     }
//!     Err(_) => {}
//! }
//! ```
//!
//! Errors are `Copy` and carry no heap data, the same as everything else on
//! the cascade path.

use thiserror_no_std::Error;

/// Result type for engine boundary operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Engine boundary errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Field name does not match any tracked quantity
    #[error("Unknown field name")]
    UnknownField,

    /// Scope name is not one of FILAMENT, SPOOL or COMBINED
    #[error("Unknown driven scope")]
    UnknownScope,
}

#[cfg(feature = "defmt")]
impl defmt::Format for EngineError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::UnknownField => defmt::write!(fmt, "Unknown field"),
            Self::UnknownScope => defmt::write!(fmt, "Unknown scope"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "std")]
    #[test]
    fn error_messages() {
        assert_eq!(EngineError::UnknownField.to_string(), "Unknown field name");
        assert_eq!(EngineError::UnknownScope.to_string(), "Unknown driven scope");
    }

    #[test]
    fn errors_are_small() {
        assert_eq!(core::mem::size_of::<EngineError>(), 1);
    }
}
