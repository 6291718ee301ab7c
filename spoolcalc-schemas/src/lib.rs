//! Spool Record Documents and Edit Sessions
//!
//! ## Overview
//!
//! The engine in `spoolcalc-core` knows fifteen numbers. A stored spool knows
//! far more: display name, vendor, colour, notes, purchase data, database
//! bookkeeping. This crate sits between the two:
//!
//! - [`SpoolRecord`] is the stored document, an opaque JSON object. Only the
//!   engine's fields are interpreted; everything else passes through intact.
//! - [`EditSession`] pairs one record with one engine for the lifetime of an
//!   edit dialog: open, edit, write back.
//! - [`TemplateConfig`] controls what a copy from a template spool keeps.
//!
//! ## Lenient Numbers
//!
//! Records come from form inputs and older stores, so numeric fields may
//! arrive as JSON numbers, as text (`"1000"`, `"12.5 g"`), as `null` or not at
//! all. Text is read like a browser would read it: the longest numeric
//! prefix, anything else is unset. An unreadable value never fails a load.
//!
//! ## Usage Example
//!
//! ```rust
//! use spoolcalc_core::Field;
//! use spoolcalc_schemas::{EditSession, SpoolRecord};
//!
//! let record = SpoolRecord::from_json(
//!     r#"{"displayName": "Galaxy Black", "totalWeight": "1000", "spoolWeight": 210}"#,
//! )?;
//!
//! let mut session = EditSession::open(record);
//! assert_eq!(session.engine().get(Field::TotalCombinedWeight), Some(1210.0));
//!
//! session.set_field_text("usedWeight", "250")?;
//! let saved = session.to_record();
//! assert_eq!(saved.number(Field::RemainingWeight), 750.0);
//! assert_eq!(saved.get("displayName").and_then(|v| v.as_str()), Some("Galaxy Black"));
//! # Ok::<(), spoolcalc_schemas::RecordError>(())
//! ```

use spoolcalc_core::EngineError;

pub mod config;
pub mod record;
pub mod session;

pub use config::{TemplateConfig, DEFAULT_TEMPLATE_CONFIG};
pub use record::SpoolRecord;
pub use session::EditSession;

/// Record-related errors
#[derive(Debug, thiserror_no_std::Error)]
pub enum RecordError {
    #[error("Record is not a JSON object")]
    NotAnObject,

    #[error("Failed to parse record: {0}")]
    Parse(String),

    #[error("Engine rejected input: {0}")]
    Engine(EngineError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<EngineError> for RecordError {
    fn from(error: EngineError) -> Self {
        RecordError::Engine(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            RecordError::Engine(EngineError::UnknownField).to_string(),
            "Engine rejected input: Unknown field name"
        );
        assert_eq!(RecordError::NotAnObject.to_string(), "Record is not a JSON object");
    }

    #[test]
    fn engine_errors_convert() {
        let error: RecordError = EngineError::UnknownScope.into();
        assert!(matches!(error, RecordError::Engine(EngineError::UnknownScope)));
    }
}
