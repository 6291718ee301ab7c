//! Consistency engine for filament spool quantities
//!
//! Keeps the weights, lengths, percentages and combined totals of a filament
//! spool mutually consistent while a user edits any one of them.
//! Designed to run anywhere the editor runs, including `no_std` targets.
//!
//! Key constraints:
//! - Fully synchronous, no allocation in the cascade path
//! - Every field is written at most once per cascade
//! - Invalid input degrades to "unset", never to an error
//!
//! ```
//! use spoolcalc_core::{DrivenScope, Field, SpoolEngine};
//!
//! let mut engine = SpoolEngine::new();
//! engine.set_driven_scope(DrivenScope::Filament);
//! engine.set_field(Field::SpoolWeight, 200.0);
//! engine.set_field(Field::TotalCombinedWeight, 1200.0);
//!
//! assert_eq!(engine.get(Field::TotalWeight), Some(1000.0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod constants;
pub mod engine;
pub mod errors;
pub mod fields;
pub mod graph;
pub mod math;
pub mod observer;
pub mod quantity;
pub mod scheduler;
pub mod scope;

// Public API
pub use engine::{EngineConfig, Snapshot, SpoolEngine, SuppressionGuard};
pub use errors::{EngineError, EngineResult};
pub use fields::{Field, FieldSet};
pub use observer::{CascadeReport, FieldChange, FieldObserver, NoopObserver};
pub use quantity::Quantity;
pub use scheduler::PropagationScheduler;
pub use scope::DrivenScope;

/// Crate version string
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
