//! Spool Engine - the public face of the consistency graph
//!
//! ## Overview
//!
//! [`SpoolEngine`] owns one edit session's worth of state: the fifteen
//! quantity cells, the driven scope, the propagation scheduler and an
//! optional observer. Every edit goes through [`SpoolEngine::set_field`],
//! which stores the value and, if it changed, runs the cascade to
//! completion before returning a [`CascadeReport`].
//!
//! ## Edit Lifecycle
//!
//! ```text
//! load(record)     propagation suppressed, values stored as given
//!     │
//! set_field(..)    cascade, report         ┐
//! set_field(..)    cascade, report         ├ user edits
//! set_driven_scope no cascade              ┘
//!     │
//! snapshot()       values read back for saving
//! ```
//!
//! ## Suppressed Propagation
//!
//! Loading a record must not let the sum rules overwrite values the record
//! already provides. [`SpoolEngine::suppress_propagation`] returns a guard
//! under which writes are plain stores; the previous state is restored when
//! the guard drops, on every exit path including an early error return.
//!
//! ```
//! use spoolcalc_core::{Field, SpoolEngine};
//!
//! let mut engine = SpoolEngine::new();
//! engine.load([
//!     (Field::TotalWeight, 500.0),
//!     (Field::SpoolWeight, 200.0),
//!     (Field::TotalCombinedWeight, 750.0),
//! ]);
//!
//! // Explicit values survive the load untouched
//! assert_eq!(engine.get(Field::TotalCombinedWeight), Some(750.0));
//! assert!(engine.is_propagation_enabled());
//! ```

use core::ops::{Deref, DerefMut};

use crate::constants::materials::density_for_material;
use crate::errors::EngineResult;
use crate::fields::{Field, FIELD_COUNT};
use crate::graph::Propagation;
use crate::observer::{CascadeReport, FieldObserver, NoopObserver};
use crate::quantity::{parse_lenient, Quantity};
use crate::scheduler::PropagationScheduler;
use crate::scope::DrivenScope;

/// Engine settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct EngineConfig {
    /// Scope selected when the engine is created or reset
    pub default_scope: DrivenScope,
}

/// Stored values of every field at one point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    values: [Quantity; FIELD_COUNT],
    /// Scope at the time of the snapshot
    pub scope: DrivenScope,
}

impl Snapshot {
    /// Value of `field`, `None` if unset
    pub fn get(&self, field: Field) -> Option<f64> {
        self.values[field.index()].get()
    }

    /// Raw value of `field`, NaN if unset
    pub fn value(&self, field: Field) -> f64 {
        self.values[field.index()].value()
    }

    /// Every field with its raw value, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Field, f64)> + '_ {
        Field::ALL.into_iter().map(move |field| (field, self.value(field)))
    }
}

/// Consistency engine for one spool being edited
#[derive(Debug, Clone)]
pub struct SpoolEngine<O: FieldObserver = NoopObserver> {
    cells: [Quantity; FIELD_COUNT],
    scope: DrivenScope,
    scheduler: PropagationScheduler,
    observer: O,
    config: EngineConfig,
}

impl Default for SpoolEngine<NoopObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl SpoolEngine<NoopObserver> {
    /// Engine with every field unset and the default scope
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Engine with custom settings
    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_observer_and_config(NoopObserver, config)
    }
}

impl<O: FieldObserver> SpoolEngine<O> {
    /// Engine that reports every change to `observer`
    pub fn with_observer(observer: O) -> Self {
        Self::with_observer_and_config(observer, EngineConfig::default())
    }

    /// Engine with an observer and custom settings
    pub fn with_observer_and_config(observer: O, config: EngineConfig) -> Self {
        Self {
            cells: [Quantity::unset(); FIELD_COUNT],
            scope: config.default_scope,
            scheduler: PropagationScheduler::new(),
            observer,
            config,
        }
    }

    /// Settings this engine was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Installed observer
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Installed observer, mutably
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Consume the engine, returning its observer
    pub fn into_observer(self) -> O {
        self.observer
    }

    // ===== READING =====

    /// Value of `field`, `None` if unset
    pub fn get(&self, field: Field) -> Option<f64> {
        self.cells[field.index()].get()
    }

    /// Raw value of `field`, NaN if unset
    pub fn value(&self, field: Field) -> f64 {
        self.cells[field.index()].value()
    }

    /// Value of the field with record key `name`
    pub fn get_by_name(&self, name: &str) -> EngineResult<Option<f64>> {
        Field::from_name(name).map(|field| self.get(field))
    }

    /// Copy of every stored value and the scope
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            values: self.cells,
            scope: self.scope,
        }
    }

    /// Current driven scope
    pub fn driven_scope(&self) -> DrivenScope {
        self.scope
    }

    /// Propagation scheduler, for inspection
    pub fn scheduler(&self) -> &PropagationScheduler {
        &self.scheduler
    }

    /// False while propagation is suppressed
    pub fn is_propagation_enabled(&self) -> bool {
        self.scheduler.is_enabled()
    }

    // ===== EDITING =====

    /// Select the driven scope; recomputes nothing
    pub fn set_driven_scope(&mut self, scope: DrivenScope) {
        if scope != self.scope {
            log_debug!("Driven scope {} -> {}", self.scope.name(), scope.name());
        }
        self.scope = scope;
    }

    /// Select the driven scope by wire name
    pub fn set_driven_scope_by_name(&mut self, name: &str) -> EngineResult<()> {
        let scope = name.parse()?;
        self.set_driven_scope(scope);
        Ok(())
    }

    /// Store `value` in `field` and run the resulting cascade
    pub fn set_field(&mut self, field: Field, value: f64) -> CascadeReport {
        let mut report = CascadeReport::new(field);
        self.propagation(&mut report).edit(field, value);
        report
    }

    /// Store `value` in the field with record key `name`
    pub fn set_field_by_name(&mut self, name: &str, value: f64) -> EngineResult<CascadeReport> {
        let field = Field::from_name(name)?;
        Ok(self.set_field(field, value))
    }

    /// Store form text in `field`; text without a number unsets it
    pub fn set_field_text(&mut self, field: Field, text: &str) -> CascadeReport {
        self.set_field(field, parse_lenient(text))
    }

    /// Unset `field` and run the resulting cascade
    pub fn clear_field(&mut self, field: Field) -> CascadeReport {
        self.set_field(field, f64::NAN)
    }

    /// Run the rules of `field` again without changing it
    ///
    /// Used after a bulk reset to let one field re-derive its dependents.
    pub fn touch(&mut self, field: Field) -> CascadeReport {
        let mut report = CascadeReport::new(field);
        self.propagation(&mut report).touch(field);
        report
    }

    /// Suggest the density of `material`; `None` if the material is unknown
    pub fn apply_material(&mut self, material: &str) -> Option<CascadeReport> {
        match density_for_material(material) {
            Some(density) => Some(self.set_field(Field::Density, density)),
            None => {
                log_debug!("No density known for material {:?}", material);
                None
            }
        }
    }

    fn propagation<'a>(&'a mut self, report: &'a mut CascadeReport) -> Propagation<'a, O> {
        Propagation::new(
            &mut self.cells,
            self.scope,
            &mut self.scheduler,
            &mut self.observer,
            report,
        )
    }

    // ===== BULK =====

    /// Disable propagation until the returned guard drops
    pub fn suppress_propagation(&mut self) -> SuppressionGuard<'_, O> {
        let previous = self.scheduler.set_enabled(false);
        SuppressionGuard {
            engine: self,
            previous,
        }
    }

    /// Run `f` with propagation disabled, restoring it on every exit path
    pub fn with_propagation_suppressed<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let mut guard = self.suppress_propagation();
        f(&mut *guard)
    }

    /// Store every assignment as given, without recomputation
    pub fn load<I>(&mut self, assignments: I)
    where
        I: IntoIterator<Item = (Field, f64)>,
    {
        self.with_propagation_suppressed(|engine| {
            for (field, value) in assignments {
                engine.set_field(field, value);
            }
        });
    }

    /// Unset every field and return to the configured default scope
    pub fn reset(&mut self) {
        self.load(Field::ALL.map(|field| (field, f64::NAN)));
        self.scope = self.config.default_scope;
    }
}

/// Keeps propagation disabled while alive
///
/// Dereferences to the engine, so edits made through the guard are plain
/// stores. Dropping it restores whatever state propagation was in before,
/// which makes nested suppression safe.
pub struct SuppressionGuard<'a, O: FieldObserver> {
    engine: &'a mut SpoolEngine<O>,
    previous: bool,
}

impl<O: FieldObserver> Deref for SuppressionGuard<'_, O> {
    type Target = SpoolEngine<O>;

    fn deref(&self) -> &Self::Target {
        self.engine
    }
}

impl<O: FieldObserver> DerefMut for SuppressionGuard<'_, O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.engine
    }
}

impl<O: FieldObserver> Drop for SuppressionGuard<'_, O> {
    fn drop(&mut self) {
        self.engine.scheduler.set_enabled(self.previous);
    }
}
