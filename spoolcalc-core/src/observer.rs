//! Change Notification
//!
//! A presentation layer needs to know which fields to refresh after an
//! edit. Two mechanisms are offered:
//!
//! - A [`FieldObserver`] installed on the engine is called synchronously for
//!   every stored value that changes, in cascade order.
//! - Every edit returns a [`CascadeReport`] listing the same changes, which
//!   is what tests and batch callers use.
//!
//! A field changes at most once per cascade, so the report has a fixed
//! capacity of one entry per field and never allocates.

use heapless::Vec;

use crate::fields::{Field, FIELD_COUNT};

/// One stored value change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldChange {
    /// Field that changed
    pub field: Field,
    /// Value before the write, NaN if unset
    pub old: f64,
    /// Value after the write, NaN if unset
    pub new: f64,
}

/// Receiver of change notifications
pub trait FieldObserver {
    /// Called after `change.field` has been stored, before its rules run
    fn field_changed(&mut self, change: &FieldChange);
}

/// Observer that ignores every change
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FieldObserver for NoopObserver {
    fn field_changed(&mut self, _change: &FieldChange) {}
}

impl<F> FieldObserver for F
where
    F: FnMut(&FieldChange),
{
    fn field_changed(&mut self, change: &FieldChange) {
        self(change)
    }
}

/// Changes made by one cascade, in the order they happened
#[derive(Debug, Clone, Default)]
pub struct CascadeReport {
    root: Option<Field>,
    changes: Vec<FieldChange, FIELD_COUNT>,
}

impl CascadeReport {
    pub(crate) fn new(root: Field) -> Self {
        Self {
            root: Some(root),
            changes: Vec::new(),
        }
    }

    /// Report for an operation that started no cascade
    pub fn none() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, change: FieldChange) {
        if self.changes.push(change).is_err() {
            log_warn!("Cascade report full, dropping change of {}", change.field.name());
        }
    }

    /// Field whose edit started the cascade
    pub fn root(&self) -> Option<Field> {
        self.root
    }

    /// All changes in order
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    /// True if nothing changed
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changed fields
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Change of `field`, if it changed
    pub fn change_of(&self, field: Field) -> Option<&FieldChange> {
        self.changes.iter().find(|change| change.field == field)
    }

    /// True if `field` changed
    pub fn changed(&self, field: Field) -> bool {
        self.change_of(field).is_some()
    }

    /// How many times `field` was written in this cascade (0 or 1)
    pub fn writes_of(&self, field: Field) -> usize {
        self.changes.iter().filter(|change| change.field == field).count()
    }

    /// Changed fields in order
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.changes.iter().map(|change| change.field)
    }
}
