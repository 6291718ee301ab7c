//! Propagation Scheduler - the cascade reentrancy guard
//!
//! ## Why a Lock Set?
//!
//! The rules form cycles. Editing `totalWeight` rewrites `totalLength`,
//! whose own rule converts back to `totalWeight`; editing `spoolWeight`
//! rewrites `totalCombinedWeight`, whose rule (in another scope) rewrites
//! `spoolWeight`. Left alone, a single edit would recurse forever.
//!
//! The scheduler records every field written during the current cascade.
//! A rule that wants to write a field already in the set simply does not:
//! that field has been settled for this cascade.
//!
//! ```text
//! set_field(totalWeight)          locks: {totalWeight}          (root)
//!   └─ totalCombinedWeight = ..   locks: {.., totalCombinedWeight}
//!   └─ remainingWeight = ..       locks: {.., remainingWeight}
//!        └─ usedWeight = ..       locks: {.., usedWeight}
//!        └─ remainingLength = ..  locks: {.., remainingLength}
//!             └─ remainingWeight  already locked, skipped
//!   └─ totalLength = ..           locks: {.., totalLength}
//!        └─ totalWeight           already locked, skipped
//! root returns                    locks: {}
//! ```
//!
//! Since a field enters the set at most once, a cascade writes at most
//! [`FIELD_COUNT`](crate::fields::FIELD_COUNT) fields and always terminates.
//!
//! ## Root Detection
//!
//! The first write of a cascade finds the set empty; [`PropagationScheduler::is_root`]
//! reports that and the dispatcher that got `true` is the one that clears
//! the set with [`PropagationScheduler::end_if_root`] once everything below
//! it has returned.
//!
//! ## Suppression
//!
//! While disabled every lock request fails, so no rule can write anything and
//! no write becomes a root. Bulk loads use this to assign every field without
//! recomputation.

use crate::fields::{Field, FieldSet};

/// Reentrancy guard for one engine
#[derive(Debug, Clone)]
pub struct PropagationScheduler {
    locks: FieldSet,
    enabled: bool,
}

impl Default for PropagationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl PropagationScheduler {
    /// Enabled scheduler with no active cascade
    pub const fn new() -> Self {
        Self {
            locks: FieldSet::empty(),
            enabled: true,
        }
    }

    /// Lock `field` for this cascade; false if disabled or already locked
    pub fn try_lock(&mut self, field: Field) -> bool {
        if !self.enabled || self.locks.contains(field) {
            return false;
        }
        self.locks.insert(field);
        true
    }

    /// True if this write starts a new cascade (and locks `field`)
    pub fn is_root(&mut self, field: Field) -> bool {
        self.locks.is_empty() && self.try_lock(field)
    }

    /// Close the cascade if the caller was its root
    pub fn end_if_root(&mut self, was_root: bool) {
        if was_root {
            self.locks.clear();
        }
    }

    /// True if `field` has been written in the active cascade
    pub fn is_locked(&self, field: Field) -> bool {
        self.locks.contains(field)
    }

    /// Fields locked by the active cascade
    pub fn locked(&self) -> FieldSet {
        self.locks
    }

    /// True if a cascade is in progress
    pub fn in_cascade(&self) -> bool {
        !self.locks.is_empty()
    }

    /// True unless propagation is suppressed
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Set the enabled flag, returning the previous one
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        core::mem::replace(&mut self.enabled, enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_lock_is_root() {
        let mut scheduler = PropagationScheduler::new();

        assert!(scheduler.is_root(Field::TotalWeight));
        assert!(scheduler.is_locked(Field::TotalWeight));

        // Nested dispatchers are not roots
        assert!(scheduler.try_lock(Field::TotalLength));
        assert!(!scheduler.is_root(Field::TotalLength));
        assert!(!scheduler.is_root(Field::UsedWeight));
        assert!(!scheduler.is_locked(Field::UsedWeight));
    }

    #[test]
    fn field_locks_once_per_cascade() {
        let mut scheduler = PropagationScheduler::new();
        let root = scheduler.is_root(Field::SpoolWeight);

        assert!(scheduler.try_lock(Field::TotalCombinedWeight));
        assert!(!scheduler.try_lock(Field::TotalCombinedWeight));
        assert!(!scheduler.try_lock(Field::SpoolWeight));

        scheduler.end_if_root(root);
        assert!(!scheduler.in_cascade());
        assert!(scheduler.try_lock(Field::TotalCombinedWeight));
    }

    #[test]
    fn non_root_does_not_clear() {
        let mut scheduler = PropagationScheduler::new();
        let root = scheduler.is_root(Field::Density);
        let nested = scheduler.is_root(Field::TotalLength);
        assert!(root);
        assert!(!nested);

        scheduler.end_if_root(nested);
        assert!(scheduler.is_locked(Field::Density));

        scheduler.end_if_root(root);
        assert!(scheduler.locked().is_empty());
    }

    #[test]
    fn disabled_scheduler_refuses_everything() {
        let mut scheduler = PropagationScheduler::new();
        assert!(scheduler.set_enabled(false));

        assert!(!scheduler.is_root(Field::TotalWeight));
        assert!(!scheduler.try_lock(Field::SpoolWeight));
        assert!(!scheduler.in_cascade());

        assert!(!scheduler.set_enabled(true));
        assert!(scheduler.is_root(Field::TotalWeight));
    }
}
