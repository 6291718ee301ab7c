//! Consistency Graph - the rule table and its dispatcher
//!
//! ## Overview
//!
//! Every tracked field has an ordered list of [`Rule`]s that run when it
//! changes. The list depends only on the field and the [`DrivenScope`], so
//! the whole graph is the static table returned by [`rules_for`]:
//!
//! | Changed | Rules in order |
//! |---|---|
//! | `totalWeight` | `SPOOL`: spool = combined − total, else combined = total + spool; remaining = total − used; total → totalLength; weight % |
//! | `usedWeight` | used → usedLength; remaining = total − used; weight % |
//! | `remainingWeight` | `COMBINED`: remainingCombined = remaining + spool; used = total − remaining; remaining → remainingLength; weight % |
//! | `*Length` | length → weight; length % |
//! | `density`, `diameter` | all six weight ⇄ length conversions |
//! | `spoolWeight` | `FILAMENT`: total = combined − spool; `COMBINED`: combined = total + spool, remainingCombined = remaining + spool |
//! | `totalCombinedWeight` | `FILAMENT`: total = combined − spool; `SPOOL`: spool = combined − total |
//! | `remainingCombinedWeight` | `FILAMENT`: remaining = remainingCombined − spool |
//!
//! ## Rule Semantics
//!
//! - [`Rule::Derive`] locks its target, then writes `round(lhs ∘ rhs, 0.1 g)`
//!   with unset operands counted as zero.
//! - [`Rule::Convert`] runs only when the source is a finite number and
//!   density and diameter are valid. It locks the target, then the source,
//!   so the target's own rules cannot convert back.
//! - [`Rule::Percentages`] marks a percentage pair as pending. The root
//!   dispatcher computes pending pairs once, from the settled values, right
//!   before it closes the cascade.
//!
//! A rule whose target is already locked does nothing. That is the normal
//! way cycles end, not an error.
//!
//! ## Dispatch
//!
//! A write that changes a stored value notifies the observer and then runs
//! the dispatcher for that field, recursively, before returning. The whole
//! cascade is one depth-first walk on the call stack.

use crate::constants::units::WEIGHT_PRECISION;
use crate::fields::{Field, FIELD_COUNT};
use crate::math::{self, Conversion};
use crate::observer::{CascadeReport, FieldChange, FieldObserver};
use crate::quantity::Quantity;
use crate::scheduler::PropagationScheduler;
use crate::scope::DrivenScope;

/// Binary operation of a derive rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `lhs + rhs`
    Sum,
    /// `lhs - rhs`
    Difference,
}

impl Operation {
    /// Apply to two operands
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operation::Sum => lhs + rhs,
            Operation::Difference => lhs - rhs,
        }
    }
}

/// One of the two independent percentage pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentagePair {
    /// `usedPercentage` / `remainingPercentage` from weights
    Weight,
    /// `usedLengthPercentage` / `remainingLengthPercentage` from lengths
    Length,
}

impl PercentagePair {
    /// `(total, used, used share, remaining share)` fields of this pair
    pub const fn fields(self) -> (Field, Field, Field, Field) {
        match self {
            PercentagePair::Weight => (
                Field::TotalWeight,
                Field::UsedWeight,
                Field::UsedPercentage,
                Field::RemainingPercentage,
            ),
            PercentagePair::Length => (
                Field::TotalLength,
                Field::UsedLength,
                Field::UsedLengthPercentage,
                Field::RemainingLengthPercentage,
            ),
        }
    }
}

/// One reaction to a field change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `target = round(lhs ∘ rhs)`
    Derive {
        /// Field written
        target: Field,
        /// How the operands combine
        operation: Operation,
        /// Left operand
        lhs: Field,
        /// Right operand
        rhs: Field,
    },
    /// `target = convert(source)`
    Convert {
        /// Field read
        source: Field,
        /// Field written
        target: Field,
        /// Direction
        conversion: Conversion,
    },
    /// Recompute a percentage pair at the end of the cascade
    Percentages(PercentagePair),
}

const fn sum(target: Field, lhs: Field, rhs: Field) -> Rule {
    Rule::Derive { target, operation: Operation::Sum, lhs, rhs }
}

const fn difference(target: Field, lhs: Field, rhs: Field) -> Rule {
    Rule::Derive { target, operation: Operation::Difference, lhs, rhs }
}

const fn to_length(source: Field, target: Field) -> Rule {
    Rule::Convert { source, target, conversion: Conversion::WeightToLength }
}

const fn to_weight(source: Field, target: Field) -> Rule {
    Rule::Convert { source, target, conversion: Conversion::LengthToWeight }
}

use Field::*;

const REMAINING_FROM_USED: Rule = difference(RemainingWeight, TotalWeight, UsedWeight);
const USED_FROM_REMAINING: Rule = difference(UsedWeight, TotalWeight, RemainingWeight);
const TOTAL_FROM_COMBINED: Rule = difference(TotalWeight, TotalCombinedWeight, SpoolWeight);
const SPOOL_FROM_COMBINED: Rule = difference(SpoolWeight, TotalCombinedWeight, TotalWeight);
const COMBINED_FROM_TOTAL: Rule = sum(TotalCombinedWeight, TotalWeight, SpoolWeight);
const REMAINING_COMBINED_FROM_REMAINING: Rule = sum(RemainingCombinedWeight, RemainingWeight, SpoolWeight);
const REMAINING_FROM_REMAINING_COMBINED: Rule =
    difference(RemainingWeight, RemainingCombinedWeight, SpoolWeight);

const WEIGHT_PERCENTAGES: Rule = Rule::Percentages(PercentagePair::Weight);
const LENGTH_PERCENTAGES: Rule = Rule::Percentages(PercentagePair::Length);

const TOTAL_WEIGHT_DRIVES_SPOOL: &[Rule] = &[
    SPOOL_FROM_COMBINED,
    REMAINING_FROM_USED,
    to_length(TotalWeight, TotalLength),
    WEIGHT_PERCENTAGES,
];

const TOTAL_WEIGHT_DRIVES_COMBINED: &[Rule] = &[
    COMBINED_FROM_TOTAL,
    REMAINING_FROM_USED,
    to_length(TotalWeight, TotalLength),
    WEIGHT_PERCENTAGES,
];

const USED_WEIGHT: &[Rule] = &[
    to_length(UsedWeight, UsedLength),
    REMAINING_FROM_USED,
    WEIGHT_PERCENTAGES,
];

const REMAINING_WEIGHT_COMBINED: &[Rule] = &[
    REMAINING_COMBINED_FROM_REMAINING,
    USED_FROM_REMAINING,
    to_length(RemainingWeight, RemainingLength),
    WEIGHT_PERCENTAGES,
];

const REMAINING_WEIGHT: &[Rule] = &[
    USED_FROM_REMAINING,
    to_length(RemainingWeight, RemainingLength),
    WEIGHT_PERCENTAGES,
];

const TOTAL_LENGTH: &[Rule] = &[to_weight(TotalLength, TotalWeight), LENGTH_PERCENTAGES];
const USED_LENGTH: &[Rule] = &[to_weight(UsedLength, UsedWeight), LENGTH_PERCENTAGES];
const REMAINING_LENGTH: &[Rule] = &[to_weight(RemainingLength, RemainingWeight), LENGTH_PERCENTAGES];

const CONVERT_ALL_UNITS: &[Rule] = &[
    to_length(TotalWeight, TotalLength),
    to_weight(TotalLength, TotalWeight),
    to_length(UsedWeight, UsedLength),
    to_weight(UsedLength, UsedWeight),
    to_length(RemainingWeight, RemainingLength),
    to_weight(RemainingLength, RemainingWeight),
];

const SPOOL_WEIGHT_FILAMENT: &[Rule] = &[TOTAL_FROM_COMBINED];
const SPOOL_WEIGHT_COMBINED: &[Rule] = &[COMBINED_FROM_TOTAL, REMAINING_COMBINED_FROM_REMAINING];

const TOTAL_COMBINED_FILAMENT: &[Rule] = &[TOTAL_FROM_COMBINED];
const TOTAL_COMBINED_SPOOL: &[Rule] = &[SPOOL_FROM_COMBINED];

const REMAINING_COMBINED_FILAMENT: &[Rule] = &[REMAINING_FROM_REMAINING_COMBINED];

const NO_RULES: &[Rule] = &[];

/// Rules run when `field` changes under `scope`, in order
pub fn rules_for(field: Field, scope: DrivenScope) -> &'static [Rule] {
    match (field, scope) {
        (TotalWeight, DrivenScope::Spool) => TOTAL_WEIGHT_DRIVES_SPOOL,
        (TotalWeight, _) => TOTAL_WEIGHT_DRIVES_COMBINED,
        (UsedWeight, _) => USED_WEIGHT,
        (RemainingWeight, DrivenScope::Combined) => REMAINING_WEIGHT_COMBINED,
        (RemainingWeight, _) => REMAINING_WEIGHT,
        (TotalLength, _) => TOTAL_LENGTH,
        (UsedLength, _) => USED_LENGTH,
        (RemainingLength, _) => REMAINING_LENGTH,
        (Density, _) | (Diameter, _) => CONVERT_ALL_UNITS,
        (SpoolWeight, DrivenScope::Filament) => SPOOL_WEIGHT_FILAMENT,
        (SpoolWeight, DrivenScope::Combined) => SPOOL_WEIGHT_COMBINED,
        (SpoolWeight, DrivenScope::Spool) => NO_RULES,
        (TotalCombinedWeight, DrivenScope::Filament) => TOTAL_COMBINED_FILAMENT,
        (TotalCombinedWeight, DrivenScope::Spool) => TOTAL_COMBINED_SPOOL,
        (TotalCombinedWeight, DrivenScope::Combined) => NO_RULES,
        (RemainingCombinedWeight, DrivenScope::Filament) => REMAINING_COMBINED_FILAMENT,
        (RemainingCombinedWeight, _) => NO_RULES,
        (UsedPercentage, _)
        | (RemainingPercentage, _)
        | (UsedLengthPercentage, _)
        | (RemainingLengthPercentage, _) => NO_RULES,
    }
}

/// Percentage pairs waiting for the end of the cascade
#[derive(Debug, Clone, Copy, Default)]
struct PendingPercentages {
    weight: bool,
    length: bool,
}

impl PendingPercentages {
    fn mark(&mut self, pair: PercentagePair) {
        match pair {
            PercentagePair::Weight => self.weight = true,
            PercentagePair::Length => self.length = true,
        }
    }
}

/// One edit's walk through the graph
///
/// Borrows the engine's state for the duration of a single edit. Dropped
/// when the edit returns, taking the pending percentage flags with it.
pub(crate) struct Propagation<'a, O: FieldObserver> {
    cells: &'a mut [Quantity; FIELD_COUNT],
    scope: DrivenScope,
    scheduler: &'a mut PropagationScheduler,
    observer: &'a mut O,
    report: &'a mut CascadeReport,
    pending: PendingPercentages,
}

impl<'a, O: FieldObserver> Propagation<'a, O> {
    pub(crate) fn new(
        cells: &'a mut [Quantity; FIELD_COUNT],
        scope: DrivenScope,
        scheduler: &'a mut PropagationScheduler,
        observer: &'a mut O,
        report: &'a mut CascadeReport,
    ) -> Self {
        Self {
            cells,
            scope,
            scheduler,
            observer,
            report,
            pending: PendingPercentages::default(),
        }
    }

    /// User edit: store unconditionally, cascade if the value changed
    pub(crate) fn edit(&mut self, field: Field, value: f64) {
        self.write(field, value);
    }

    /// Re-run the rules of `field` as if it had just changed
    pub(crate) fn touch(&mut self, field: Field) {
        self.dispatch(field);
    }

    fn value(&self, field: Field) -> f64 {
        self.cells[field.index()].value()
    }

    fn write(&mut self, field: Field, value: f64) {
        let Some(old) = self.cells[field.index()].set(value) else {
            return;
        };

        let change = FieldChange { field, old, new: value };
        log_trace!("{}: {} -> {}", field.name(), old, value);
        self.report.record(change);
        self.observer.field_changed(&change);
        self.dispatch(field);
    }

    fn dispatch(&mut self, field: Field) {
        let root = self.scheduler.is_root(field);
        if root {
            log_debug!("Cascade from {} ({} scope)", field.name(), self.scope.name());
        }

        for rule in rules_for(field, self.scope) {
            self.apply(*rule);
        }

        if root {
            self.settle_percentages();
            log_debug!(
                "Cascade from {} settled, {} fields changed",
                field.name(),
                self.report.len()
            );
        }
        self.scheduler.end_if_root(root);
    }

    fn apply(&mut self, rule: Rule) {
        match rule {
            Rule::Derive { target, operation, lhs, rhs } => self.derive(target, operation, lhs, rhs),
            Rule::Convert { source, target, conversion } => self.convert(source, target, conversion),
            Rule::Percentages(pair) => self.pending.mark(pair),
        }
    }

    fn derive(&mut self, target: Field, operation: Operation, lhs: Field, rhs: Field) {
        if !self.scheduler.try_lock(target) {
            log_trace!("{} already settled, skipping derive", target.name());
            return;
        }

        let result = operation.apply(
            math::value_or_zero(self.value(lhs)),
            math::value_or_zero(self.value(rhs)),
        );
        self.write(target, math::round_with_precision(result, WEIGHT_PRECISION));
    }

    fn convert(&mut self, source: Field, target: Field, conversion: Conversion) {
        let value = self.value(source);
        let density = self.value(Field::Density);
        let diameter = self.value(Field::Diameter);

        if !value.is_finite() || !math::conversion_valid(density, diameter) {
            return;
        }
        if !self.scheduler.try_lock(target) {
            log_trace!("{} already settled, skipping conversion", target.name());
            return;
        }
        self.scheduler.try_lock(source);

        self.write(target, conversion.apply(value, density, diameter));
    }

    fn settle_percentages(&mut self) {
        let pending = core::mem::take(&mut self.pending);
        if pending.weight {
            self.write_percentages(PercentagePair::Weight);
        }
        if pending.length {
            self.write_percentages(PercentagePair::Length);
        }
    }

    fn write_percentages(&mut self, pair: PercentagePair) {
        let (total, used, used_pct, remaining_pct) = pair.fields();
        let (used_share, remaining_share) = math::percentage_pair(self.value(total), self.value(used));

        if self.scheduler.try_lock(used_pct) {
            self.write(used_pct, used_share);
        }
        if self.scheduler.try_lock(remaining_pct) {
            self.write(remaining_pct, remaining_share);
        }
    }
}
