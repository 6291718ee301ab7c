//! Shared fixtures and assertions for engine integration tests
//!
//! - Engines preloaded with common filament settings
//! - A recording observer for checking notification order
//! - Invariant checks applied after every scenario step

#![allow(dead_code)]

use spoolcalc_core::{
    CascadeReport, DrivenScope, Field, FieldChange, FieldObserver, SpoolEngine,
};

pub const PLA_DENSITY: f64 = 1.24;
pub const ABS_DENSITY: f64 = 1.04;
pub const DIAMETER_175: f64 = 1.75;

/// Weight tolerance matching the 0.1 g rounding of derived weights
pub const WEIGHT_TOLERANCE: f64 = 0.051;

/// Observer that keeps every change it sees
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub changes: Vec<FieldChange>,
}

impl RecordingObserver {
    pub fn fields(&self) -> Vec<Field> {
        self.changes.iter().map(|change| change.field).collect()
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }
}

impl FieldObserver for RecordingObserver {
    fn field_changed(&mut self, change: &FieldChange) {
        self.changes.push(*change);
    }
}

/// Engine with 1.75 mm PLA settings under `scope`
pub fn pla_engine(scope: DrivenScope) -> SpoolEngine {
    let mut engine = SpoolEngine::new();
    engine.set_driven_scope(scope);
    engine.set_field(Field::Density, PLA_DENSITY);
    engine.set_field(Field::Diameter, DIAMETER_175);
    engine
}

/// Recording engine with 1.75 mm PLA settings, observer emptied
pub fn recording_pla_engine(scope: DrivenScope) -> SpoolEngine<RecordingObserver> {
    let mut engine = SpoolEngine::with_observer(RecordingObserver::default());
    engine.set_driven_scope(scope);
    engine.set_field(Field::Density, PLA_DENSITY);
    engine.set_field(Field::Diameter, DIAMETER_175);
    engine.observer_mut().clear();
    engine
}

pub fn assert_close(actual: Option<f64>, expected: f64, tolerance: f64) {
    match actual {
        Some(value) => assert!(
            (value - expected).abs() <= tolerance,
            "expected {} within {}, got {}",
            expected,
            tolerance,
            value
        ),
        None => panic!("expected {}, field is unset", expected),
    }
}

/// No field appears twice in one cascade
pub fn assert_single_writes(report: &CascadeReport) {
    for field in Field::ALL {
        assert!(
            report.writes_of(field) <= 1,
            "{} written {} times",
            field,
            report.writes_of(field)
        );
    }
    assert!(report.len() <= Field::ALL.len());
}

/// A percentage pair is either both unset or sums to 100
pub fn assert_percentages_consistent<O: FieldObserver>(engine: &SpoolEngine<O>) {
    for (used, remaining) in [
        (Field::UsedPercentage, Field::RemainingPercentage),
        (Field::UsedLengthPercentage, Field::RemainingLengthPercentage),
    ] {
        match (engine.get(used), engine.get(remaining)) {
            (None, None) => {}
            (Some(u), Some(r)) => {
                assert_eq!(u + r, 100.0, "{} + {} != 100", used, remaining);
                assert!((0.0..=100.0).contains(&u));
            }
            (u, r) => panic!("half-defined pair {}={:?} {}={:?}", used, u, remaining, r),
        }
    }
}
