//! Integration tests for complete edit cascades
//!
//! Each test drives the engine the way the spool editor does: a scope is
//! selected, fields are edited one at a time, and the settled values are
//! checked after every step.

mod common;

use spoolcalc_core::{math, DrivenScope, Field, SpoolEngine};

use common::{
    assert_close, assert_percentages_consistent, assert_single_writes, pla_engine,
    recording_pla_engine, ABS_DENSITY, DIAMETER_175, PLA_DENSITY,
};

#[test]
fn filament_scope_derives_filament_amount() {
    let mut engine = SpoolEngine::new();
    engine.set_driven_scope(DrivenScope::Filament);

    engine.set_field(Field::SpoolWeight, 200.0);
    let report = engine.set_field(Field::TotalCombinedWeight, 1200.0);

    assert_eq!(engine.get(Field::TotalWeight), Some(1000.0));
    assert_eq!(engine.get(Field::TotalCombinedWeight), Some(1200.0));
    assert!(report.changed(Field::TotalWeight));
    assert_single_writes(&report);
}

#[test]
fn spool_scope_derives_spool_weight() {
    let mut engine = SpoolEngine::new();
    engine.set_driven_scope(DrivenScope::Spool);

    engine.set_field(Field::TotalWeight, 1000.0);
    engine.set_field(Field::TotalCombinedWeight, 1300.0);
    assert_eq!(engine.get(Field::SpoolWeight), Some(300.0));

    engine.set_field(Field::TotalWeight, 900.0);
    assert_eq!(engine.get(Field::SpoolWeight), Some(400.0));
    assert_eq!(engine.get(Field::TotalCombinedWeight), Some(1300.0));
}

#[test]
fn combined_scope_derives_combined_weight() {
    let mut engine = pla_engine(DrivenScope::Combined);

    engine.set_field(Field::TotalWeight, 1000.0);
    engine.set_field(Field::SpoolWeight, 250.0);
    assert_eq!(engine.get(Field::TotalCombinedWeight), Some(1250.0));
    assert_eq!(engine.get(Field::RemainingCombinedWeight), Some(1250.0));

    engine.set_field(Field::UsedWeight, 400.0);
    assert_eq!(engine.get(Field::RemainingWeight), Some(600.0));
    assert_eq!(engine.get(Field::RemainingCombinedWeight), Some(850.0));
    assert_eq!(engine.get(Field::TotalCombinedWeight), Some(1250.0));
}

#[test]
fn density_change_converts_from_weight() {
    let mut engine = pla_engine(DrivenScope::Combined);
    engine.set_field(Field::TotalWeight, 1000.0);
    assert_eq!(
        engine.get(Field::TotalLength),
        Some(math::to_length(1000.0, PLA_DENSITY, DIAMETER_175))
    );

    let report = engine.set_field(Field::Density, ABS_DENSITY);

    assert_eq!(engine.get(Field::TotalWeight), Some(1000.0));
    assert_eq!(
        engine.get(Field::TotalLength),
        Some(math::to_length(1000.0, ABS_DENSITY, DIAMETER_175))
    );
    assert!(!report.changed(Field::TotalWeight));
    assert!(report.changed(Field::TotalLength));
    assert_single_writes(&report);
}

#[test]
fn length_edit_converts_to_weight() {
    let mut engine = pla_engine(DrivenScope::Combined);
    engine.set_field(Field::TotalWeight, 1000.0);

    let length = math::to_length(250.0, PLA_DENSITY, DIAMETER_175);
    engine.set_field(Field::UsedLength, length);

    assert_close(engine.get(Field::UsedWeight), 250.0, 0.1);
    assert_close(engine.get(Field::RemainingWeight), 750.0, 0.1);
    assert_eq!(engine.get(Field::UsedPercentage), Some(25.0));
    assert_eq!(engine.get(Field::RemainingPercentage), Some(75.0));
    assert_percentages_consistent(&engine);
}

#[test]
fn conversions_wait_for_valid_material() {
    let mut engine = SpoolEngine::new();
    engine.set_field(Field::TotalWeight, 1000.0);
    assert_eq!(engine.get(Field::TotalLength), None);

    engine.set_field(Field::Density, PLA_DENSITY);
    assert_eq!(engine.get(Field::TotalLength), None);

    engine.set_field(Field::Diameter, DIAMETER_175);
    assert_eq!(
        engine.get(Field::TotalLength),
        Some(math::to_length(1000.0, PLA_DENSITY, DIAMETER_175))
    );

    // An invalid diameter leaves the lengths alone
    engine.set_field(Field::Diameter, 0.0);
    assert_eq!(
        engine.get(Field::TotalLength),
        Some(math::to_length(1000.0, PLA_DENSITY, DIAMETER_175))
    );
}

#[test]
fn percentages_follow_weights() {
    let mut engine = SpoolEngine::new();
    engine.set_field(Field::TotalWeight, 100.0);
    engine.set_field(Field::UsedWeight, 30.0);

    assert_eq!(engine.get(Field::UsedPercentage), Some(30.0));
    assert_eq!(engine.get(Field::RemainingPercentage), Some(70.0));

    engine.set_field(Field::UsedWeight, 150.0);
    assert_eq!(engine.get(Field::UsedPercentage), None);
    assert_eq!(engine.get(Field::RemainingPercentage), None);

    engine.set_field(Field::UsedWeight, 30.0);
    engine.set_field(Field::TotalWeight, 0.0);
    assert_eq!(engine.get(Field::UsedPercentage), None);
    assert_eq!(engine.get(Field::RemainingPercentage), None);
    assert_percentages_consistent(&engine);
}

#[test]
fn remaining_edit_updates_used() {
    let mut engine = pla_engine(DrivenScope::Combined);
    engine.set_field(Field::TotalWeight, 1000.0);
    engine.set_field(Field::SpoolWeight, 200.0);

    let report = engine.set_field(Field::RemainingWeight, 640.0);

    assert_eq!(engine.get(Field::UsedWeight), Some(360.0));
    assert_eq!(engine.get(Field::RemainingCombinedWeight), Some(840.0));
    assert_eq!(engine.get(Field::UsedPercentage), Some(36.0));
    assert_eq!(
        engine.get(Field::RemainingLength),
        Some(math::to_length(640.0, PLA_DENSITY, DIAMETER_175))
    );
    assert_single_writes(&report);
}

#[test]
fn remaining_combined_edit_in_filament_scope() {
    let mut engine = SpoolEngine::new();
    engine.set_driven_scope(DrivenScope::Filament);
    engine.set_field(Field::SpoolWeight, 200.0);
    engine.set_field(Field::TotalCombinedWeight, 1200.0);

    engine.set_field(Field::RemainingCombinedWeight, 700.0);

    assert_eq!(engine.get(Field::RemainingWeight), Some(500.0));
    assert_eq!(engine.get(Field::UsedWeight), Some(500.0));
}

#[test]
fn scope_change_recomputes_nothing() {
    let mut engine = SpoolEngine::new();
    engine.set_field(Field::TotalWeight, 1000.0);
    engine.set_field(Field::SpoolWeight, 200.0);
    let before = engine.snapshot();

    engine.set_driven_scope(DrivenScope::Filament);
    for (field, value) in before.iter() {
        assert_eq!(engine.get(field), before.get(field), "{} changed from {}", field, value);
    }

    // The next trio edit reconciles under the new scope
    engine.set_field(Field::SpoolWeight, 250.0);
    assert_eq!(engine.get(Field::TotalWeight), Some(950.0));
    assert_eq!(engine.get(Field::TotalCombinedWeight), Some(1200.0));
}

#[test]
fn toggling_trio_writes_each_field_once() {
    let mut engine = pla_engine(DrivenScope::Combined);

    for step in 0..200u32 {
        let value = f64::from(step % 17) * 37.5 + 100.0;
        let report = if step % 2 == 0 {
            engine.set_field(Field::TotalWeight, value)
        } else {
            engine.set_field(Field::SpoolWeight, value / 4.0)
        };
        assert_single_writes(&report);
        assert!(!engine.scheduler().in_cascade());
        assert_percentages_consistent(&engine);
    }
}

#[test]
fn every_scope_and_field_terminates() {
    for scope in DrivenScope::ALL {
        for field in Field::ALL {
            let mut engine = pla_engine(scope);
            engine.set_field(Field::TotalWeight, 1000.0);
            engine.set_field(Field::SpoolWeight, 200.0);
            engine.set_field(Field::UsedWeight, 100.0);

            let report = engine.set_field(field, 321.0);
            assert_single_writes(&report);
            assert!(!engine.scheduler().in_cascade());

            let report = engine.clear_field(field);
            assert_single_writes(&report);
        }
    }
}

#[test]
fn observer_sees_cascade_in_order() {
    let mut engine = recording_pla_engine(DrivenScope::Combined);

    let report = engine.set_field(Field::TotalWeight, 1000.0);
    let observed = engine.observer().fields();

    assert_eq!(observed.first(), Some(&Field::TotalWeight));
    assert_eq!(observed, report.fields().collect::<Vec<_>>());
    assert!(observed.contains(&Field::TotalCombinedWeight));
    assert!(observed.contains(&Field::TotalLength));
}

#[test]
fn unchanged_edit_notifies_nobody() {
    let mut engine = recording_pla_engine(DrivenScope::Combined);
    engine.set_field(Field::SpoolWeight, 200.0);
    engine.observer_mut().clear();

    let report = engine.set_field(Field::SpoolWeight, 200.0);
    assert!(report.is_empty());
    assert!(engine.observer().changes.is_empty());

    engine.clear_field(Field::UsedWeight);
    assert!(engine.observer().changes.is_empty());
}

#[test]
fn suppressed_load_keeps_explicit_values() {
    let mut engine = SpoolEngine::new();
    engine.load([
        (Field::TotalWeight, 500.0),
        (Field::SpoolWeight, 200.0),
        (Field::TotalCombinedWeight, 750.0),
        (Field::UsedPercentage, 12.0),
    ]);

    assert_eq!(engine.get(Field::TotalWeight), Some(500.0));
    assert_eq!(engine.get(Field::SpoolWeight), Some(200.0));
    assert_eq!(engine.get(Field::TotalCombinedWeight), Some(750.0));
    assert_eq!(engine.get(Field::UsedPercentage), Some(12.0));
    assert_eq!(engine.get(Field::RemainingWeight), None);
    assert_eq!(engine.get(Field::RemainingPercentage), None);
    assert!(engine.is_propagation_enabled());

    // Editing after the load propagates again
    engine.set_field(Field::SpoolWeight, 250.0);
    assert_eq!(engine.get(Field::TotalCombinedWeight), Some(750.0));
}

#[test]
fn touch_rederives_from_current_values() {
    let mut engine = SpoolEngine::new();
    engine.load([
        (Field::TotalWeight, 800.0),
        (Field::SpoolWeight, 180.0),
        (Field::UsedWeight, 0.0),
    ]);
    assert_eq!(engine.get(Field::TotalCombinedWeight), None);

    let report = engine.touch(Field::SpoolWeight);

    assert_eq!(report.root(), Some(Field::SpoolWeight));
    assert!(!report.changed(Field::SpoolWeight));
    assert_eq!(engine.get(Field::TotalCombinedWeight), Some(980.0));
    assert_eq!(engine.get(Field::RemainingCombinedWeight), Some(180.0));
}

#[test]
fn material_then_weights() {
    let mut engine = SpoolEngine::new();
    engine.set_field(Field::Diameter, DIAMETER_175);
    assert!(engine.apply_material("PLA").is_some());
    engine.set_field(Field::TotalWeight, 1000.0);
    let pla_length = engine.get(Field::TotalLength);

    engine.apply_material("abs");
    assert_eq!(engine.get(Field::Density), Some(ABS_DENSITY));
    assert!(engine.get(Field::TotalLength) > pla_length);
}
