//! Edit Sessions
//!
//! An [`EditSession`] is what the spool dialog holds while it is open: the
//! record being edited and the engine keeping its numbers consistent.
//!
//! ```text
//! open(record)            reset scope, fill gaps, load suppressed
//!   │
//!   ├─ set_field_text     full cascade per edit
//!   ├─ set_driven_scope   no cascade
//!   ├─ copy_from_template reload from another record, re-derive
//!   │
//! to_record()             document with engine fields written back
//! ```
//!
//! Opening never recomputes what the record states. Values the record lacks
//! but that follow directly from what it has (the combined weights, the
//! percentage shares) are filled in before the load, so a freshly opened
//! session shows a complete picture without overriding a stored value.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use spoolcalc_core::constants::WEIGHT_PRECISION;
use spoolcalc_core::fields::FIELD_COUNT;
use spoolcalc_core::graph::PercentagePair;
use spoolcalc_core::{math, CascadeReport, EngineConfig, Field, FieldObserver, NoopObserver, SpoolEngine};

use crate::config::{TemplateConfig, ZEROED_KEYS};
use crate::record::SpoolRecord;
use crate::RecordError;

/// Text keys a save requires to be non-blank
pub const REQUIRED_TEXT_KEYS: [&str; 2] = ["displayName", "colorName"];

/// Optional keys holding a date and time, validated when filled
pub const DATETIME_KEYS: [&str; 2] = ["firstUse", "lastUse"];

/// Optional keys holding a date, validated when filled
pub const DATE_KEYS: [&str; 1] = ["purchasedOn"];

/// Form input format first, then the stored display format
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%d.%m.%Y %H:%M"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d.%m.%Y"];

/// One spool being edited
#[derive(Debug, Clone)]
pub struct EditSession<O: FieldObserver = NoopObserver> {
    engine: SpoolEngine<O>,
    document: SpoolRecord,
}

impl Default for EditSession<NoopObserver> {
    fn default() -> Self {
        Self::open(SpoolRecord::new())
    }
}

impl EditSession<NoopObserver> {
    /// Open `record` with default engine settings
    pub fn open(record: SpoolRecord) -> Self {
        Self::with_engine(SpoolEngine::new(), record)
    }

    /// Open `record` with custom engine settings
    pub fn open_with_config(record: SpoolRecord, config: EngineConfig) -> Self {
        Self::with_engine(SpoolEngine::with_config(config), record)
    }
}

impl<O: FieldObserver> EditSession<O> {
    /// Open `record` on an existing engine, discarding its state
    pub fn with_engine(engine: SpoolEngine<O>, record: SpoolRecord) -> Self {
        let mut session = Self {
            engine,
            document: SpoolRecord::new(),
        };
        session.load(record);
        session
    }

    /// Engine holding the numeric fields
    pub fn engine(&self) -> &SpoolEngine<O> {
        &self.engine
    }

    /// Engine holding the numeric fields, mutably
    pub fn engine_mut(&mut self) -> &mut SpoolEngine<O> {
        &mut self.engine
    }

    /// Document as opened, including non-numeric edits
    ///
    /// Engine fields in here are the values at open time; use
    /// [`EditSession::to_record`] for the current state.
    pub fn document(&self) -> &SpoolRecord {
        &self.document
    }

    /// Document for editing keys the engine does not track
    pub fn document_mut(&mut self) -> &mut SpoolRecord {
        &mut self.document
    }

    /// Apply form text to the field with record key `name`
    pub fn set_field_text(&mut self, name: &str, text: &str) -> Result<CascadeReport, RecordError> {
        let field = Field::from_name(name)?;
        Ok(self.engine.set_field_text(field, text))
    }

    /// Select the driven scope by wire name
    pub fn set_driven_scope(&mut self, name: &str) -> Result<(), RecordError> {
        self.engine.set_driven_scope_by_name(name)?;
        Ok(())
    }

    /// Store the material and apply its typical density, if known
    pub fn set_material(&mut self, material: &str) -> Option<CascadeReport> {
        self.document.set("material", material);
        let report = self.engine.apply_material(material);
        if report.is_none() {
            log::warn!("No density known for material {:?}, keeping current density", material);
        }
        report
    }

    /// True once the record has every value a save needs
    ///
    /// A save needs a display name, a color name and the total combined
    /// weight. Dates may be left blank, but a filled one must parse.
    pub fn is_complete(&self) -> bool {
        REQUIRED_TEXT_KEYS.iter().all(|key| has_text(&self.document, key))
            && self.engine.get(Field::TotalCombinedWeight).is_some()
            && DATETIME_KEYS.iter().all(|key| date_valid(&self.document, key, is_datetime))
            && DATE_KEYS.iter().all(|key| date_valid(&self.document, key, is_date))
    }

    /// Current state as a record
    pub fn to_record(&self) -> SpoolRecord {
        let mut record = self.document.clone();
        for (field, value) in self.engine.snapshot().iter() {
            record.set_number(field, value);
        }
        record
    }

    /// Start a new spool from `template`
    ///
    /// Keeps the template's material, spool and total values; drops its
    /// identity and consumption, then re-derives everything that depends on
    /// them. The driven scope returns to the configured default.
    pub fn copy_from_template(&mut self, template: &SpoolRecord, config: &TemplateConfig) {
        let mut document = template.clone();

        let cleared: Vec<String> = document
            .keys()
            .filter(|key| config.excludes(key))
            .map(String::from)
            .collect();
        for key in &cleared {
            document.remove(key);
        }
        for key in ZEROED_KEYS {
            document.set(key, 0.0);
        }
        document.set("isTemplate", false);
        document.set("isActive", true);

        log::debug!(
            "Copying template {:?}, cleared {} keys",
            template.get("displayName"),
            cleared.len()
        );

        self.load(document);
        self.engine.touch(Field::UsedWeight);
        self.engine.touch(Field::UsedLength);
        self.engine.touch(Field::SpoolWeight);
    }

    /// Turn this session into a new spool based on its current state
    pub fn duplicate(&mut self, config: &TemplateConfig) {
        let template = self.to_record();
        self.copy_from_template(&template, config);
    }

    fn load(&mut self, record: SpoolRecord) {
        for (field, value) in record.engine_values() {
            if value.is_nan() && record.has(field.name()) && !is_blank(&record, field) {
                log::warn!("Ignoring unreadable {} in record: {:?}", field, record.get(field.name()));
            }
        }

        self.engine.reset();
        self.engine.load(initial_values(&record));
        self.document = record;

        log::debug!(
            "Opened spool record ({} keys, scope {})",
            self.document.len(),
            self.engine.driven_scope()
        );
    }
}

fn is_blank(record: &SpoolRecord, field: Field) -> bool {
    record
        .get(field.name())
        .and_then(|value| value.as_str())
        .map_or(false, |text| text.trim().is_empty())
}

fn has_text(record: &SpoolRecord, key: &str) -> bool {
    record
        .get(key)
        .and_then(|value| value.as_str())
        .map_or(false, |text| !text.trim().is_empty())
}

/// Missing, `null` and blank are valid; anything else must parse
fn date_valid(record: &SpoolRecord, key: &str, parses: fn(&str) -> bool) -> bool {
    match record.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.trim().is_empty() || parses(text.trim()),
        Some(_) => false,
    }
}

fn is_datetime(text: &str) -> bool {
    DATETIME_FORMATS
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(text, format).is_ok())
}

fn is_date(text: &str) -> bool {
    DATE_FORMATS
        .iter()
        .any(|format| NaiveDate::parse_from_str(text, format).is_ok())
}

/// Record values with derivable gaps filled in
fn initial_values(record: &SpoolRecord) -> [(Field, f64); FIELD_COUNT] {
    let mut values = Field::ALL.map(|field| record.number(field));

    fill_sum(&mut values, Field::TotalCombinedWeight, Field::TotalWeight);
    fill_sum(&mut values, Field::RemainingCombinedWeight, Field::RemainingWeight);
    fill_percentages(&mut values, PercentagePair::Weight);
    fill_percentages(&mut values, PercentagePair::Length);

    Field::ALL.map(|field| (field, values[field.index()]))
}

fn fill_sum(values: &mut [f64; FIELD_COUNT], combined: Field, filament: Field) {
    let filament_value = values[filament.index()];
    if !values[combined.index()].is_nan() || !filament_value.is_finite() {
        return;
    }
    let spool = math::value_or_zero(values[Field::SpoolWeight.index()]);
    values[combined.index()] = math::round_with_precision(filament_value + spool, WEIGHT_PRECISION);
}

fn fill_percentages(values: &mut [f64; FIELD_COUNT], pair: PercentagePair) {
    let (total, used, used_pct, remaining_pct) = pair.fields();
    if !values[used_pct.index()].is_nan() || !values[remaining_pct.index()].is_nan() {
        return;
    }
    let (used_share, remaining_share) = math::percentage_pair(values[total.index()], values[used.index()]);
    values[used_pct.index()] = used_share;
    values[remaining_pct.index()] = remaining_share;
}
