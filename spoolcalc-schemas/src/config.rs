//! Template Copy Configuration
//!
//! Creating a spool from a template copies the template's record and then
//! clears whatever belongs to the template spool alone: its identity, its
//! consumption history and everything derived from it. Users extend that
//! list with their own keys (a vendor's lot number, a purchase date).
//!
//! The configuration is stored as JSON next to the other editor settings:
//!
//! ```json
//! {
//!   "excludedFields": ["purchasedOn", "allNotes"],
//!   "clearNotes": false
//! }
//! ```
//!
//! `allNotes` is not a record key; listing it clears every note key, the
//! same as `clearNotes: true`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::RecordError;

/// Pseudo-key standing for every note key
pub const ALL_NOTES: &str = "allNotes";

/// Record keys holding the spool's notes
pub const NOTE_KEYS: [&str; 3] = ["noteText", "noteDeltaFormat", "noteHtml"];

/// Keys identifying the template spool itself, removed on copy
pub const IDENTITY_KEYS: [&str; 5] = ["databaseId", "version", "selectedForTool", "firstUse", "lastUse"];

/// Consumption fields reset to zero on copy
pub const ZEROED_KEYS: [&str; 4] = ["usedWeight", "usedLength", "usedPercentage", "usedLengthPercentage"];

/// Fields derived from consumption, unset on copy
pub const UNSET_KEYS: [&str; 6] = [
    "remainingWeight",
    "remainingLength",
    "remainingPercentage",
    "remainingLengthPercentage",
    "totalCombinedWeight",
    "remainingCombinedWeight",
];

lazy_static::lazy_static! {
    /// Configuration with no user exclusions
    pub static ref DEFAULT_TEMPLATE_CONFIG: TemplateConfig = TemplateConfig::default();

    static ref ALWAYS_EXCLUDED: HashSet<&'static str> = IDENTITY_KEYS
        .iter()
        .chain(ZEROED_KEYS.iter())
        .chain(UNSET_KEYS.iter())
        .copied()
        .collect();
}

/// User settings for template copies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TemplateConfig {
    /// Extra record keys to clear, may include `allNotes`
    #[serde(alias = "excludedFromTemplateCopy")]
    pub excluded_fields: Vec<String>,
    /// Clear every note key
    pub clear_notes: bool,
}

impl TemplateConfig {
    /// Parse settings JSON
    pub fn from_json(text: &str) -> Result<Self, RecordError> {
        serde_json::from_str(text).map_err(|e| RecordError::Config(e.to_string()))
    }

    /// Serialize to settings JSON
    pub fn to_json(&self) -> Result<String, RecordError> {
        serde_json::to_string(self).map_err(|e| RecordError::Config(e.to_string()))
    }

    /// Exclude one more key
    pub fn exclude(mut self, key: impl Into<String>) -> Self {
        self.excluded_fields.push(key.into());
        self
    }

    /// True if note keys are cleared on copy
    pub fn clears_notes(&self) -> bool {
        self.clear_notes || self.excluded_fields.iter().any(|key| key == ALL_NOTES)
    }

    /// True if `key` is cleared on copy, by default or by this configuration
    pub fn excludes(&self, key: &str) -> bool {
        ALWAYS_EXCLUDED.contains(key)
            || self.excluded_fields.iter().any(|excluded| excluded == key)
            || (self.clears_notes() && NOTE_KEYS.contains(&key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_exclude_identity_and_history() {
        let config = TemplateConfig::default();
        assert!(config.excludes("databaseId"));
        assert!(config.excludes("usedWeight"));
        assert!(config.excludes("totalCombinedWeight"));
        assert!(!config.excludes("spoolWeight"));
        assert!(!config.excludes("noteText"));
        assert_eq!(*DEFAULT_TEMPLATE_CONFIG, config);
    }

    #[test]
    fn all_notes_pseudo_key() {
        let config = TemplateConfig::default().exclude(ALL_NOTES);
        assert!(config.clears_notes());
        assert!(config.excludes("noteHtml"));
        assert!(!config.excludes("vendor"));
    }

    #[test]
    fn parse_settings() {
        let config = TemplateConfig::from_json(r#"{"excludedFromTemplateCopy": ["vendor"]}"#).unwrap();
        assert!(config.excludes("vendor"));
        assert!(!config.clear_notes);

        let config = TemplateConfig::from_json(r#"{"excludedFields": [], "clearNotes": true}"#).unwrap();
        assert!(config.excludes("noteText"));

        assert!(matches!(
            TemplateConfig::from_json("[1, 2]"),
            Err(RecordError::Config(_))
        ));
    }

    #[test]
    fn settings_json_round_trip() {
        let config = TemplateConfig::default().exclude("purchasedOn");
        let text = config.to_json().unwrap();
        assert_eq!(TemplateConfig::from_json(&text).unwrap(), config);
    }
}
