//! Emission factor tables with explicit required/optional lookups.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::ProcessKind;
use crate::ports::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
/// A single entry of a factor table.
pub enum FactorValue {
    /// Numeric coefficient.
    Number(f64),
    /// Switch such as `enforce_emission_limits`.
    Flag(bool),
    /// Nested coefficients such as `emission_limits`.
    Table(BTreeMap<String, f64>),
}

impl From<f64> for FactorValue {
    fn from(value: f64) -> Self {
        FactorValue::Number(value)
    }
}

impl From<bool> for FactorValue {
    fn from(value: bool) -> Self {
        FactorValue::Flag(value)
    }
}

impl From<BTreeMap<String, f64>> for FactorValue {
    fn from(value: BTreeMap<String, f64>) -> Self {
        FactorValue::Table(value)
    }
}

/// Read-only coefficient template for one process.
///
/// Scenario adjustments never touch the table; processes resolve their own
/// working coefficients from it on every call.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorTable {
    process: ProcessKind,
    entries: BTreeMap<String, FactorValue>,
}

impl FactorTable {
    /// Empty table for a process.
    #[must_use]
    pub fn new(process: ProcessKind) -> Self {
        Self {
            process,
            entries: BTreeMap::new(),
        }
    }

    /// Table built from already-parsed entries.
    #[must_use]
    pub fn from_entries(process: ProcessKind, entries: BTreeMap<String, FactorValue>) -> Self {
        Self { process, entries }
    }

    /// Builder-style setter.
    #[must_use]
    pub fn with<K: Into<String>, V: Into<FactorValue>>(mut self, key: K, value: V) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Process the table belongs to.
    #[must_use]
    pub fn process(&self) -> ProcessKind {
        self.process
    }

    /// Raw entries.
    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, FactorValue> {
        &self.entries
    }

    /// Numeric factor that a formula cannot do without.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingFactor`] when the key is absent and
    /// [`EngineError::InvalidFactor`] when it is not a number.
    pub fn required(&self, key: &str) -> Result<f64, EngineError> {
        match self.entries.get(key) {
            Some(FactorValue::Number(value)) => Ok(*value),
            Some(_) => Err(self.invalid(key, "a number")),
            None => Err(EngineError::MissingFactor {
                process: self.process,
                key: key.to_owned(),
            }),
        }
    }

    /// Numeric factor with a fallback for absent keys.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFactor`] when the key holds a non-number.
    pub fn optional_or(&self, key: &str, default: f64) -> Result<f64, EngineError> {
        match self.entries.get(key) {
            Some(FactorValue::Number(value)) => Ok(*value),
            Some(_) => Err(self.invalid(key, "a number")),
            None => Ok(default),
        }
    }

    /// Boolean switch, `false` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFactor`] when the key holds a non-boolean.
    pub fn flag(&self, key: &str) -> Result<bool, EngineError> {
        match self.entries.get(key) {
            Some(FactorValue::Flag(value)) => Ok(*value),
            Some(_) => Err(self.invalid(key, "a boolean")),
            None => Ok(false),
        }
    }

    /// Nested table, empty when absent.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFactor`] when the key holds a scalar.
    pub fn table(&self, key: &str) -> Result<BTreeMap<String, f64>, EngineError> {
        match self.entries.get(key) {
            Some(FactorValue::Table(values)) => Ok(values.clone()),
            Some(_) => Err(self.invalid(key, "a table of numbers")),
            None => Ok(BTreeMap::new()),
        }
    }

    fn invalid(&self, key: &str, expected: &'static str) -> EngineError {
        EngineError::InvalidFactor {
            process: self.process,
            key: key.to_owned(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> FactorTable {
        FactorTable::new(ProcessKind::Landfill)
            .with("time_period", 100.0)
            .with("enforce", true)
            .with("limits", BTreeMap::from([("pm10".to_owned(), 0.002)]))
    }

    #[test]
    fn required_reads_numbers() {
        assert_eq!(table().required("time_period").expect("present"), 100.0);
    }

    #[test]
    fn required_fails_on_missing_key() {
        let err = table().required("fast_decay_rate").expect_err("absent");
        match err {
            EngineError::MissingFactor { process, key } => {
                assert_eq!(process, ProcessKind::Landfill);
                assert_eq!(key, "fast_decay_rate");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn required_rejects_wrong_shape() {
        assert!(matches!(
            table().required("enforce"),
            Err(EngineError::InvalidFactor { .. })
        ));
    }

    #[test]
    fn optional_lookups_fall_back() {
        let factors = table();
        assert_eq!(factors.optional_or("combustion_efficiency", 1.0).expect("absent"), 1.0);
        assert!(factors.flag("enforce").expect("bool"));
        assert!(!factors.flag("missing").expect("absent"));
        assert!(factors.table("missing").expect("absent").is_empty());
        assert_eq!(factors.table("limits").expect("table").get("pm10"), Some(&0.002));
    }

    #[test]
    fn entries_deserialize_from_json() {
        let entries: BTreeMap<String, FactorValue> = serde_json::from_str(
            r#"{"elec_per_waste": 0.7, "enforce_emission_limits": true, "emission_limits": {"nmvoc": 0.003}}"#,
        )
        .expect("deserialize");
        let factors = FactorTable::from_entries(ProcessKind::Microwave, entries);
        assert_eq!(factors.required("elec_per_waste").expect("number"), 0.7);
        assert!(factors.flag("enforce_emission_limits").expect("bool"));
        assert_eq!(factors.table("emission_limits").expect("table").len(), 1);
    }
}
