//! Concrete configurations.
//!
//! A [`ConcreteConfig`] is one fully resolved assignment of values to every
//! parameter of a sweep space, with the same keys and nesting shape as its
//! source. Instances are produced by enumeration and consumed by dispatch;
//! nothing mutates them afterwards.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::errors::SweepResult;
use crate::value::ParamValue;

/// One resolved slot of a configuration.
///
/// Untagged: a JSON object always reads back as a nested configuration, so
/// a `ParamValue::Json` object leaf does not survive a round trip as a
/// leaf. Sweep leaves are scalars in practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Nested(ConcreteConfig),
    Value(ParamValue),
}

/// An ordered mapping from parameter name to resolved value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcreteConfig {
    entries: IndexMap<String, ConfigValue>,
}

impl ConcreteConfig {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: ConfigValue) {
        self.entries.insert(name.into(), value);
    }

    /// Chainable insert of a leaf value, for building fixtures.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, ConfigValue::Value(value.into()));
        self
    }

    /// Chainable insert of a nested configuration.
    pub fn with_nested(mut self, name: impl Into<String>, nested: ConcreteConfig) -> Self {
        self.insert(name, ConfigValue::Nested(nested));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in the fixed traversal order of the source space.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.entries.get(name)
    }

    pub fn get_value(&self, name: &str) -> Option<&ParamValue> {
        match self.entries.get(name) {
            Some(ConfigValue::Value(v)) => Some(v),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get_value(name).and_then(ParamValue::as_int)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get_value(name).and_then(ParamValue::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get_value(name).and_then(ParamValue::as_bool)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get_value(name).and_then(ParamValue::as_str)
    }

    pub fn get_nested(&self, name: &str) -> Option<&ConcreteConfig> {
        match self.entries.get(name) {
            Some(ConfigValue::Nested(sub)) => Some(sub),
            _ => None,
        }
    }

    /// The configuration as a JSON object, keys in traversal order.
    pub fn to_json_value(&self) -> SweepResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Move the configuration into a caller-defined parameter struct.
    ///
    /// This is the typed counterpart of keyword-argument dispatch: define
    /// one `Deserialize` struct per sweep schema (with `serde` defaults
    /// for optional fields) and extract it here.
    pub fn parse_into<T: DeserializeOwned>(&self) -> SweepResult<T> {
        Ok(serde_json::from_value(self.to_json_value()?)?)
    }

    /// Canonical order-stable byte encoding, used for shard hashing.
    ///
    /// Two equal configurations produce identical bytes in every process.
    /// Non-finite floats have no JSON form; such configurations all hash
    /// through the empty encoding.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_vec(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ConcreteConfig {
        ConcreteConfig::new()
            .with("lr", 0.01)
            .with("batch_size", 64i64)
            .with_nested("model", ConcreteConfig::new().with("hidden", 128i64))
    }

    #[test]
    fn typed_accessors() {
        let config = sample();
        assert_eq!(config.get_f64("lr"), Some(0.01));
        assert_eq!(config.get_int("batch_size"), Some(64));
        assert_eq!(
            config.get_nested("model").and_then(|m| m.get_int("hidden")),
            Some(128)
        );
        assert_eq!(config.get_int("missing"), None);
        assert_eq!(config.get_str("lr"), None);
    }

    #[test]
    fn json_form_keeps_traversal_order() {
        let json = String::from_utf8(sample().canonical_bytes()).unwrap();
        assert_eq!(
            json,
            r#"{"lr":0.01,"batch_size":64,"model":{"hidden":128}}"#
        );
    }

    #[test]
    fn canonical_bytes_are_order_sensitive() {
        let a = ConcreteConfig::new().with("x", 1i64).with("y", 2i64);
        let b = ConcreteConfig::new().with("y", 2i64).with("x", 1i64);
        assert_ne!(a.canonical_bytes(), b.canonical_bytes());
        assert_eq!(a.canonical_bytes(), a.clone().canonical_bytes());
    }

    #[test]
    fn parse_into_typed_struct() {
        #[derive(serde::Deserialize)]
        struct Model {
            hidden: u32,
        }

        #[derive(serde::Deserialize)]
        struct Params {
            lr: f64,
            batch_size: usize,
            model: Model,
            #[serde(default = "default_epochs")]
            epochs: usize,
        }

        fn default_epochs() -> usize {
            10
        }

        let params: Params = sample().parse_into().unwrap();
        assert_eq!(params.lr, 0.01);
        assert_eq!(params.batch_size, 64);
        assert_eq!(params.model.hidden, 128);
        assert_eq!(params.epochs, 10);
    }

    #[test]
    fn serde_round_trip() {
        let config = sample();
        let json = serde_json::to_string(&config).unwrap();
        let back: ConcreteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
