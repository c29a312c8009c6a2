//! Sweep space definitions.
//!
//! A [`SweepSpace`] maps parameter names to candidate domains: either an
//! ordered sequence of concrete values (a leaf) or a nested sub-space.
//! Insertion order is the fixed traversal order used by enumeration and
//! serialization.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::concrete::{ConcreteConfig, ConfigValue};
use crate::errors::SweepResult;
use crate::space_error;
use crate::value::ParamValue;

/// The candidate domain for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamDomain {
    /// An ordered sequence of candidate values. May be empty, which makes
    /// the whole product empty.
    Values(Vec<ParamValue>),
    /// A nested sub-space whose candidates are its own full expansions.
    Nested(SweepSpace),
}

/// An ordered mapping from parameter name to candidate domain.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SweepSpace {
    params: IndexMap<String, ParamDomain>,
}

impl SweepSpace {
    pub fn new() -> Self {
        Self {
            params: IndexMap::new(),
        }
    }

    /// Add a leaf parameter with explicit candidate values.
    pub fn add_values(mut self, name: impl Into<String>, values: Vec<ParamValue>) -> Self {
        self.params.insert(name.into(), ParamDomain::Values(values));
        self
    }

    pub fn add_ints(self, name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        let values = values.into_iter().map(ParamValue::Int).collect();
        self.add_values(name, values)
    }

    pub fn add_floats(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = f64>,
    ) -> Self {
        let values = values.into_iter().map(ParamValue::Float).collect();
        self.add_values(name, values)
    }

    pub fn add_bools(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = bool>,
    ) -> Self {
        let values = values.into_iter().map(ParamValue::Bool).collect();
        self.add_values(name, values)
    }

    pub fn add_strs<S: Into<String>>(
        self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        let values = values
            .into_iter()
            .map(|s| ParamValue::Str(s.into()))
            .collect();
        self.add_values(name, values)
    }

    /// Add a nested sub-space under `name`.
    pub fn add_nested(mut self, name: impl Into<String>, space: SweepSpace) -> Self {
        self.params.insert(name.into(), ParamDomain::Nested(space));
        self
    }

    /// Build a validated space from a JSON value: objects become nested
    /// spaces, arrays become candidate leaves, anything else is rejected
    /// with the offending key path.
    ///
    /// `serde_json` objects iterate in sorted key order, so a space built
    /// this way enumerates in that (deterministic) order rather than
    /// document order.
    pub fn from_json(value: &serde_json::Value) -> SweepResult<Self> {
        Self::from_json_at(value, "")
    }

    fn from_json_at(value: &serde_json::Value, path: &str) -> SweepResult<Self> {
        let object = match value {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(space_error!(
                    "expected an object at '{}', found {}",
                    if path.is_empty() { "<root>" } else { path },
                    json_kind(other)
                ))
            }
        };

        let mut space = SweepSpace::new();
        for (name, node) in object {
            let child_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{path}.{name}")
            };
            let domain = match node {
                serde_json::Value::Array(items) => ParamDomain::Values(
                    items.iter().cloned().map(ParamValue::from).collect(),
                ),
                serde_json::Value::Object(_) => {
                    ParamDomain::Nested(Self::from_json_at(node, &child_path)?)
                }
                other => {
                    return Err(space_error!(
                        "parameter '{}' must be a candidate array or a nested object, found {}",
                        child_path,
                        json_kind(other)
                    ))
                }
            };
            space.params.insert(name.clone(), domain);
        }
        Ok(space)
    }

    /// Wrap every value of a concrete configuration into a
    /// single-candidate leaf, producing a space that enumerates to exactly
    /// that configuration.
    pub fn pinned(config: &ConcreteConfig) -> Self {
        let mut space = SweepSpace::new();
        for (name, node) in config.entries() {
            let domain = match node {
                ConfigValue::Value(v) => ParamDomain::Values(vec![v.clone()]),
                ConfigValue::Nested(sub) => ParamDomain::Nested(Self::pinned(sub)),
            };
            space.params.insert(name.to_string(), domain);
        }
        space
    }

    /// Total number of concrete configurations (product of all leaf
    /// lengths at all depths). `None` on overflow. The empty space has
    /// cardinality 1: the empty product is the unit element.
    pub fn cardinality(&self) -> Option<usize> {
        let mut total: usize = 1;
        for domain in self.params.values() {
            let dim = match domain {
                ParamDomain::Values(values) => values.len(),
                ParamDomain::Nested(sub) => sub.cardinality()?,
            };
            total = total.checked_mul(dim)?;
        }
        Some(total)
    }

    /// Candidate-sequence lengths of every leaf, in fixed traversal order
    /// (depth-first, insertion order at every level).
    pub fn leaf_lengths(&self) -> Vec<usize> {
        let mut lens = Vec::new();
        self.collect_leaf_lengths(&mut lens);
        lens
    }

    fn collect_leaf_lengths(&self, out: &mut Vec<usize>) {
        for domain in self.params.values() {
            match domain {
                ParamDomain::Values(values) => out.push(values.len()),
                ParamDomain::Nested(sub) => sub.collect_leaf_lengths(out),
            }
        }
    }

    /// Number of leaves at all depths.
    pub fn leaf_count(&self) -> usize {
        self.leaf_lengths().len()
    }

    /// Number of top-level parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ParamDomain> {
        self.params.get(name)
    }

    /// Entries in fixed traversal order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ParamDomain)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
