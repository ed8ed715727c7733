//! Loosely typed parameter maps
//!
//! The UI side of the pedalboard describes each stage as a name plus a map of
//! knob name to value. [`ParamReader`] turns such a map into a typed pedal,
//! filling in defaults for absent knobs and rejecting names the pedal does not
//! declare.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ParamError;

/// A single knob value: numeric for every knob except file paths
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            ParamValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            ParamValue::Number(_) => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<f32> for ParamValue {
    fn from(v: f32) -> Self {
        ParamValue::Number(v as f64)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Knob name to value, ordered for stable display and serialization
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Build a [`ParamMap`] from `(name, value)` pairs
pub fn param_map<I, K, V>(pairs: I) -> ParamMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ParamValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Typed access to a [`ParamMap`] checked against a pedal's knob list
pub struct ParamReader<'a> {
    params: &'a ParamMap,
}

impl<'a> ParamReader<'a> {
    /// Fails if `params` names a knob outside `accepted`
    pub fn new(params: &'a ParamMap, accepted: &[&str]) -> Result<Self, ParamError> {
        if let Some(name) = params.keys().find(|k| !accepted.contains(&k.as_str())) {
            return Err(ParamError::UnexpectedParameter {
                name: name.clone(),
                accepted: accepted.join(", "),
            });
        }
        Ok(Self { params })
    }

    /// Numeric knob, or `default` when absent
    pub fn number(&self, name: &str, default: f32) -> Result<f32, ParamError> {
        match self.params.get(name) {
            None => Ok(default),
            Some(value) => value
                .as_number()
                .map(|n| n as f32)
                .ok_or_else(|| ParamError::WrongType {
                    name: name.to_string(),
                    expected: "a number",
                }),
        }
    }

    /// Text knob, or `default` when absent
    pub fn text(&self, name: &str, default: &str) -> Result<String, ParamError> {
        match self.params.get(name) {
            None => Ok(default.to_string()),
            Some(value) => value
                .as_text()
                .map(str::to_string)
                .ok_or_else(|| ParamError::WrongType {
                    name: name.to_string(),
                    expected: "a string",
                }),
        }
    }
}
