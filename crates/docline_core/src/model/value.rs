use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::mode::ModeConfig;

/// A concrete parameter value as it travels in the payload.
///
/// Serialized untagged so the wire form is a bare JSON primitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Boolean(bool),
    Integer(i64),
    Choice(String),
}

impl ParamValue {
    /// Name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParamValue::Boolean(_) => "boolean",
            ParamValue::Integer(_) => "integer",
            ParamValue::Choice(_) => "string",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match self {
            ParamValue::Choice(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Boolean(v) => write!(f, "{v}"),
            ParamValue::Integer(v) => write!(f, "{v}"),
            ParamValue::Choice(v) => f.write_str(v),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Integer(v)
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        ParamValue::Integer(i64::from(v))
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Boolean(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Choice(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Choice(v)
    }
}

/// Runtime parameter state for the active mode, keyed by parameter id.
///
/// Owned by the caller between edits. Missing entries are filled with the
/// declared default when a request is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterValues {
    values: FxHashMap<String, ParamValue>,
}

impl ParameterValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every parameter of `mode` set to its declared default
    pub fn defaults_for(mode: &ModeConfig) -> Self {
        mode.parameters()
            .iter()
            .map(|spec| (spec.id().to_string(), spec.default_value()))
            .collect()
    }

    pub fn set(&mut self, id: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(id.into(), value.into());
    }

    /// Chainable form of [`ParameterValues::set`]
    pub fn with(mut self, id: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(id, value);
        self
    }

    pub fn get(&self, id: &str) -> Option<&ParamValue> {
        self.values.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<ParamValue> {
        self.values.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ParamValue)> for ParameterValues {
    fn from_iter<I: IntoIterator<Item = (K, ParamValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
