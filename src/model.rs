// Core structs: PropertyRecord, FeatureVector, error taxonomy
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// One incoming property description, keyed by canonical (hyphenated) field
/// names. Built per request by the payload parser and discarded after scoring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyRecord {
    fields: BTreeMap<String, Value>,
}

impl PropertyRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.fields.remove(key)
    }

    /// Returns the value for `key`, treating an explicit `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for PropertyRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Fixed-order numeric row handed to the predictor. Column names are shared
/// with the schema that produced the vector.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    columns: Arc<[String]>,
    values: Vec<f64>,
}

impl FeatureVector {
    /// Pairs `values` with `columns`. Callers must supply one value per column.
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<f64>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Coarse JSON type a field is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoarseType {
    Integer,
    Number,
    String,
    Boolean,
}

impl fmt::Display for CoarseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CoarseType::Integer => "integer",
            CoarseType::Number => "number",
            CoarseType::String => "string",
            CoarseType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizeError {
    #[error("missing required field: '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' must be of type {expected}")]
    InvalidType {
        field: &'static str,
        expected: CoarseType,
    },
    #[error("invalid {field} '{value}', must be one of {}", .accepted.join(", "))]
    InvalidEnum {
        field: &'static str,
        value: String,
        accepted: &'static [&'static str],
    },
}

impl NormalizeError {
    pub fn kind(&self) -> &'static str {
        match self {
            NormalizeError::MissingField(_) => "MissingFieldError",
            NormalizeError::InvalidType { .. } => "InvalidTypeError",
            NormalizeError::InvalidEnum { .. } => "InvalidEnumError",
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            NormalizeError::MissingField(field)
            | NormalizeError::InvalidType { field, .. }
            | NormalizeError::InvalidEnum { field, .. } => *field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParserError {
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
    #[error("fields '{first}' and '{second}' both map to '{canonical}'")]
    DuplicateField {
        canonical: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("feature schema mismatch: model expects {expected:?}, got {actual:?}")]
    SchemaMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("http error: {0}")]
    Http(String),
    #[error("predictor timed out")]
    Timeout,
    #[error("invalid predictor response: {0}")]
    InvalidResponse(String),
}

/// Serializable error value surfaced to whoever called the service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub status: u16,
    pub message: String,
}
