//! Immutable data records

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

use super::NullConfig;

/// A single typed field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Null,
}

/// One row of the dataset.
///
/// `index` is assigned once at ingestion and never reused. Two records with
/// the same index are the same entity, so equality and hashing only look at
/// the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    index: usize,
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    /// Start building a record with the given stable index
    pub fn builder(index: usize) -> RecordBuilder {
        RecordBuilder::new(index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Numeric value of a field.
    ///
    /// Missing, null and non-numeric fields read as NaN and must be
    /// filtered by the caller.
    pub fn number(&self, field: &str) -> f64 {
        match self.fields.get(field) {
            Some(FieldValue::Number(value)) => *value,
            Some(FieldValue::Text(text)) => text.trim().parse().unwrap_or(f64::NAN),
            Some(FieldValue::Null) | None => f64::NAN,
        }
    }

    /// Text value of a categorical field
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.fields.get(field) {
            Some(FieldValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Whether the numeric field equals the integer bin `category`
    pub fn in_category(&self, field: &str, category: u8) -> bool {
        self.number(field) == f64::from(category)
    }

    pub fn field(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Record {}

impl Hash for Record {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

/// Builder used by ingestion code and tests
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    index: usize,
    fields: IndexMap<String, FieldValue>,
    null_config: NullConfig,
}

impl RecordBuilder {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            fields: IndexMap::new(),
            null_config: NullConfig::default(),
        }
    }

    /// Use a custom null pattern set for subsequent `raw` fields
    pub fn null_config(mut self, config: NullConfig) -> Self {
        self.null_config = config;
        self
    }

    pub fn number(mut self, field: impl Into<String>, value: f64) -> Self {
        self.fields.insert(field.into(), FieldValue::Number(value));
        self
    }

    pub fn text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(field.into(), FieldValue::Text(value.into()));
        self
    }

    /// Add an untyped field, inferring number / text / null from its content
    pub fn raw(mut self, field: impl Into<String>, raw: &str) -> Self {
        let value = if self.null_config.is_null(raw) {
            FieldValue::Null
        } else if let Ok(number) = raw.trim().parse::<f64>() {
            FieldValue::Number(number)
        } else {
            FieldValue::Text(raw.to_string())
        };
        self.fields.insert(field.into(), value);
        self
    }

    pub fn build(self) -> Record {
        Record {
            index: self.index,
            fields: self.fields,
        }
    }
}
