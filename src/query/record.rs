//! One queried feature's attributes.

use serde::Deserialize;
use serde_json::{Map, Value};

/// Field name to attribute value, exactly as the feature service returned it.
///
/// Numeric reads are total: an absent field, a `null`, or a value that is not
/// a number all read as `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct AttributeRecord {
    attributes: Map<String, Value>,
}

impl AttributeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used by fixtures and in-memory sources.
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.to_string(), value.into());
        self
    }

    pub fn number(&self, field: &str) -> f64 {
        self.attributes
            .get(field)
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.attributes.get(field).and_then(Value::as_str)
    }
}
