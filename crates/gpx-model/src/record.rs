//! Generic parse results.
//!
//! A [`Record`] is what the reader produces for one element: a map from field
//! name (attribute or child tag) to a [`Field`]. Records are plain values with
//! no link back to the tree they came from.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::element::Element;
use crate::value::{FixType, Timestamp, Value};

/// One entry of a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    Scalar(Value),
    Record(Record),
    /// Repeated child records, in document order.
    Records(Vec<Record>),
}

/// The parse result for one element.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Field>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any previous value under `name`.
    pub fn insert(&mut self, name: impl Into<String>, field: Field) {
        self.fields.insert(name.into(), field);
    }

    /// Append a record to the repeated field `name`, creating it if needed.
    ///
    /// A non-repeated field already stored under `name` is replaced.
    pub fn push(&mut self, name: &str, record: Record) {
        match self.fields.get_mut(name) {
            Some(Field::Records(records)) => records.push(record),
            _ => {
                self.fields
                    .insert(name.to_string(), Field::Records(vec![record]));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Field)> + '_ {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// Scalar stored under `name`, or `None` for absent and non-scalar fields.
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.fields.get(name) {
            Some(Field::Scalar(value)) => Some(value),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_text)
    }

    pub fn decimal(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(Value::as_decimal)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(Value::as_integer)
    }

    pub fn fix(&self, name: &str) -> Option<FixType> {
        self.value(name).and_then(Value::as_fix)
    }

    pub fn timestamp(&self, name: &str) -> Option<&Timestamp> {
        self.value(name).and_then(Value::as_timestamp)
    }

    pub fn extensions(&self, name: &str) -> &[Element] {
        self.value(name)
            .and_then(Value::as_extensions)
            .unwrap_or_default()
    }

    pub fn record(&self, name: &str) -> Option<&Record> {
        match self.fields.get(name) {
            Some(Field::Record(record)) => Some(record),
            _ => None,
        }
    }

    /// Repeated records under `name`; empty when the field is absent.
    pub fn records(&self, name: &str) -> &[Record] {
        match self.fields.get(name) {
            Some(Field::Records(records)) => records,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_order() {
        let mut record = Record::new();
        for name in ["a", "b", "c"] {
            let mut link = Record::new();
            link.insert("text", Field::Scalar(Value::Text(name.to_string())));
            record.push("link", link);
        }
        let texts: Vec<_> = record
            .records("link")
            .iter()
            .filter_map(|link| link.text("text"))
            .collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn absent_repeated_field_is_empty() {
        let record = Record::new();
        assert!(record.records("rtept").is_empty());
        assert!(record.extensions("extensions").is_empty());
    }

    #[test]
    fn null_is_not_text() {
        let mut record = Record::new();
        record.insert("name", Field::Scalar(Value::Null));
        assert!(record.contains("name"));
        assert_eq!(record.text("name"), None);
    }
}
