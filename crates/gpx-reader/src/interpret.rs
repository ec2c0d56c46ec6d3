//! Schema-driven type interpreter.
//!
//! Turns an [`Element`] into a [`Record`] by walking a [`Schema`]: attributes
//! first, in table order, then the classified children in scan order. Scalar
//! fields go through the [`CoercionRegistry`]; structural and repeated fields
//! recurse with the schema named in the table. The first failure anywhere in
//! the subtree aborts the whole parse.

use gpx_model::{Element, Field, Record};

use crate::classify::classify;
use crate::coerce::{CoercionRegistry, RawInput};
use crate::error::{GpxError, Result};
use crate::schema::{self, FieldType, GPX_NAMESPACE, Schema};

/// Parses elements against schemas using one coercion registry.
#[derive(Clone, Copy)]
pub struct Interpreter<'r> {
    registry: &'r CoercionRegistry,
    namespace: &'r str,
}

impl<'r> Interpreter<'r> {
    /// Interpreter matching children in the GPX 1.1 namespace.
    pub fn new(registry: &'r CoercionRegistry) -> Self {
        Self {
            registry,
            namespace: GPX_NAMESPACE,
        }
    }

    /// Match children in `namespace` instead.
    #[must_use]
    pub fn with_namespace(mut self, namespace: &'r str) -> Self {
        self.namespace = namespace;
        self
    }

    /// Registry scalar fields are coerced with.
    pub fn registry(&self) -> &'r CoercionRegistry {
        self.registry
    }

    /// Namespace child elements must be in to match a schema tag.
    pub fn namespace(&self) -> &'r str {
        self.namespace
    }

    /// Parse `element` against the structural type named `type_name`.
    ///
    /// # Errors
    ///
    /// [`GpxError::UnknownType`] when the name is not in the schema table,
    /// otherwise anything [`parse`](Self::parse) returns.
    pub fn parse_type(&self, element: &Element, type_name: &str) -> Result<Record> {
        let schema = schema::lookup(type_name).ok_or_else(|| GpxError::UnknownType {
            type_name: type_name.to_string(),
            expected: "structural",
        })?;
        self.parse(element, schema)
    }

    /// Parse `element` against `schema`.
    ///
    /// Repeated fields with no matching child are left out of the record.
    ///
    /// # Errors
    ///
    /// The first coercion failure met in the subtree, unchanged.
    pub fn parse(&self, element: &Element, schema: &Schema) -> Result<Record> {
        let mut record = Record::new();

        for (attribute, type_name) in schema.attributes {
            let input = RawInput::Text(element.attribute(attribute));
            let value = self.registry.coerce(type_name, input)?;
            record.insert(*attribute, Field::Scalar(value));
        }

        let single_tags = schema.single_tags();
        let multi_tags = schema.multi_tags();
        let classification = classify(element, self.namespace, &single_tags, &multi_tags);

        for matched in classification.matches() {
            let Some(field_type) = schema.child(matched.tag) else {
                continue;
            };
            match field_type {
                FieldType::Scalar(type_name) => {
                    let value = self
                        .registry
                        .coerce(type_name, RawInput::Node(matched.element))?;
                    record.insert(matched.tag, Field::Scalar(value));
                }
                FieldType::Structural(type_name) => {
                    let nested = self.parse_type(matched.element, type_name)?;
                    record.insert(matched.tag, Field::Record(nested));
                }
                FieldType::Repeated(type_name) => {
                    let nested = self.parse_type(matched.element, type_name)?;
                    record.push(matched.tag, nested);
                }
            }
        }

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::default_registry;
    use crate::schema::{LINK, PERSON, ROUTE, WAYPOINT};
    use gpx_model::Value;

    fn gpx(local: &str) -> Element {
        Element::namespaced(GPX_NAMESPACE, local)
    }

    fn leaf(local: &str, text: &str) -> Element {
        gpx(local).with_text(text)
    }

    #[test]
    fn parses_attributes_and_scalars() {
        let element = gpx("wpt")
            .with_attribute("lat", "48.2")
            .with_attribute("lon", "16.37")
            .with_child(leaf("ele", "12.5"))
            .with_child(leaf("fix", "3d"))
            .with_child(leaf("name", "Vienna"));
        let registry = default_registry();
        let record = Interpreter::new(&registry).parse(&element, &WAYPOINT).unwrap();

        assert_eq!(record.decimal("lat"), Some(48.2));
        assert_eq!(record.decimal("lon"), Some(16.37));
        assert_eq!(record.decimal("ele"), Some(12.5));
        assert_eq!(record.text("name"), Some("Vienna"));
        assert!(!record.contains("link"));
    }

    #[test]
    fn nested_and_repeated_fields() {
        let element = gpx("rte")
            .with_child(leaf("name", "loop"))
            .with_child(gpx("rtept").with_attribute("lat", "1").with_attribute("lon", "2"))
            .with_child(gpx("link").with_attribute("href", "http://a"))
            .with_child(gpx("rtept").with_attribute("lat", "3").with_attribute("lon", "4"));
        let registry = default_registry();
        let record = Interpreter::new(&registry).parse(&element, &ROUTE).unwrap();

        let points: Vec<_> = record
            .records("rtept")
            .iter()
            .filter_map(|point| point.decimal("lat"))
            .collect();
        assert_eq!(points, [1.0, 3.0]);
        assert_eq!(record.records("link")[0].text("href"), Some("http://a"));
    }

    #[test]
    fn structural_child_recurses() {
        let element = gpx("author")
            .with_child(leaf("name", "Jane"))
            .with_child(
                gpx("email")
                    .with_attribute("id", "jane")
                    .with_attribute("domain", "example.com"),
            )
            .with_child(gpx("link").with_attribute("href", "http://jane.example.com"));
        let registry = default_registry();
        let record = Interpreter::new(&registry).parse(&element, &PERSON).unwrap();

        assert_eq!(record.text("email"), Some("jane@example.com"));
        let link = record.record("link").unwrap();
        assert_eq!(link.text("href"), Some("http://jane.example.com"));
        assert_eq!(link.value("text"), None);
    }

    #[test]
    fn missing_identity_attribute_is_null() {
        let registry = default_registry();
        let record = Interpreter::new(&registry).parse(&gpx("link"), &LINK).unwrap();
        assert_eq!(record.value("href"), Some(&Value::Null));
    }

    #[test]
    fn first_failure_aborts() {
        let element = gpx("rte")
            .with_child(gpx("rtept").with_attribute("lat", "1").with_attribute("lon", "2"))
            .with_child(
                gpx("rtept")
                    .with_attribute("lat", "1")
                    .with_attribute("lon", "2")
                    .with_child(leaf("magvar", "400")),
            );
        let registry = default_registry();
        let error = Interpreter::new(&registry).parse(&element, &ROUTE).unwrap_err();
        assert!(matches!(error, GpxError::OutOfRange { type_name: "degrees", .. }));
    }

    #[test]
    fn missing_validated_attribute_fails() {
        let registry = default_registry();
        let error = Interpreter::new(&registry)
            .parse(&gpx("wpt").with_attribute("lat", "1"), &WAYPOINT)
            .unwrap_err();
        assert!(matches!(error, GpxError::MissingValue { type_name: "longitude" }));
    }

    #[test]
    fn unknown_structural_type() {
        let registry = default_registry();
        let error = Interpreter::new(&registry)
            .parse_type(&gpx("wpt"), "decimal")
            .unwrap_err();
        assert!(matches!(error, GpxError::UnknownType { expected: "structural", .. }));
    }

    #[test]
    fn other_namespace() {
        let element = Element::namespaced("urn:gpx10", "wpt")
            .with_attribute("lat", "1")
            .with_attribute("lon", "2")
            .with_child(Element::namespaced("urn:gpx10", "name").with_text("old"));
        let registry = default_registry();
        let record = Interpreter::new(&registry)
            .with_namespace("urn:gpx10")
            .parse(&element, &WAYPOINT)
            .unwrap();
        assert_eq!(record.text("name"), Some("old"));
    }
}
