//! Property schemas: typed descriptors embedded in other schemas.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::types::{simple_ref, Extensions, RefFormat, Xml};

/// A typed value descriptor (an object field or an array element type).
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Ref(RefProperty),
    Array(ArrayProperty),
    Object(ObjectProperty),
    Map(MapProperty),
    Primitive(PrimitiveProperty),
}

/// Reference to a named schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefProperty {
    /// Simple reference name (`Pet`, never `#/definitions/Pet`).
    pub reference: String,
    pub ref_format: RefFormat,
    pub name: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub example: Option<Value>,
    pub vendor_extensions: Extensions,
}

impl RefProperty {
    /// Create a reference property, normalising `#/definitions/X` to `X`.
    pub fn new(reference: impl AsRef<str>) -> Self {
        let reference = reference.as_ref();
        Self {
            reference: simple_ref(reference).to_string(),
            ref_format: RefFormat::of(reference),
            ..Self::default()
        }
    }

    /// Set the property name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayProperty {
    pub items: Option<Box<Property>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub example: Option<Value>,
    pub xml: Option<Xml>,
    pub unique_items: Option<bool>,
    pub allow_empty_value: Option<bool>,
    pub vendor_extensions: Extensions,
}

impl ArrayProperty {
    pub fn new(items: Property) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectProperty {
    pub properties: Option<BTreeMap<String, Property>>,
    /// `None` means "no constraint"; never `Some` of an empty set.
    pub required_properties: Option<BTreeSet<String>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub example: Option<Value>,
    pub xml: Option<Xml>,
    pub allow_empty_value: Option<bool>,
    pub vendor_extensions: Extensions,
}

impl ObjectProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a named child property.
    pub fn property(mut self, key: impl Into<String>, property: Property) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), property);
        self
    }

    /// Mark a child property as required.
    pub fn required(mut self, key: impl Into<String>) -> Self {
        self.required_properties
            .get_or_insert_with(BTreeSet::new)
            .insert(key.into());
        self
    }
}

/// Object with arbitrary keys whose values share one schema.
#[derive(Debug, Clone, PartialEq)]
pub struct MapProperty {
    pub additional_properties: Box<Property>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub example: Option<Value>,
    pub xml: Option<Xml>,
    pub allow_empty_value: Option<bool>,
    pub vendor_extensions: Extensions,
}

impl MapProperty {
    pub fn new(additional_properties: Property) -> Self {
        Self {
            additional_properties: Box::new(additional_properties),
            name: None,
            description: None,
            title: None,
            example: None,
            xml: None,
            allow_empty_value: None,
            vendor_extensions: Extensions::new(),
        }
    }
}

/// Scalar property (string, integer, number, boolean, file, ...).
///
/// The constraint slots below `vendor_extensions` exist on the property side
/// but are never filled by model conversion.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrimitiveProperty {
    pub type_name: String,
    pub format: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub example: Option<Value>,
    pub xml: Option<Xml>,
    pub allow_empty_value: Option<bool>,
    pub default: Option<Value>,
    pub enum_values: Option<Vec<String>>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub vendor_extensions: Extensions,
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub exclusive_minimum: Option<bool>,
    pub exclusive_maximum: Option<bool>,
    pub multiple_of: Option<f64>,
    pub read_only: Option<bool>,
}

impl PrimitiveProperty {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

impl Property {
    /// The schema type keyword for this property.
    pub fn type_name(&self) -> &str {
        match self {
            Property::Ref(_) => "ref",
            Property::Array(_) => "array",
            Property::Object(_) | Property::Map(_) => "object",
            Property::Primitive(p) => &p.type_name,
        }
    }

    pub fn format(&self) -> Option<&str> {
        match self {
            Property::Primitive(p) => p.format.as_deref(),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Property::Ref(p) => p.name.as_deref(),
            Property::Array(p) => p.name.as_deref(),
            Property::Object(p) => p.name.as_deref(),
            Property::Map(p) => p.name.as_deref(),
            Property::Primitive(p) => p.name.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Property::Ref(p) => p.description.as_deref(),
            Property::Array(p) => p.description.as_deref(),
            Property::Object(p) => p.description.as_deref(),
            Property::Map(p) => p.description.as_deref(),
            Property::Primitive(p) => p.description.as_deref(),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Property::Ref(p) => p.title.as_deref(),
            Property::Array(p) => p.title.as_deref(),
            Property::Object(p) => p.title.as_deref(),
            Property::Map(p) => p.title.as_deref(),
            Property::Primitive(p) => p.title.as_deref(),
        }
    }

    pub fn example(&self) -> Option<&Value> {
        match self {
            Property::Ref(p) => p.example.as_ref(),
            Property::Array(p) => p.example.as_ref(),
            Property::Object(p) => p.example.as_ref(),
            Property::Map(p) => p.example.as_ref(),
            Property::Primitive(p) => p.example.as_ref(),
        }
    }

    pub fn xml(&self) -> Option<&Xml> {
        match self {
            Property::Ref(_) => None,
            Property::Array(p) => p.xml.as_ref(),
            Property::Object(p) => p.xml.as_ref(),
            Property::Map(p) => p.xml.as_ref(),
            Property::Primitive(p) => p.xml.as_ref(),
        }
    }

    pub fn allow_empty_value(&self) -> Option<bool> {
        match self {
            Property::Ref(_) => None,
            Property::Array(p) => p.allow_empty_value,
            Property::Object(p) => p.allow_empty_value,
            Property::Map(p) => p.allow_empty_value,
            Property::Primitive(p) => p.allow_empty_value,
        }
    }

    pub fn vendor_extensions(&self) -> &Extensions {
        match self {
            Property::Ref(p) => &p.vendor_extensions,
            Property::Array(p) => &p.vendor_extensions,
            Property::Object(p) => &p.vendor_extensions,
            Property::Map(p) => &p.vendor_extensions,
            Property::Primitive(p) => &p.vendor_extensions,
        }
    }
}

impl From<RefProperty> for Property {
    fn from(p: RefProperty) -> Self {
        Property::Ref(p)
    }
}

impl From<ArrayProperty> for Property {
    fn from(p: ArrayProperty) -> Self {
        Property::Array(p)
    }
}

impl From<ObjectProperty> for Property {
    fn from(p: ObjectProperty) -> Self {
        Property::Object(p)
    }
}

impl From<MapProperty> for Property {
    fn from(p: MapProperty) -> Self {
        Property::Map(p)
    }
}

impl From<PrimitiveProperty> for Property {
    fn from(p: PrimitiveProperty) -> Self {
        Property::Primitive(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ref_property_normalises_reference() {
        let p = RefProperty::new("#/definitions/Pet");
        assert_eq!(p.reference, "Pet");
        assert!(p.name.is_none());
    }

    #[test]
    fn type_names() {
        assert_eq!(Property::from(RefProperty::new("Pet")).type_name(), "ref");
        assert_eq!(
            Property::from(ArrayProperty::new(PrimitiveProperty::new("string").into())).type_name(),
            "array"
        );
        assert_eq!(Property::from(ObjectProperty::new()).type_name(), "object");
        assert_eq!(
            Property::from(MapProperty::new(PrimitiveProperty::new("integer").into())).type_name(),
            "object"
        );
        assert_eq!(
            Property::from(PrimitiveProperty::new("boolean")).type_name(),
            "boolean"
        );
    }

    #[test]
    fn object_builder_collects_properties_and_required() {
        let obj = ObjectProperty::new()
            .property("id", PrimitiveProperty::new("integer").into())
            .property("name", PrimitiveProperty::new("string").into())
            .required("id");

        let props = obj.properties.unwrap();
        assert_eq!(props.len(), 2);
        assert!(props.contains_key("name"));
        assert_eq!(
            obj.required_properties.unwrap().into_iter().collect::<Vec<_>>(),
            vec!["id"]
        );
    }

    #[test]
    fn shared_accessors() {
        let mut prim = PrimitiveProperty::new("string").format("email");
        prim.description = Some("contact".into());
        prim.example = Some(json!("a@b.c"));
        prim.allow_empty_value = Some(true);
        let prop = Property::from(prim);

        assert_eq!(prop.format(), Some("email"));
        assert_eq!(prop.description(), Some("contact"));
        assert_eq!(prop.example(), Some(&json!("a@b.c")));
        assert_eq!(prop.allow_empty_value(), Some(true));
        assert!(prop.vendor_extensions().is_empty());
    }
}
