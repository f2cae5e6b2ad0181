//! Building typed properties from a type keyword and an attribute bag.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::property::{ArrayProperty, MapProperty, ObjectProperty, PrimitiveProperty, Property};
use crate::types::Extensions;

/// Keys accepted in an attribute bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeKey {
    Description,
    Example,
    Enum,
    Title,
    Default,
    Discriminator,
    Minimum,
    Maximum,
    UniqueItems,
    VendorExtensions,
    Properties,
    RequiredProperties,
    AdditionalProperties,
}

/// Value stored under an [`AttributeKey`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Json(Value),
    Strings(Vec<String>),
    Number(f64),
    Flag(bool),
    Extensions(Extensions),
    Properties(BTreeMap<String, Property>),
    Names(BTreeSet<String>),
    Schema(Box<Property>),
}

/// Attribute bag handed to a [`PropertyFactory`].
///
/// Absent keys mean "use the default"; a key is never stored with a null value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    entries: BTreeMap<AttributeKey, AttributeValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key` if present; `None` leaves the key absent.
    pub fn set(&mut self, key: AttributeKey, value: Option<AttributeValue>) {
        if let Some(value) = value {
            self.entries.insert(key, value);
        }
    }

    pub fn contains(&self, key: AttributeKey) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = AttributeKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn take(&mut self, key: AttributeKey) -> Option<AttributeValue> {
        self.entries.remove(&key)
    }

    pub fn take_text(&mut self, key: AttributeKey) -> Option<String> {
        match self.take(key)? {
            AttributeValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn take_json(&mut self, key: AttributeKey) -> Option<Value> {
        match self.take(key)? {
            AttributeValue::Json(v) => Some(v),
            AttributeValue::Text(s) => Some(Value::String(s)),
            _ => None,
        }
    }

    pub fn take_strings(&mut self, key: AttributeKey) -> Option<Vec<String>> {
        match self.take(key)? {
            AttributeValue::Strings(v) => Some(v),
            _ => None,
        }
    }

    pub fn take_number(&mut self, key: AttributeKey) -> Option<f64> {
        match self.take(key)? {
            AttributeValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn take_flag(&mut self, key: AttributeKey) -> Option<bool> {
        match self.take(key)? {
            AttributeValue::Flag(b) => Some(b),
            _ => None,
        }
    }

    pub fn take_extensions(&mut self) -> Extensions {
        match self.take(AttributeKey::VendorExtensions) {
            Some(AttributeValue::Extensions(ext)) => ext,
            _ => Extensions::new(),
        }
    }

    pub fn take_properties(&mut self) -> Option<BTreeMap<String, Property>> {
        match self.take(AttributeKey::Properties)? {
            AttributeValue::Properties(p) => Some(p),
            _ => None,
        }
    }

    pub fn take_names(&mut self, key: AttributeKey) -> Option<BTreeSet<String>> {
        match self.take(key)? {
            AttributeValue::Names(n) => Some(n),
            _ => None,
        }
    }

    pub fn take_schema(&mut self, key: AttributeKey) -> Option<Property> {
        match self.take(key)? {
            AttributeValue::Schema(p) => Some(*p),
            _ => None,
        }
    }
}

/// Builds a concrete property from a type keyword, optional format and attributes.
///
/// Implementations must be safe to call concurrently if the converter using
/// them is shared across threads.
pub trait PropertyFactory {
    fn build(&self, type_name: &str, format: Option<&str>, attrs: Attributes) -> Property;
}

impl<F: PropertyFactory + ?Sized> PropertyFactory for &F {
    fn build(&self, type_name: &str, format: Option<&str>, attrs: Attributes) -> Property {
        (**self).build(type_name, format, attrs)
    }
}

/// Factory covering object, map, array and scalar properties.
///
/// The discriminator attribute is accepted but not stored: no property
/// variant carries one.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPropertyFactory;

impl PropertyFactory for DefaultPropertyFactory {
    fn build(&self, type_name: &str, format: Option<&str>, mut attrs: Attributes) -> Property {
        let description = attrs.take_text(AttributeKey::Description);
        let title = attrs.take_text(AttributeKey::Title);
        let example = attrs.take_json(AttributeKey::Example);
        let vendor_extensions = attrs.take_extensions();

        match type_name {
            "object" => {
                if let Some(values) = attrs.take_schema(AttributeKey::AdditionalProperties) {
                    let mut map = MapProperty::new(values);
                    map.description = description;
                    map.title = title;
                    map.example = example;
                    map.vendor_extensions = vendor_extensions;
                    return Property::Map(map);
                }

                Property::Object(ObjectProperty {
                    properties: attrs.take_properties(),
                    required_properties: attrs
                        .take_names(AttributeKey::RequiredProperties)
                        .filter(|names| !names.is_empty()),
                    description,
                    title,
                    example,
                    vendor_extensions,
                    ..ObjectProperty::default()
                })
            }
            "array" => Property::Array(ArrayProperty {
                items: None,
                description,
                title,
                example,
                unique_items: attrs.take_flag(AttributeKey::UniqueItems),
                vendor_extensions,
                ..ArrayProperty::default()
            }),
            scalar => Property::Primitive(PrimitiveProperty {
                type_name: scalar.to_string(),
                format: format.map(String::from),
                description,
                title,
                example,
                default: attrs.take_json(AttributeKey::Default),
                enum_values: attrs.take_strings(AttributeKey::Enum),
                minimum: attrs.take_number(AttributeKey::Minimum),
                maximum: attrs.take_number(AttributeKey::Maximum),
                vendor_extensions,
                ..PrimitiveProperty::default()
            }),
        }
    }
}
