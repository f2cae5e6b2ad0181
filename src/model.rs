//! Model schemas: top-level, nameable schema definitions.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::property::Property;
use crate::types::{simple_ref, Extensions, RefFormat, Xml};

/// A top-level schema definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Model {
    Plain(PlainModel),
    Array(ArrayModel),
    Ref(RefModel),
    Composed(ComposedModel),
}

/// Schema described by a type keyword and inline attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlainModel {
    pub type_name: String,
    pub format: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub example: Option<Value>,
    pub default: Option<Value>,
    pub enum_values: Option<Vec<String>>,
    pub discriminator: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub unique_items: Option<bool>,
    pub xml: Option<Xml>,
    pub allow_empty_value: Option<bool>,
    pub properties: Option<BTreeMap<String, Property>>,
    pub required: Option<BTreeSet<String>>,
    pub additional_properties: Option<Box<Property>>,
    pub vendor_extensions: Extensions,
    // Constraints with no mapping onto properties.
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub exclusive_minimum: Option<bool>,
    pub exclusive_maximum: Option<bool>,
    pub multiple_of: Option<f64>,
    pub read_only: Option<bool>,
}

impl PlainModel {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            format: None,
            name: None,
            description: None,
            title: None,
            example: None,
            default: None,
            enum_values: None,
            discriminator: None,
            minimum: None,
            maximum: None,
            unique_items: None,
            xml: None,
            allow_empty_value: None,
            properties: None,
            required: None,
            additional_properties: None,
            vendor_extensions: Extensions::new(),
            pattern: None,
            min_length: None,
            max_length: None,
            exclusive_minimum: None,
            exclusive_maximum: None,
            multiple_of: None,
            read_only: None,
        }
    }

    /// Add (or replace) a named property.
    pub fn property(mut self, key: impl Into<String>, property: Property) -> Self {
        self.properties
            .get_or_insert_with(BTreeMap::new)
            .insert(key.into(), property);
        self
    }

    /// Mark a property as required.
    pub fn required(mut self, key: impl Into<String>) -> Self {
        self.required
            .get_or_insert_with(BTreeSet::new)
            .insert(key.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayModel {
    pub items: Option<Box<Property>>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub example: Option<Value>,
    pub properties: Option<BTreeMap<String, Property>>,
    pub vendor_extensions: Extensions,
}

impl ArrayModel {
    pub fn new(items: Property) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::default()
        }
    }
}

/// Named reference to another schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefModel {
    pub simple_ref: String,
    pub ref_format: RefFormat,
}

impl RefModel {
    /// Create a reference model, normalising `#/definitions/X` to `X`.
    pub fn new(reference: impl AsRef<str>) -> Self {
        let reference = reference.as_ref();
        Self {
            simple_ref: simple_ref(reference).to_string(),
            ref_format: RefFormat::of(reference),
        }
    }
}

/// Schema defined as the combination (`allOf`) of component schemas.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComposedModel {
    pub all_of: Vec<Model>,
    pub description: Option<String>,
    pub title: Option<String>,
    pub example: Option<Value>,
    pub vendor_extensions: Extensions,
}

impl ComposedModel {
    pub fn new(all_of: Vec<Model>) -> Self {
        Self {
            all_of,
            ..Self::default()
        }
    }
}

impl Model {
    pub fn description(&self) -> Option<&str> {
        match self {
            Model::Plain(m) => m.description.as_deref(),
            Model::Array(m) => m.description.as_deref(),
            Model::Ref(_) => None,
            Model::Composed(m) => m.description.as_deref(),
        }
    }

    pub fn example(&self) -> Option<&Value> {
        match self {
            Model::Plain(m) => m.example.as_ref(),
            Model::Array(m) => m.example.as_ref(),
            Model::Ref(_) => None,
            Model::Composed(m) => m.example.as_ref(),
        }
    }
}

impl From<PlainModel> for Model {
    fn from(m: PlainModel) -> Self {
        Model::Plain(m)
    }
}

impl From<ArrayModel> for Model {
    fn from(m: ArrayModel) -> Self {
        Model::Array(m)
    }
}

impl From<RefModel> for Model {
    fn from(m: RefModel) -> Self {
        Model::Ref(m)
    }
}

impl From<ComposedModel> for Model {
    fn from(m: ComposedModel) -> Self {
        Model::Composed(m)
    }
}
