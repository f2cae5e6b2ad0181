//! Conversion between model and property schemas.
//!
//! The two directions are not inverses. Going from a model to a property
//! keeps only what the property side can express, and lifting a property
//! back keeps only what the target model variant carries.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::codec::{model_from_value, model_to_value, property_from_value, property_to_value};
use crate::error::ConvertError;
use crate::factory::{
    AttributeKey, AttributeValue, Attributes, DefaultPropertyFactory, PropertyFactory,
};
use crate::model::{ArrayModel, ComposedModel, Model, PlainModel, RefModel};
use crate::property::{ArrayProperty, ObjectProperty, Property, RefProperty};
use crate::types::{example_text, Direction};

/// Converts between [`Model`] and [`Property`] schemas.
///
/// Plain models are turned into properties through the factory `F`.
#[derive(Debug, Clone, Default)]
pub struct SchemaConverter<F = DefaultPropertyFactory> {
    factory: F,
}

impl SchemaConverter<DefaultPropertyFactory> {
    /// Create a converter backed by [`DefaultPropertyFactory`].
    pub fn new() -> Self {
        Self {
            factory: DefaultPropertyFactory,
        }
    }
}

impl<F: PropertyFactory> SchemaConverter<F> {
    /// Create a converter backed by a custom property factory.
    pub fn with_factory(factory: F) -> Self {
        Self { factory }
    }

    /// Project a top-level model into an embeddable property.
    pub fn model_to_property(&self, model: &Model) -> Property {
        match model {
            Model::Plain(m) => self.factory.build(
                &m.type_name,
                m.format.as_deref(),
                attributes_from_model(m),
            ),
            Model::Array(m) => Property::Array(ArrayProperty {
                items: m.items.clone(),
                description: m.description.clone(),
                title: m.title.clone(),
                ..ArrayProperty::default()
            }),
            Model::Ref(m) => Property::Ref(RefProperty {
                reference: m.simple_ref.clone(),
                ref_format: m.ref_format,
                name: Some(m.simple_ref.clone()),
                ..RefProperty::default()
            }),
            Model::Composed(m) => Property::Object(self.flatten_composed(m)),
        }
    }

    /// Lift an embeddable property into a top-level model.
    pub fn property_to_model(&self, property: &Property) -> Model {
        if let Property::Ref(p) = property {
            return Model::Ref(RefModel {
                simple_ref: p.reference.clone(),
                ref_format: p.ref_format,
            });
        }

        let description = property.description().map(String::from);
        let type_name = property.type_name().to_string();
        let format = property.format().map(String::from);
        let example = property.example().map(|e| Value::String(example_text(e)));
        let allow_empty_value = property.allow_empty_value();
        let vendor_extensions = property.vendor_extensions();
        let name = property.name().map(String::from);
        let xml = property.xml().cloned();

        let additional_properties = match property {
            Property::Map(p) => Some(p.additional_properties.clone()),
            _ => None,
        };
        let properties = match property {
            Property::Object(p) => p.properties.clone(),
            _ => None,
        };

        if let Property::Array(p) = property {
            return Model::Array(ArrayModel {
                items: p.items.clone(),
                description,
                example,
                properties,
                ..ArrayModel::default()
            });
        }

        let mut model = PlainModel::new(type_name);
        model.description = description;
        model.example = example;
        model.name = name;
        model.xml = xml;
        model.format = format;
        model.allow_empty_value = allow_empty_value;
        model.vendor_extensions = vendor_extensions.clone();
        model.additional_properties = additional_properties;
        model.properties = properties;
        Model::Plain(model)
    }

    /// Decode a JSON schema, convert it in `direction`, and encode the result.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError` if the input cannot be decoded as the source kind.
    pub fn convert(
        &self,
        value: &Value,
        direction: Direction,
    ) -> Result<Value, ConvertError> {
        match direction {
            Direction::ToProperty => {
                let model = model_from_value(value)?;
                Ok(property_to_value(&self.model_to_property(&model)))
            }
            Direction::ToModel => {
                let property = property_from_value(value)?;
                Ok(model_to_value(&self.property_to_model(&property)))
            }
        }
    }

    fn flatten_composed(&self, model: &ComposedModel) -> ObjectProperty {
        let mut properties: BTreeMap<String, Property> = BTreeMap::new();
        let mut required: BTreeSet<String> = BTreeSet::new();

        for item in &model.all_of {
            match self.model_to_property(item) {
                Property::Ref(r) => {
                    let key = r.name.clone().unwrap_or_else(|| r.reference.clone());
                    properties.insert(key, Property::Ref(r));
                }
                Property::Object(o) => {
                    // Later branches win on key collisions
                    properties.extend(o.properties.unwrap_or_default());
                    required.extend(o.required_properties.unwrap_or_default());
                }
                // Only ref- and object-shaped branches contribute
                _ => {}
            }
        }

        ObjectProperty {
            properties: (!properties.is_empty()).then_some(properties),
            required_properties: (!required.is_empty()).then_some(required),
            description: model.description.clone(),
            title: model.title.clone(),
            example: model.example.clone(),
            vendor_extensions: model.vendor_extensions.clone(),
            ..ObjectProperty::default()
        }
    }
}

/// Project a model into a property using the default factory.
pub fn model_to_property(model: &Model) -> Property {
    SchemaConverter::new().model_to_property(model)
}

/// Lift a property into a model.
pub fn property_to_model(property: &Property) -> Model {
    SchemaConverter::new().property_to_model(property)
}

fn attributes_from_model(model: &PlainModel) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.set(
        AttributeKey::Description,
        model.description.clone().map(AttributeValue::Text),
    );
    attrs.set(
        AttributeKey::Example,
        model.example.clone().map(AttributeValue::Json),
    );
    attrs.set(
        AttributeKey::Enum,
        model.enum_values.clone().map(AttributeValue::Strings),
    );
    attrs.set(
        AttributeKey::Title,
        model.title.clone().map(AttributeValue::Text),
    );
    attrs.set(
        AttributeKey::Default,
        model.default.clone().map(AttributeValue::Json),
    );
    attrs.set(
        AttributeKey::Discriminator,
        model.discriminator.clone().map(AttributeValue::Text),
    );
    attrs.set(AttributeKey::Minimum, model.minimum.map(AttributeValue::Number));
    attrs.set(AttributeKey::Maximum, model.maximum.map(AttributeValue::Number));
    attrs.set(
        AttributeKey::UniqueItems,
        model.unique_items.map(AttributeValue::Flag),
    );
    if !model.vendor_extensions.is_empty() {
        attrs.set(
            AttributeKey::VendorExtensions,
            Some(AttributeValue::Extensions(model.vendor_extensions.clone())),
        );
    }
    attrs.set(
        AttributeKey::Properties,
        model.properties.clone().map(AttributeValue::Properties),
    );
    attrs.set(
        AttributeKey::RequiredProperties,
        model.required.clone().map(AttributeValue::Names),
    );
    attrs.set(
        AttributeKey::AdditionalProperties,
        model.additional_properties.clone().map(AttributeValue::Schema),
    );
    attrs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{MapProperty, PrimitiveProperty};
    use crate::types::RefFormat;
    use serde_json::json;
    use std::cell::RefCell;

    /// Factory that records the attribute keys it was called with.
    #[derive(Default)]
    struct RecordingFactory {
        calls: RefCell<Vec<(String, Option<String>, Vec<AttributeKey>)>>,
    }

    impl PropertyFactory for RecordingFactory {
        fn build(&self, type_name: &str, format: Option<&str>, attrs: Attributes) -> Property {
            self.calls.borrow_mut().push((
                type_name.to_string(),
                format.map(String::from),
                attrs.keys().collect(),
            ));
            DefaultPropertyFactory.build(type_name, format, attrs)
        }
    }

    #[test]
    fn plain_model_passes_only_present_attributes() {
        let factory = RecordingFactory::default();
        let converter = SchemaConverter::with_factory(&factory);

        let mut model = PlainModel::new("string");
        model.format = Some("uuid".into());
        model.description = Some("identifier".into());
        converter.model_to_property(&Model::Plain(model));

        let calls = factory.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "string");
        assert_eq!(calls[0].1.as_deref(), Some("uuid"));
        assert_eq!(calls[0].2, vec![AttributeKey::Description]);
    }

    #[test]
    fn plain_model_passes_every_mapped_attribute() {
        let factory = RecordingFactory::default();
        let converter = SchemaConverter::with_factory(&factory);

        let mut model = PlainModel::new("number");
        model.description = Some("d".into());
        model.example = Some(json!(1.5));
        model.enum_values = Some(vec!["1.5".into()]);
        model.title = Some("t".into());
        model.default = Some(json!(1.5));
        model.discriminator = Some("kind".into());
        model.minimum = Some(0.0);
        model.maximum = Some(2.0);
        model.unique_items = Some(false);
        model.vendor_extensions.insert("x-a".into(), json!(1));
        converter.model_to_property(&Model::Plain(model));

        let calls = factory.calls.borrow();
        assert_eq!(
            calls[0].2,
            vec![
                AttributeKey::Description,
                AttributeKey::Example,
                AttributeKey::Enum,
                AttributeKey::Title,
                AttributeKey::Default,
                AttributeKey::Discriminator,
                AttributeKey::Minimum,
                AttributeKey::Maximum,
                AttributeKey::UniqueItems,
                AttributeKey::VendorExtensions,
            ]
        );
    }

    #[test]
    fn composed_skips_unknown_branches() {
        let composed = ComposedModel::new(vec![
            ArrayModel::new(PrimitiveProperty::new("string").into()).into(),
            RefModel::new("Base").into(),
        ]);

        let Property::Object(obj) = model_to_property(&composed.into()) else {
            panic!("expected object property");
        };
        let props = obj.properties.unwrap();
        assert_eq!(props.len(), 1);
        assert!(props.contains_key("Base"));
    }

    #[test]
    fn composed_without_branches_is_empty_object() {
        let Property::Object(obj) = model_to_property(&ComposedModel::default().into()) else {
            panic!("expected object property");
        };
        assert!(obj.properties.is_none());
        assert!(obj.required_properties.is_none());
    }

    #[test]
    fn map_property_lifts_additional_properties() {
        let map = MapProperty::new(PrimitiveProperty::new("integer").into());
        let Model::Plain(model) = property_to_model(&map.into()) else {
            panic!("expected plain model");
        };
        assert_eq!(model.type_name, "object");
        assert!(model.properties.is_none());
        assert_eq!(
            model.additional_properties.as_deref(),
            Some(&Property::from(PrimitiveProperty::new("integer")))
        );
    }

    #[test]
    fn convert_ref_to_property() {
        let converter = SchemaConverter::new();
        let out = converter
            .convert(&json!({"$ref": "#/definitions/Pet"}), Direction::ToProperty)
            .unwrap();
        assert_eq!(out, json!({"$ref": "#/definitions/Pet", "name": "Pet"}));
    }

    #[test]
    fn convert_keeps_dotted_internal_refs() {
        let converter = SchemaConverter::new();
        let doc = json!({"$ref": "#/definitions/io.swagger.Pet"});

        let property = converter.convert(&doc, Direction::ToProperty).unwrap();
        assert_eq!(
            property,
            json!({"$ref": "#/definitions/io.swagger.Pet", "name": "io.swagger.Pet"})
        );
        assert_eq!(converter.convert(&property, Direction::ToModel).unwrap(), doc);
    }

    #[test]
    fn ref_format_survives_both_directions() {
        let model: Model = RefModel::new("./common.json").into();
        let Property::Ref(p) = model_to_property(&model) else {
            panic!("expected ref property");
        };
        assert_eq!(p.ref_format, RefFormat::Relative);
        assert_eq!(property_to_model(&Property::Ref(p)), model);
    }

    #[test]
    fn convert_reports_decode_errors() {
        let converter = SchemaConverter::new();
        let result = converter.convert(&json!({"oneOf": []}), Direction::ToProperty);
        assert!(matches!(
            result,
            Err(ConvertError::UnsupportedModelVariant { .. })
        ));
    }
}
