//! Swagger 2.0 JSON encoding of models and properties.
//!
//! Decoding walks the document the way the schema is nested and keeps a
//! JSON Pointer style path for error messages (e.g. `/allOf/1/properties/id`).
//! Keys prefixed with `x-` become vendor extensions. Other unknown keys are
//! ignored.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Number, Value};

use crate::error::ConvertError;
use crate::model::{ArrayModel, ComposedModel, Model, PlainModel, RefModel};
use crate::property::{
    ArrayProperty, MapProperty, ObjectProperty, PrimitiveProperty, Property, RefProperty,
};
use crate::types::{json_type_name, pointer_token, ref_path, Extensions, Xml, EXTENSION_PREFIX};

/// Composition keywords with no model representation.
const UNSUPPORTED_MODEL_KEYWORDS: &[&str] = &["oneOf", "anyOf", "not"];

/// Keys understood by the decoder. Anything else without an `x-` prefix is dropped.
const KNOWN_KEYWORDS: &[&str] = &[
    "$ref",
    "allOf",
    "type",
    "format",
    "title",
    "description",
    "example",
    "default",
    "enum",
    "discriminator",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "multipleOf",
    "minLength",
    "maxLength",
    "pattern",
    "uniqueItems",
    "readOnly",
    "items",
    "properties",
    "required",
    "additionalProperties",
    "xml",
    "allowEmptyValue",
    "name",
];

/// Decode a Swagger schema object as a [`Model`].
///
/// # Errors
///
/// Returns `ConvertError::UnsupportedModelVariant` for `oneOf`, `anyOf` and
/// `not` schemas, and `ConvertError::InvalidSchema` for malformed fields.
pub fn model_from_value(value: &Value) -> Result<Model, ConvertError> {
    decode_model(value, "")
}

/// Decode a Swagger schema object as a [`Property`].
///
/// # Errors
///
/// Returns `ConvertError::InvalidSchema` if the schema has no usable type
/// or a field has the wrong JSON type.
pub fn property_from_value(value: &Value) -> Result<Property, ConvertError> {
    decode_property(value, "")
}

/// Encode a [`Model`] as a Swagger schema object.
pub fn model_to_value(model: &Model) -> Value {
    let mut out = Map::new();
    match model {
        Model::Plain(m) => {
            put(&mut out, "type", Some(Value::String(m.type_name.clone())));
            put_str(&mut out, "format", &m.format);
            put_str(&mut out, "name", &m.name);
            put_str(&mut out, "title", &m.title);
            put_str(&mut out, "description", &m.description);
            put(&mut out, "example", m.example.clone());
            put(&mut out, "default", m.default.clone());
            put(&mut out, "enum", m.enum_values.as_deref().map(strings_value));
            put_str(&mut out, "discriminator", &m.discriminator);
            put(&mut out, "minimum", m.minimum.and_then(number_value));
            put(&mut out, "maximum", m.maximum.and_then(number_value));
            put(&mut out, "exclusiveMinimum", m.exclusive_minimum.map(Value::Bool));
            put(&mut out, "exclusiveMaximum", m.exclusive_maximum.map(Value::Bool));
            put(&mut out, "multipleOf", m.multiple_of.and_then(number_value));
            put(&mut out, "minLength", m.min_length.map(Value::from));
            put(&mut out, "maxLength", m.max_length.map(Value::from));
            put_str(&mut out, "pattern", &m.pattern);
            put(&mut out, "uniqueItems", m.unique_items.map(Value::Bool));
            put(&mut out, "readOnly", m.read_only.map(Value::Bool));
            put(&mut out, "allowEmptyValue", m.allow_empty_value.map(Value::Bool));
            put(&mut out, "xml", m.xml.as_ref().map(xml_value));
            put(&mut out, "required", m.required.as_ref().map(names_value));
            put(&mut out, "properties", m.properties.as_ref().map(properties_value));
            put(
                &mut out,
                "additionalProperties",
                m.additional_properties.as_deref().map(property_to_value),
            );
            put_extensions(&mut out, &m.vendor_extensions);
        }
        Model::Array(m) => {
            put(&mut out, "type", Some(Value::from("array")));
            put_str(&mut out, "title", &m.title);
            put_str(&mut out, "description", &m.description);
            put(&mut out, "example", m.example.clone());
            put(&mut out, "items", m.items.as_deref().map(property_to_value));
            put(&mut out, "properties", m.properties.as_ref().map(properties_value));
            put_extensions(&mut out, &m.vendor_extensions);
        }
        Model::Ref(m) => {
            put(&mut out, "$ref", Some(Value::String(ref_path(&m.simple_ref, m.ref_format))));
        }
        Model::Composed(m) => {
            put_str(&mut out, "title", &m.title);
            put_str(&mut out, "description", &m.description);
            put(&mut out, "example", m.example.clone());
            put(
                &mut out,
                "allOf",
                Some(Value::Array(m.all_of.iter().map(model_to_value).collect())),
            );
            put_extensions(&mut out, &m.vendor_extensions);
        }
    }
    Value::Object(out)
}

/// Encode a [`Property`] as a Swagger schema object.
pub fn property_to_value(property: &Property) -> Value {
    let mut out = Map::new();
    match property {
        Property::Ref(p) => {
            put(&mut out, "$ref", Some(Value::String(ref_path(&p.reference, p.ref_format))));
            put_str(&mut out, "name", &p.name);
            put_str(&mut out, "title", &p.title);
            put_str(&mut out, "description", &p.description);
            put(&mut out, "example", p.example.clone());
            put_extensions(&mut out, &p.vendor_extensions);
        }
        Property::Array(p) => {
            put(&mut out, "type", Some(Value::from("array")));
            put_str(&mut out, "name", &p.name);
            put_str(&mut out, "title", &p.title);
            put_str(&mut out, "description", &p.description);
            put(&mut out, "example", p.example.clone());
            put(&mut out, "uniqueItems", p.unique_items.map(Value::Bool));
            put(&mut out, "allowEmptyValue", p.allow_empty_value.map(Value::Bool));
            put(&mut out, "xml", p.xml.as_ref().map(xml_value));
            put(&mut out, "items", p.items.as_deref().map(property_to_value));
            put_extensions(&mut out, &p.vendor_extensions);
        }
        Property::Object(p) => {
            put(&mut out, "type", Some(Value::from("object")));
            put_str(&mut out, "name", &p.name);
            put_str(&mut out, "title", &p.title);
            put_str(&mut out, "description", &p.description);
            put(&mut out, "example", p.example.clone());
            put(&mut out, "allowEmptyValue", p.allow_empty_value.map(Value::Bool));
            put(&mut out, "xml", p.xml.as_ref().map(xml_value));
            put(&mut out, "required", p.required_properties.as_ref().map(names_value));
            put(&mut out, "properties", p.properties.as_ref().map(properties_value));
            put_extensions(&mut out, &p.vendor_extensions);
        }
        Property::Map(p) => {
            put(&mut out, "type", Some(Value::from("object")));
            put_str(&mut out, "name", &p.name);
            put_str(&mut out, "title", &p.title);
            put_str(&mut out, "description", &p.description);
            put(&mut out, "example", p.example.clone());
            put(&mut out, "allowEmptyValue", p.allow_empty_value.map(Value::Bool));
            put(&mut out, "xml", p.xml.as_ref().map(xml_value));
            put(
                &mut out,
                "additionalProperties",
                Some(property_to_value(&p.additional_properties)),
            );
            put_extensions(&mut out, &p.vendor_extensions);
        }
        Property::Primitive(p) => {
            put(&mut out, "type", Some(Value::String(p.type_name.clone())));
            put_str(&mut out, "format", &p.format);
            put_str(&mut out, "name", &p.name);
            put_str(&mut out, "title", &p.title);
            put_str(&mut out, "description", &p.description);
            put(&mut out, "example", p.example.clone());
            put(&mut out, "default", p.default.clone());
            put(&mut out, "enum", p.enum_values.as_deref().map(strings_value));
            put(&mut out, "minimum", p.minimum.and_then(number_value));
            put(&mut out, "maximum", p.maximum.and_then(number_value));
            put(&mut out, "exclusiveMinimum", p.exclusive_minimum.map(Value::Bool));
            put(&mut out, "exclusiveMaximum", p.exclusive_maximum.map(Value::Bool));
            put(&mut out, "multipleOf", p.multiple_of.and_then(number_value));
            put(&mut out, "minLength", p.min_length.map(Value::from));
            put(&mut out, "maxLength", p.max_length.map(Value::from));
            put_str(&mut out, "pattern", &p.pattern);
            put(&mut out, "readOnly", p.read_only.map(Value::Bool));
            put(&mut out, "allowEmptyValue", p.allow_empty_value.map(Value::Bool));
            put(&mut out, "xml", p.xml.as_ref().map(xml_value));
            put_extensions(&mut out, &p.vendor_extensions);
        }
    }
    Value::Object(out)
}

// --- Decoding ---

fn decode_model(value: &Value, path: &str) -> Result<Model, ConvertError> {
    let map = expect_object(value, path)?;
    log_ignored_keys(map, path);

    if let Some(reference) = get_str(map, "$ref", path)? {
        return Ok(Model::Ref(RefModel::new(reference)));
    }

    if let Some(all_of) = map.get("allOf") {
        let branches = all_of.as_array().ok_or_else(|| {
            ConvertError::invalid(
                &format!("{}/allOf", path),
                format!("expected array, got {}", json_type_name(all_of)),
            )
        })?;
        let all_of = branches
            .iter()
            .enumerate()
            .map(|(i, branch)| decode_model(branch, &format!("{}/allOf/{}", path, i)))
            .collect::<Result<Vec<_>, _>>()?;

        return Ok(Model::Composed(ComposedModel {
            all_of,
            description: get_string(map, "description", path)?,
            title: get_string(map, "title", path)?,
            example: map.get("example").cloned(),
            vendor_extensions: extensions(map),
        }));
    }

    if let Some(keyword) = UNSUPPORTED_MODEL_KEYWORDS
        .iter()
        .find(|k| map.contains_key(**k))
    {
        return Err(ConvertError::unsupported(path, keyword));
    }

    let type_name = get_string(map, "type", path)?.unwrap_or_else(|| "object".to_string());

    if type_name == "array" {
        return Ok(Model::Array(ArrayModel {
            items: decode_items(map, path)?,
            description: get_string(map, "description", path)?,
            title: get_string(map, "title", path)?,
            example: map.get("example").cloned(),
            properties: decode_properties(map, path)?,
            vendor_extensions: extensions(map),
        }));
    }

    let mut model = PlainModel::new(type_name);
    model.format = get_string(map, "format", path)?;
    model.name = get_string(map, "name", path)?;
    model.description = get_string(map, "description", path)?;
    model.title = get_string(map, "title", path)?;
    model.example = map.get("example").cloned();
    model.default = map.get("default").cloned();
    model.enum_values = get_enum(map, path)?;
    model.discriminator = get_string(map, "discriminator", path)?;
    model.minimum = get_f64(map, "minimum", path)?;
    model.maximum = get_f64(map, "maximum", path)?;
    model.unique_items = get_bool(map, "uniqueItems", path)?;
    model.xml = get_xml(map, path)?;
    model.allow_empty_value = get_bool(map, "allowEmptyValue", path)?;
    model.properties = decode_properties(map, path)?;
    model.required = get_names(map, "required", path)?;
    model.additional_properties = decode_additional(map, path)?.map(Box::new);
    model.vendor_extensions = extensions(map);
    model.pattern = get_string(map, "pattern", path)?;
    model.min_length = get_u64(map, "minLength", path)?;
    model.max_length = get_u64(map, "maxLength", path)?;
    model.exclusive_minimum = get_bool(map, "exclusiveMinimum", path)?;
    model.exclusive_maximum = get_bool(map, "exclusiveMaximum", path)?;
    model.multiple_of = get_f64(map, "multipleOf", path)?;
    model.read_only = get_bool(map, "readOnly", path)?;
    Ok(Model::Plain(model))
}

fn decode_property(value: &Value, path: &str) -> Result<Property, ConvertError> {
    let map = expect_object(value, path)?;
    log_ignored_keys(map, path);

    let name = get_string(map, "name", path)?;
    let description = get_string(map, "description", path)?;
    let title = get_string(map, "title", path)?;
    let example = map.get("example").cloned();
    let vendor_extensions = extensions(map);

    if let Some(reference) = get_str(map, "$ref", path)? {
        return Ok(Property::Ref(RefProperty {
            name,
            description,
            title,
            example,
            vendor_extensions,
            ..RefProperty::new(reference)
        }));
    }

    let xml = get_xml(map, path)?;
    let allow_empty_value = get_bool(map, "allowEmptyValue", path)?;
    let properties = decode_properties(map, path)?;

    let type_name = match get_string(map, "type", path)? {
        Some(t) => t,
        None if properties.is_some() => "object".to_string(),
        None => return Err(ConvertError::invalid(path, "missing type")),
    };

    let property = match type_name.as_str() {
        "array" => Property::Array(ArrayProperty {
            items: decode_items(map, path)?,
            name,
            description,
            title,
            example,
            xml,
            unique_items: get_bool(map, "uniqueItems", path)?,
            allow_empty_value,
            vendor_extensions,
        }),
        "object" => match decode_additional(map, path)? {
            Some(values) => Property::Map(MapProperty {
                additional_properties: Box::new(values),
                name,
                description,
                title,
                example,
                xml,
                allow_empty_value,
                vendor_extensions,
            }),
            None => Property::Object(ObjectProperty {
                properties,
                required_properties: get_names(map, "required", path)?
                    .filter(|names| !names.is_empty()),
                name,
                description,
                title,
                example,
                xml,
                allow_empty_value,
                vendor_extensions,
            }),
        },
        _ => Property::Primitive(PrimitiveProperty {
            type_name,
            format: get_string(map, "format", path)?,
            name,
            description,
            title,
            example,
            xml,
            allow_empty_value,
            default: map.get("default").cloned(),
            enum_values: get_enum(map, path)?,
            minimum: get_f64(map, "minimum", path)?,
            maximum: get_f64(map, "maximum", path)?,
            vendor_extensions,
            pattern: get_string(map, "pattern", path)?,
            min_length: get_u64(map, "minLength", path)?,
            max_length: get_u64(map, "maxLength", path)?,
            exclusive_minimum: get_bool(map, "exclusiveMinimum", path)?,
            exclusive_maximum: get_bool(map, "exclusiveMaximum", path)?,
            multiple_of: get_f64(map, "multipleOf", path)?,
            read_only: get_bool(map, "readOnly", path)?,
        }),
    };
    Ok(property)
}

fn decode_items(
    map: &Map<String, Value>,
    path: &str,
) -> Result<Option<Box<Property>>, ConvertError> {
    map.get("items")
        .map(|items| decode_property(items, &format!("{}/items", path)).map(Box::new))
        .transpose()
}

fn decode_properties(
    map: &Map<String, Value>,
    path: &str,
) -> Result<Option<BTreeMap<String, Property>>, ConvertError> {
    let Some(value) = map.get("properties") else {
        return Ok(None);
    };
    let props_path = format!("{}/properties", path);
    let props = expect_object(value, &props_path)?;

    let mut result = BTreeMap::new();
    for (key, prop) in props {
        let prop_path = format!("{}/{}", props_path, pointer_token(key));
        result.insert(key.clone(), decode_property(prop, &prop_path)?);
    }
    Ok(Some(result))
}

/// Decode `additionalProperties` when it holds a schema.
///
/// Boolean forms (`true` / `false`) carry no value schema and are ignored.
fn decode_additional(
    map: &Map<String, Value>,
    path: &str,
) -> Result<Option<Property>, ConvertError> {
    match map.get("additionalProperties") {
        Some(value @ Value::Object(_)) => {
            decode_property(value, &format!("{}/additionalProperties", path)).map(Some)
        }
        _ => Ok(None),
    }
}

fn expect_object<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, ConvertError> {
    value.as_object().ok_or_else(|| {
        ConvertError::invalid(
            path,
            format!("expected object, got {}", json_type_name(value)),
        )
    })
}

fn type_error(path: &str, key: &str, expected: &str, actual: &Value) -> ConvertError {
    ConvertError::invalid(
        &format!("{}/{}", path, pointer_token(key)),
        format!("expected {}, got {}", expected, json_type_name(actual)),
    )
}

fn get_str<'a>(
    map: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<&'a str>, ConvertError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(type_error(path, key, "string", other)),
    }
}

fn get_string(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<String>, ConvertError> {
    Ok(get_str(map, key, path)?.map(String::from))
}

fn get_bool(map: &Map<String, Value>, key: &str, path: &str) -> Result<Option<bool>, ConvertError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(type_error(path, key, "boolean", other)),
    }
}

fn get_f64(map: &Map<String, Value>, key: &str, path: &str) -> Result<Option<f64>, ConvertError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(other) => Err(type_error(path, key, "number", other)),
    }
}

fn get_u64(map: &Map<String, Value>, key: &str, path: &str) -> Result<Option<u64>, ConvertError> {
    match map.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| type_error(path, key, "non-negative integer", value)),
    }
}

/// Enum values are kept in string form; non-string members use their JSON text.
fn get_enum(map: &Map<String, Value>, path: &str) -> Result<Option<Vec<String>>, ConvertError> {
    match map.get("enum") {
        None => Ok(None),
        Some(Value::Array(values)) => Ok(Some(
            values
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )),
        Some(other) => Err(type_error(path, "enum", "array", other)),
    }
}

fn get_names(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<BTreeSet<String>>, ConvertError> {
    match map.get(key) {
        None => Ok(None),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| {
                v.as_str()
                    .map(String::from)
                    .ok_or_else(|| type_error(path, key, "array of strings", v))
            })
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Some),
        Some(other) => Err(type_error(path, key, "array", other)),
    }
}

fn get_xml(map: &Map<String, Value>, path: &str) -> Result<Option<Xml>, ConvertError> {
    map.get("xml")
        .map(|value| {
            serde_json::from_value::<Xml>(value.clone())
                .map_err(|e| ConvertError::invalid(&format!("{}/xml", path), e.to_string()))
        })
        .transpose()
}

fn extensions(map: &Map<String, Value>) -> Extensions {
    map.iter()
        .filter(|(k, _)| k.starts_with(EXTENSION_PREFIX))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn log_ignored_keys(map: &Map<String, Value>, path: &str) {
    for key in map.keys() {
        let known = KNOWN_KEYWORDS.contains(&key.as_str())
            || UNSUPPORTED_MODEL_KEYWORDS.contains(&key.as_str())
            || key.starts_with(EXTENSION_PREFIX);
        if !known {
            tracing::debug!(path, key = key.as_str(), "ignoring unsupported schema keyword");
        }
    }
}

// --- Encoding ---

fn put(out: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        out.insert(key.to_string(), value);
    }
}

fn put_str(out: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    put(out, key, value.clone().map(Value::String));
}

fn put_extensions(out: &mut Map<String, Value>, ext: &Extensions) {
    for (k, v) in ext {
        out.insert(k.clone(), v.clone());
    }
}

fn strings_value(values: &[String]) -> Value {
    Value::Array(values.iter().cloned().map(Value::String).collect())
}

fn names_value(names: &BTreeSet<String>) -> Value {
    Value::Array(names.iter().cloned().map(Value::String).collect())
}

fn properties_value(props: &BTreeMap<String, Property>) -> Value {
    Value::Object(
        props
            .iter()
            .map(|(k, p)| (k.clone(), property_to_value(p)))
            .collect(),
    )
}

fn xml_value(xml: &Xml) -> Value {
    serde_json::to_value(xml).unwrap_or(Value::Null)
}

/// Integral values are written without a fractional part (`0`, not `0.0`).
fn number_value(n: f64) -> Option<Value> {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Some(Value::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}
