//! Core types shared by the model and property hierarchies.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Vendor extensions (`x-` keys), in insertion order.
pub type Extensions = Map<String, Value>;

/// Prefix of internal references into the `definitions` section.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Prefix marking a vendor extension key.
pub const EXTENSION_PREFIX: &str = "x-";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Reduce a reference to its simple name.
///
/// `#/definitions/Pet` becomes `Pet`. Simple names and relative or remote
/// references (`other.json#/Pet`) are returned unchanged.
pub fn simple_ref(reference: &str) -> &str {
    reference
        .strip_prefix(DEFINITIONS_PREFIX)
        .filter(|name| !name.is_empty())
        .unwrap_or(reference)
}

/// Where a reference points, decided from its raw `$ref` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RefFormat {
    /// A definition in the same document (`#/definitions/Pet` or `Pet`).
    #[default]
    Internal,
    /// Another file, relative to the current one (`./pet.json`, `common.json#/Error`).
    Relative,
    /// A remote document (`https://example.com/pet.json`).
    Url,
}

impl RefFormat {
    /// Classify a raw reference.
    ///
    /// Bare names are internal even when they contain dots (`io.swagger.Pet`).
    pub fn of(reference: &str) -> Self {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            RefFormat::Url
        } else if reference.starts_with("#/") {
            RefFormat::Internal
        } else if reference.starts_with('.')
            || reference.starts_with('/')
            || reference.contains('#')
            || has_document_extension(reference)
        {
            RefFormat::Relative
        } else {
            RefFormat::Internal
        }
    }
}

fn has_document_extension(reference: &str) -> bool {
    [".json", ".yaml", ".yml"]
        .iter()
        .any(|ext| reference.ends_with(ext))
}

/// Expand a simple reference into the form written to documents.
///
/// Internal names gain the `#/definitions/` prefix. Relative and URL
/// references, and internal pointers outside `definitions`, are kept as-is.
pub fn ref_path(simple: &str, format: RefFormat) -> String {
    match format {
        RefFormat::Internal if !simple.starts_with("#/") => {
            format!("{}{}", DEFINITIONS_PREFIX, simple)
        }
        _ => simple.to_string(),
    }
}

/// Escape a key for use as one JSON Pointer segment (`~` to `~0`, `/` to `~1`).
pub(crate) fn pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// Render an example value in its string form.
///
/// Strings keep their text; every other value uses compact JSON.
pub fn example_text(example: &Value) -> String {
    match example {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Direction of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Model (top-level schema) to Property (embedded descriptor).
    ToProperty,
    /// Property to Model.
    ToModel,
}

impl Direction {
    /// Create direction from a to-property flag (true = ToProperty, false = ToModel).
    pub fn from_property_flag(to_property: bool) -> Self {
        if to_property {
            Direction::ToProperty
        } else {
            Direction::ToModel
        }
    }
}

/// XML serialization hints attached to a schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Xml {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<bool>,
}
