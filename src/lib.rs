//! Swagger Schema Converter
//!
//! Bidirectional conversion between Swagger 2.0 *models* (top-level, nameable
//! schema definitions) and *properties* (typed descriptors embedded in other
//! schemas).
//!
//! # Example
//!
//! ```
//! use swagger_convert::{model_to_property, property_to_model, Model, Property, RefModel};
//!
//! let model = Model::Ref(RefModel::new("#/definitions/Pet"));
//! let property = model_to_property(&model);
//!
//! let Property::Ref(reference) = &property else { unreachable!() };
//! assert_eq!(reference.reference, "Pet");
//! assert_eq!(reference.name.as_deref(), Some("Pet"));
//!
//! assert_eq!(property_to_model(&property), model);
//! ```
//!
//! # Conversion Rules
//!
//! | Model | Property |
//! |-------|----------|
//! | `PlainModel` | built by the [`PropertyFactory`] from type, format and attributes |
//! | `ArrayModel` | `ArrayProperty` (items, description, title) |
//! | `RefModel` | `RefProperty` named after the reference |
//! | `ComposedModel` | `ObjectProperty` flattened from `allOf` |
//!
//! | Property | Model |
//! |----------|-------|
//! | `RefProperty` | `RefModel` |
//! | `ArrayProperty` | `ArrayModel` (items, description, example) |
//! | anything else | `PlainModel` |
//!
//! The two directions are deliberately not inverses; see [`SchemaConverter`].

mod codec;
mod converter;
mod error;
mod factory;
mod loader;
mod model;
mod property;
mod types;

pub use codec::{model_from_value, model_to_value, property_from_value, property_to_value};
pub use converter::{model_to_property, property_to_model, SchemaConverter};
pub use error::ConvertError;
pub use factory::{
    AttributeKey, AttributeValue, Attributes, DefaultPropertyFactory, PropertyFactory,
};
pub use loader::{is_url, load_schema, load_schema_auto, load_schema_str, navigate_fragment};
pub use model::{ArrayModel, ComposedModel, Model, PlainModel, RefModel};
pub use property::{
    ArrayProperty, MapProperty, ObjectProperty, PrimitiveProperty, Property, RefProperty,
};
pub use types::{example_text, ref_path, simple_ref, Direction, Extensions, RefFormat, Xml};

#[cfg(feature = "remote")]
pub use loader::load_schema_url;
