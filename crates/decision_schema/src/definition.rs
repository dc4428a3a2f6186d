//! Voting schema definitions.
//!
//! A `VotingSchemaDefinition` is a named template of a voting configuration:
//! the form shown to process administrators, its defaults, and the bindings
//! that move submitted form fields into the process-schema object.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Tag returned by detection when no registered definition matches.
pub const DEFAULT_SCHEMA_TYPE: &str = "default";
pub const SIMPLE_SCHEMA_TYPE: &str = "simple";
pub const ADVANCED_SCHEMA_TYPE: &str = "advanced";

/// Schema type tag.
///
/// Built-in types are variants; runtime-registered types use `Custom`.
/// Equality and hashing go through [`SchemaType::as_str`], so
/// `Custom("simple")` and `Simple` are the same key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SchemaType {
    /// No definition matched; callers fall back to the registry default
    Default,
    Simple,
    Advanced,
    Custom(String),
}

impl SchemaType {
    pub fn as_str(&self) -> &str {
        match self {
            SchemaType::Default => DEFAULT_SCHEMA_TYPE,
            SchemaType::Simple => SIMPLE_SCHEMA_TYPE,
            SchemaType::Advanced => ADVANCED_SCHEMA_TYPE,
            SchemaType::Custom(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, SchemaType::Custom(_))
    }
}

impl From<&str> for SchemaType {
    fn from(value: &str) -> Self {
        match value {
            DEFAULT_SCHEMA_TYPE => SchemaType::Default,
            SIMPLE_SCHEMA_TYPE => SchemaType::Simple,
            ADVANCED_SCHEMA_TYPE => SchemaType::Advanced,
            other => SchemaType::Custom(other.to_string()),
        }
    }
}

impl From<String> for SchemaType {
    fn from(value: String) -> Self {
        match value.as_str() {
            DEFAULT_SCHEMA_TYPE | SIMPLE_SCHEMA_TYPE | ADVANCED_SCHEMA_TYPE => {
                SchemaType::from(value.as_str())
            }
            _ => SchemaType::Custom(value),
        }
    }
}

impl From<SchemaType> for String {
    fn from(value: SchemaType) -> Self {
        match value {
            SchemaType::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl PartialEq for SchemaType {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for SchemaType {}

impl PartialEq<str> for SchemaType {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for SchemaType {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Hash for SchemaType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a bound form value is written into the process schema.
///
/// Only `Direct` bindings are applied automatically; every other transform
/// is left to the caller (see `binding::get_special_bindings`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BindingTransform {
    Direct,
    Custom(String),
}

impl BindingTransform {
    pub fn as_str(&self) -> &str {
        match self {
            BindingTransform::Direct => "direct",
            BindingTransform::Custom(name) => name,
        }
    }
}

impl From<String> for BindingTransform {
    fn from(value: String) -> Self {
        if value == "direct" {
            BindingTransform::Direct
        } else {
            BindingTransform::Custom(value)
        }
    }
}

impl From<BindingTransform> for String {
    fn from(value: BindingTransform) -> Self {
        match value {
            BindingTransform::Direct => "direct".to_string(),
            BindingTransform::Custom(name) => name,
        }
    }
}

/// Maps one form field to a dot-path inside the derived process schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldBinding {
    /// Destination path, e.g. `instanceData.maxVotesPerMember`
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<BindingTransform>,
}

impl FieldBinding {
    pub fn direct(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            transform: None,
        }
    }

    pub fn with_transform(target: impl Into<String>, transform: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            transform: Some(BindingTransform::from(transform.into())),
        }
    }

    /// Absent and `direct` transforms are applied automatically.
    pub fn is_direct(&self) -> bool {
        matches!(self.transform, None | Some(BindingTransform::Direct))
    }
}

/// A named, versioned template of a voting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingSchemaDefinition {
    /// Unique key within a registry
    pub schema_type: SchemaType,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// JSON Schema of the configuration form
    #[serde(default)]
    pub form_schema: Value,

    /// Rendering hints for the configuration form
    #[serde(default)]
    pub ui_schema: Value,

    /// Values used when the form leaves a key unset
    #[serde(default)]
    pub defaults: Map<String, Value>,

    /// Form field name -> destination binding, applied in declaration order
    #[serde(default)]
    pub bindings: IndexMap<String, FieldBinding>,
}

impl VotingSchemaDefinition {
    pub fn new(schema_type: impl Into<SchemaType>, name: impl Into<String>) -> Self {
        Self {
            schema_type: schema_type.into(),
            name: name.into(),
            description: String::new(),
            form_schema: Value::Null,
            ui_schema: Value::Null,
            defaults: Map::new(),
            bindings: IndexMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_form_schema(mut self, form_schema: Value) -> Self {
        self.form_schema = form_schema;
        self
    }

    pub fn with_ui_schema(mut self, ui_schema: Value) -> Self {
        self.ui_schema = ui_schema;
        self
    }

    pub fn with_default(mut self, key: impl Into<String>, value: Value) -> Self {
        self.defaults.insert(key.into(), value);
        self
    }

    pub fn with_binding(mut self, field: impl Into<String>, binding: FieldBinding) -> Self {
        self.bindings.insert(field.into(), binding);
        self
    }
}
