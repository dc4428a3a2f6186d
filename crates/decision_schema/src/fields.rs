//! Field compilation for proposal and rubric templates.
//!
//! Templates are JSON-Schema-like objects:
//!
//! ```json
//! {
//!   "properties": {
//!     "title":  { "type": "string" },
//!     "budget": { "type": "number", "x-format": "money" }
//!   },
//!   "x-field-order": ["budget", "title"]
//! }
//! ```
//!
//! Compilation yields one [`FieldDescriptor`] per property, in a stable order,
//! for the rendering layer.

use crate::config::CompilerConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;

/// Property extension naming the display format.
pub const FORMAT_EXTENSION: &str = "x-format";
/// Template extension listing property keys in display order.
pub const FIELD_ORDER_EXTENSION: &str = "x-field-order";
pub const DEFAULT_FIELD_FORMAT: &str = "short-text";

/// A compiled, render-ready template property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub key: String,
    pub format: String,
    /// Set for proposal fields only; rubrics have no system fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_system: Option<bool>,
    pub schema: Value,
}

impl FieldDescriptor {
    fn from_property(key: &str, schema: &Value) -> Self {
        let format = schema
            .get(FORMAT_EXTENSION)
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_FIELD_FORMAT)
            .to_string();
        Self {
            key: key.to_string(),
            format,
            is_system: None,
            schema: schema.clone(),
        }
    }
}

/// Non-fatal finding raised while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompileDiagnostic {
    MissingSystemField { field: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalCompilation {
    pub fields: Vec<FieldDescriptor>,
    pub diagnostics: Vec<CompileDiagnostic>,
}

/// Resolves the full display order of a proposal template's fields.
///
/// The result may name keys that are not declared properties; the compiler
/// ignores those.
pub trait FieldOrderResolver: Send + Sync {
    fn resolve_all(&self, template: &Value) -> Vec<String>;
}

/// Explicit `x-field-order` keys first, then remaining declared properties,
/// deduplicated.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredFieldOrder;

impl FieldOrderResolver for DeclaredFieldOrder {
    fn resolve_all(&self, template: &Value) -> Vec<String> {
        let explicit = field_order(template);
        let declared = properties(template).into_iter().flat_map(|p| p.keys().map(String::as_str));
        first_occurrences(explicit.into_iter().chain(declared), |_| true)
    }
}

pub struct FieldCompiler {
    required_system_fields: Vec<String>,
    system_fields: HashSet<String>,
    order: Box<dyn FieldOrderResolver>,
}

impl Default for FieldCompiler {
    fn default() -> Self {
        Self::from_config(&CompilerConfig::default())
    }
}

impl FieldCompiler {
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self {
            required_system_fields: config.required_system_fields.clone(),
            system_fields: config.system_fields.iter().cloned().collect(),
            order: Box::new(DeclaredFieldOrder),
        }
    }

    pub fn with_order_resolver(mut self, resolver: impl FieldOrderResolver + 'static) -> Self {
        self.order = Box::new(resolver);
        self
    }

    pub fn is_system_field(&self, key: &str) -> bool {
        self.system_fields.contains(key)
    }

    /// Compile a proposal template, logging missing system fields.
    pub fn compile_proposal_schema(&self, template: &Value) -> Vec<FieldDescriptor> {
        let compilation = self.compile_proposal_schema_report(template);
        for diagnostic in &compilation.diagnostics {
            match diagnostic {
                CompileDiagnostic::MissingSystemField { field } => {
                    warn!("Proposal template is missing required system field '{}'", field);
                }
            }
        }
        compilation.fields
    }

    /// Compile a proposal template and return the diagnostics instead of
    /// logging them.
    pub fn compile_proposal_schema_report(&self, template: &Value) -> ProposalCompilation {
        let empty = Map::new();
        let props = properties(template).unwrap_or(&empty);

        let diagnostics = self
            .required_system_fields
            .iter()
            .filter(|field| !props.contains_key(field.as_str()))
            .map(|field| CompileDiagnostic::MissingSystemField {
                field: field.clone(),
            })
            .collect();

        let keys = self.order.resolve_all(template);
        let fields = first_occurrences(keys.iter().map(String::as_str), |key| props.contains_key(key))
            .into_iter()
            .filter_map(|key| {
                let schema = props.get(&key)?;
                let mut descriptor = FieldDescriptor::from_property(&key, schema);
                descriptor.is_system = Some(self.is_system_field(&key));
                Some(descriptor)
            })
            .collect();

        ProposalCompilation { fields, diagnostics }
    }

    pub fn compile_rubric_schema(&self, template: &Value) -> Vec<FieldDescriptor> {
        compile_rubric_schema(template)
    }
}

/// Compile a proposal template with the default configuration.
pub fn compile_proposal_schema(template: &Value) -> Vec<FieldDescriptor> {
    FieldCompiler::default().compile_proposal_schema(template)
}

/// Compile a rubric template: `x-field-order` keys first, in that order, then
/// the remaining properties in declaration order. Each key appears once.
pub fn compile_rubric_schema(template: &Value) -> Vec<FieldDescriptor> {
    let Some(props) = properties(template).filter(|p| !p.is_empty()) else {
        return Vec::new();
    };

    let ordered = field_order(template)
        .into_iter()
        .chain(props.keys().map(String::as_str));

    first_occurrences(ordered, |key| props.contains_key(key))
        .into_iter()
        .filter_map(|key| props.get(&key).map(|schema| FieldDescriptor::from_property(&key, schema)))
        .collect()
}

fn properties(template: &Value) -> Option<&Map<String, Value>> {
    template.get("properties").and_then(Value::as_object)
}

fn field_order(template: &Value) -> Vec<&str> {
    template
        .get(FIELD_ORDER_EXTENSION)
        .and_then(Value::as_array)
        .map(|keys| keys.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn first_occurrences<'a>(
    keys: impl IntoIterator<Item = &'a str>,
    keep: impl Fn(&str) -> bool,
) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.into_iter()
        .filter(|key| keep(*key) && seen.insert(*key))
        .map(str::to_string)
        .collect()
}
