//! Voting schema definition registry.
//!
//! A registry is an explicit value: build it once at startup (usually with
//! [`SchemaRegistry::from_config`]) and pass it to the code that needs it.
//! Registration overwrites silently, last writer wins.
//!
//! # Detection
//!
//! [`SchemaRegistry::detect_schema_type`] resolves a form submission to a
//! schema type in three stages:
//!
//! 1. An explicit `schemaType` tag naming a registered definition
//! 2. The first definition (in registration order) accepted by any
//!    [`SchemaMatcher`]
//! 3. [`SchemaType::Default`]

use crate::binding::matches_schema_type;
use crate::builtin::builtin_definitions;
use crate::config::EngineConfig;
use crate::definition::{SchemaType, VotingSchemaDefinition};
use crate::runtime::{process_with_schema, ProcessedSchema};
use serde_json::{Map, Value};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Structural predicate used in the detection scan.
pub trait SchemaMatcher: Send + Sync {
    fn matches(&self, data: &Value, definition: &VotingSchemaDefinition) -> bool;
}

/// Matches data whose `schemaType` tag equals the definition's.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagMatcher;

impl SchemaMatcher for TagMatcher {
    fn matches(&self, data: &Value, definition: &VotingSchemaDefinition) -> bool {
        matches_schema_type(data, definition)
    }
}

pub struct SchemaRegistry {
    // Registration order is the detection scan order.
    definitions: Vec<VotingSchemaDefinition>,
    default_type: SchemaType,
    fallback: VotingSchemaDefinition,
    matchers: Vec<Box<dyn SchemaMatcher>>,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schema_types", &self.get_all_schema_types())
            .field("default_type", &self.default_type)
            .field("matchers", &self.matchers.len())
            .finish()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl SchemaRegistry {
    /// An empty registry. `default_type` should be registered before use;
    /// until then lookups fall back to a bare definition of that type.
    pub fn new(default_type: impl Into<SchemaType>) -> Self {
        let default_type = default_type.into();
        Self {
            definitions: Vec::new(),
            fallback: VotingSchemaDefinition::new(default_type.clone(), default_type.to_string()),
            default_type,
            matchers: vec![Box::new(TagMatcher)],
        }
    }

    /// The built-in definitions with `simple` as default.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new(SchemaType::Simple);
        for definition in builtin_definitions() {
            registry.register_schema(definition);
        }
        registry
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let mut registry = Self::new(config.default_schema_type.clone());
        if config.include_builtins {
            for definition in builtin_definitions() {
                registry.register_schema(definition);
            }
        }
        for definition in &config.definitions {
            registry.register_schema(definition.clone());
        }
        registry
    }

    /// Append a matcher to the detection scan.
    pub fn with_matcher(mut self, matcher: impl SchemaMatcher + 'static) -> Self {
        self.matchers.push(Box::new(matcher));
        self
    }

    /// Register `definition`, replacing any definition with the same type.
    /// A replaced definition keeps its position in the detection scan.
    pub fn register_schema(&mut self, definition: VotingSchemaDefinition) {
        match self
            .definitions
            .iter()
            .position(|d| d.schema_type == definition.schema_type)
        {
            Some(index) => {
                debug!("Replacing schema definition '{}'", definition.schema_type);
                self.definitions[index] = definition;
            }
            None => {
                debug!("Registered schema definition '{}'", definition.schema_type);
                self.definitions.push(definition);
            }
        }
    }

    pub fn get_schema(&self, schema_type: &str) -> Option<&VotingSchemaDefinition> {
        self.definitions
            .iter()
            .find(|d| d.schema_type == schema_type)
    }

    pub fn default_schema(&self) -> &VotingSchemaDefinition {
        self.get_schema(self.default_type.as_str())
            .unwrap_or(&self.fallback)
    }

    pub fn get_schema_or_default(&self, schema_type: &str) -> &VotingSchemaDefinition {
        self.get_schema(schema_type)
            .unwrap_or_else(|| self.default_schema())
    }

    pub fn default_type(&self) -> &SchemaType {
        &self.default_type
    }

    pub fn get_all_schema_types(&self) -> Vec<SchemaType> {
        self.definitions
            .iter()
            .map(|d| d.schema_type.clone())
            .collect()
    }

    pub fn contains(&self, schema_type: &str) -> bool {
        self.get_schema(schema_type).is_some()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn detect_schema_type(&self, data: &Value) -> SchemaType {
        if let Some(tag) = data.get("schemaType").and_then(Value::as_str) {
            if let Some(definition) = self.get_schema(tag) {
                return definition.schema_type.clone();
            }
        }

        for definition in &self.definitions {
            if self.matchers.iter().any(|m| m.matches(data, definition)) {
                return definition.schema_type.clone();
            }
        }

        SchemaType::Default
    }

    /// Detect, resolve (falling back to the default) and process.
    pub fn process_schema(&self, form_data: &Map<String, Value>) -> ProcessedSchema {
        let data = Value::Object(form_data.clone());
        let detected = self.detect_schema_type(&data);
        let definition = self.get_schema_or_default(detected.as_str());
        debug!(
            "Processing form with schema '{}' (detected '{}')",
            definition.schema_type, detected
        );
        process_with_schema(form_data, definition)
    }
}

/// A registry shared across threads.
///
/// Concurrent registrations under one key resolve last-writer-wins with no
/// ordering guarantee; register at startup when order matters.
#[derive(Debug, Clone, Default)]
pub struct SharedSchemaRegistry {
    inner: Arc<RwLock<SchemaRegistry>>,
}

impl SharedSchemaRegistry {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    // A panic while holding the lock cannot leave a half-written definition
    // (registration is a single assignment), so poisoned guards are recovered.
    pub fn read(&self) -> RwLockReadGuard<'_, SchemaRegistry> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, SchemaRegistry> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn register_schema(&self, definition: VotingSchemaDefinition) {
        self.write().register_schema(definition);
    }

    pub fn get_schema(&self, schema_type: &str) -> Option<VotingSchemaDefinition> {
        self.read().get_schema(schema_type).cloned()
    }

    pub fn get_all_schema_types(&self) -> Vec<SchemaType> {
        self.read().get_all_schema_types()
    }

    pub fn detect_schema_type(&self, data: &Value) -> SchemaType {
        self.read().detect_schema_type(data)
    }

    pub fn process_schema(&self, form_data: &Map<String, Value>) -> ProcessedSchema {
        self.read().process_schema(form_data)
    }
}
