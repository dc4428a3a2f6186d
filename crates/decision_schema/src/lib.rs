//! Decision Schema Engine
//!
//! Defines what a decision process is and turns stored templates and form
//! submissions into runtime configuration.
//!
//! # Data flow
//!
//! 1. **Templates**: proposal and rubric templates compile into ordered
//!    [`FieldDescriptor`]s for the rendering layer
//! 2. **Form submissions**: the [`SchemaRegistry`] detects the schema type,
//!    merges defaults and produces a [`ProcessedSchema`]
//! 3. **Stored flat schemas**: the [`legacy`] validator checks and extracts
//!    process rows that predate voting schema definitions
//! 4. **Old call sites**: [`DeprecatedSchemaRegistry`] keeps the handler API
//!    alive on top of the definition registry
//!
//! The engine is synchronous and performs no I/O. The only shared state is
//! the registry, which is an explicit value owned by the caller.
//!
//! # Modules
//!
//! - [`path`]: dot-path get/set over JSON
//! - [`fields`]: proposal and rubric field compilation
//! - [`definition`]: voting schema definitions and bindings
//! - [`phases`]: phase-based process definitions
//! - [`binding`]: binding application and default merging
//! - [`runtime`]: voting/proposal configuration extraction
//! - [`registry`]: definition registry and schema type detection
//! - [`legacy`]: flat schema validation, vote checks and signatures
//! - [`adapter`]: deprecated handler-registry facade

pub mod adapter;
pub mod binding;
pub mod builtin;
pub mod config;
pub mod definition;
pub mod error;
pub mod fields;
pub mod legacy;
pub mod path;
pub mod phases;
pub mod registry;
pub mod runtime;

pub use config::{CompilerConfig, EngineConfig};
pub use definition::{BindingTransform, FieldBinding, SchemaType, VotingSchemaDefinition};
pub use error::SchemaError;
pub use registry::{SchemaMatcher, SchemaRegistry, SharedSchemaRegistry, TagMatcher};

pub use fields::{
    compile_proposal_schema, compile_rubric_schema, CompileDiagnostic, DeclaredFieldOrder,
    FieldCompiler, FieldDescriptor, FieldOrderResolver, ProposalCompilation,
};

pub use phases::{PhaseDefinition, PhasePermissions, PhasePosition, PhaseRules, ProcessDefinition};

pub use runtime::{
    FieldConstraint, ProcessedProposalConfig, ProcessedSchema, ProcessedVotingConfig,
};

pub use legacy::{
    CompatibilityReport, DecisionProcessSchema, LegacyVotingConfig, SchemaValidationResult,
    VoteValidationResult,
};

pub use adapter::{DegradedSchemaHandler, DeprecatedSchemaRegistry, SchemaHandler};
