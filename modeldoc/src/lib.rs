//! modeldoc core library.
//!
//! Synthesizes `@property` annotations and a `protected $schema` field-type map for model classes
//! from their table columns and declared methods, then merges the result into the model source
//! files in place. Regenerating with unchanged inputs leaves a file byte-for-byte identical.

pub mod config;
pub mod errors;
pub mod generator;
pub mod inspector;
pub mod manifest;
pub mod model;
pub mod patcher;
pub mod registration;
pub mod registry;
pub mod schema_source;
pub mod targets;
pub mod types;

pub use config::GeneratorConfig;
pub use errors::*;
pub use generator::{FileChange, Generator, Outcome, RunEvent, RunReport, TargetReport};
pub use inspector::{try_classify_relation, Contribution, Inspection};
pub use manifest::ManifestCatalog;
pub use model::{CatalogChain, DocModel, ModelCatalog};
pub use patcher::{AnchorPatcher, Document, GeneratedBlocks, ManagedBlock};
pub use registration::{ModelRegistration, RegisteredModels};
pub use registry::{PropertyEntry, PropertyRegistry, SchemaEntry, SchemaRegistry};
pub use schema_source::{SchemaSource, SnapshotSchemaSource};
pub use targets::{Target, TargetResolver};
pub use types::{
    Cardinality, ColumnDescriptor, KeyCase, MethodInfo, PropertyOrigin, Relation, RelationDescriptor, RelationKind,
};

// Re-export for registration macros
pub use inventory;
