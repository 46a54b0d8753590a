//! Mapping metadata for docmap
//!
//! This crate holds the per-type metadata model and everything that
//! operates on it:
//! - FieldMapping / MappingType / MappingKind: one field or association
//! - ClassMetadata: the per-type aggregate with its build and read APIs
//! - resolution pass: namespace qualification after build and restore
//! - MetadataSnapshot: the persisted attribute set
//! - FieldIntrospector / TypeCatalog: introspection capability standing in
//!   for runtime reflection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod class_metadata;
pub mod field;
pub mod introspect;
pub mod resolve;
pub mod shard;
pub mod snapshot;

pub use class_metadata::{ClassMetadata, DocumentKind, InheritanceType};
pub use field::{AssociationSpec, FieldMapping, FieldSpec, MappingKind, MappingType};
pub use introspect::{FieldIntrospector, PropertyHandle, TypeCatalog, TypeDescriptor};
pub use shard::{ShardDirection, ShardKey, ShardOption};
pub use snapshot::MetadataSnapshot;
