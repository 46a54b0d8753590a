//! docmap - embedded document-mapping metadata engine
//!
//! docmap describes how program types map onto a schemaless document
//! store: field mappings, embedded and referenced associations,
//! inheritance hierarchies with discriminators, shard keys and collection
//! options. Metadata is built once per type, resolved (bare type names
//! qualified against the owning namespace), optionally persisted to a
//! durable snapshot cache, and restored in later processes without
//! re-reading the mapping source.
//!
//! # Quick Start
//!
//! ```
//! use docmap::{
//!     FieldIntrospector, FieldSpec, MetadataRegistry, TypeCatalog, TypeDescriptor,
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> docmap::Result<()> {
//! // Describe the fields the mapped types declare
//! let catalog = TypeCatalog::new();
//! catalog.register(TypeDescriptor::new("Documents::CmsUser").field("username"));
//!
//! // Build metadata through the registry (construct-once per type)
//! let registry = MetadataRegistry::new(Arc::new(catalog) as Arc<dyn FieldIntrospector>);
//! let metadata = registry.metadata_for("Documents::CmsUser", |cm| {
//!     cm.map_field(FieldSpec::new("username"))
//! })?;
//!
//! assert_eq!(metadata.collection(), "CmsUser");
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The metadata model lives in `docmap-metadata` (records, the per-type
//! aggregate, resolution, snapshots), foundational types in
//! `docmap-core`, and the registry plus durable cache in
//! `docmap-registry`. This facade re-exports the public API.

pub use docmap_core::{DocumentName, MappingError, Result, NAMESPACE_SEPARATOR};
pub use docmap_metadata::{
    AssociationSpec, ClassMetadata, DocumentKind, FieldIntrospector, FieldMapping, FieldSpec,
    InheritanceType, MappingKind, MappingType, MetadataSnapshot, PropertyHandle, ShardDirection,
    ShardKey, ShardOption, TypeCatalog, TypeDescriptor,
};
pub use docmap_registry::{FileCache, MemoryCache, MetadataCache, MetadataRegistry};
