//! Snapshot adapter
//!
//! [`MetadataSnapshot`] is the explicit persisted form of a
//! [`ClassMetadata`]: every attribute from the data model except the
//! reflection handle cache, which is not portable across process
//! boundaries. Restoring a snapshot recomputes the namespace from the
//! name, runs the resolution pass, and eagerly rebuilds the reflection
//! handles through the supplied introspector.
//!
//! The byte encoding used by the durable cache is bincode; the serde
//! shape itself is encoding-agnostic and must stay stable across a
//! same-version round trip.

use crate::class_metadata::{ClassMetadata, DocumentKind, InheritanceType};
use crate::field::FieldMapping;
use crate::introspect::FieldIntrospector;
use crate::shard::ShardKey;
use docmap_core::{DocumentName, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Persisted attribute set of one metadata instance
///
/// `namespace` is derivable from `name` but persisted anyway and
/// recomputed on restore, so a snapshot remains self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataSnapshot {
    /// Canonical type identifier
    pub name: DocumentName,
    /// Namespace at snapshot time
    pub namespace: String,
    /// Storage collection name
    pub collection: String,
    /// Root of the inheritance chain
    pub root_document_name: DocumentName,
    /// Ordered ancestor chain
    pub parent_classes: Vec<DocumentName>,
    /// Ordered subclass list
    pub sub_classes: Vec<DocumentName>,
    /// Inheritance strategy
    pub inheritance_type: InheritanceType,
    /// Document role
    pub kind: DocumentKind,
    /// Identifier field name
    pub identifier: Option<String>,
    /// Discriminator field name
    pub discriminator_field: Option<String>,
    /// This type's discriminator value
    pub discriminator_value: Option<String>,
    /// Discriminator map
    pub discriminator_map: IndexMap<String, DocumentName>,
    /// Custom repository type
    pub custom_repository_class_name: Option<DocumentName>,
    /// All mapping records, in insertion order
    pub field_mappings: IndexMap<String, FieldMapping>,
    /// Normalized shard key
    pub shard_key: ShardKey,
    /// Capped-collection flag
    pub collection_capped: bool,
    /// Capped collection size in bytes
    pub collection_size: Option<i64>,
    /// Capped collection document limit
    pub collection_max: Option<i64>,
}

impl MetadataSnapshot {
    /// Encode for the durable cache
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from the durable cache
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl ClassMetadata {
    /// Capture the persisted attribute set
    pub fn snapshot(&self) -> MetadataSnapshot {
        MetadataSnapshot {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            collection: self.collection.clone(),
            root_document_name: self.root_document_name.clone(),
            parent_classes: self.parent_classes.clone(),
            sub_classes: self.sub_classes.clone(),
            inheritance_type: self.inheritance_type,
            kind: self.kind,
            identifier: self.identifier.clone(),
            discriminator_field: self.discriminator_field.clone(),
            discriminator_value: self.discriminator_value.clone(),
            discriminator_map: self.discriminator_map.clone(),
            custom_repository_class_name: self.custom_repository_class_name.clone(),
            field_mappings: self.field_mappings.clone(),
            shard_key: self.shard_key.clone(),
            collection_capped: self.collection_capped,
            collection_size: self.collection_size,
            collection_max: self.collection_max,
        }
    }

    /// Rebuild a metadata instance from its persisted form
    ///
    /// The namespace is recomputed from the name, the resolution pass
    /// runs (qualifying anything the snapshot carried bare), and the
    /// reflection handle cache is rebuilt through `introspector`.
    pub fn restore(
        snapshot: MetadataSnapshot,
        introspector: Arc<dyn FieldIntrospector>,
    ) -> Self {
        let namespace = snapshot.name.namespace().unwrap_or("").to_string();
        let mut metadata = ClassMetadata {
            name: snapshot.name,
            namespace,
            collection: snapshot.collection,
            root_document_name: snapshot.root_document_name,
            parent_classes: snapshot.parent_classes,
            sub_classes: snapshot.sub_classes,
            inheritance_type: snapshot.inheritance_type,
            kind: snapshot.kind,
            identifier: snapshot.identifier,
            discriminator_field: snapshot.discriminator_field,
            discriminator_value: snapshot.discriminator_value,
            discriminator_map: snapshot.discriminator_map,
            custom_repository_class_name: snapshot.custom_repository_class_name,
            field_mappings: snapshot.field_mappings,
            shard_key: snapshot.shard_key,
            collection_capped: snapshot.collection_capped,
            collection_size: snapshot.collection_size,
            collection_max: snapshot.collection_max,
            introspector,
            reflection: RwLock::new(None),
        };
        metadata.resolve();
        metadata.rebuild_reflection();
        metadata
    }
}
