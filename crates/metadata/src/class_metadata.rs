//! Per-type mapping metadata aggregate
//!
//! [`ClassMetadata`] holds the full mapping description of one document
//! type: field and association records, the inheritance chain,
//! discriminator configuration, shard key, and collection options. It is
//! mutated through the `map_*`/`set_*` API during the single-threaded
//! build phase, resolved once, then published read-only.
//!
//! Raw identifiers handed to the mutation API may be bare; nothing is
//! qualified here. Qualification is the resolution pass's job (see the
//! `resolve` module), which runs after building and again after every
//! snapshot restore.

use crate::field::{AssociationSpec, FieldMapping, FieldSpec, MappingKind, MappingType};
use crate::introspect::{FieldIntrospector, PropertyHandle};
use crate::shard::{ShardDirection, ShardKey, ShardOption};
use docmap_core::{DocumentName, MappingError, Result};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Inheritance mapping strategy for a document hierarchy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum InheritanceType {
    /// No inheritance mapping
    #[default]
    None,
    /// Whole hierarchy stored in a single collection, discriminated by a
    /// stored field value
    SingleCollection,
}

/// Role of a mapped type within the document model
///
/// Exactly one role per type: a regular top-level document, a document
/// embedded inside others, or a mapped superclass that contributes
/// mappings but is never stored itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum DocumentKind {
    /// Regular top-level document with its own collection
    #[default]
    Document,
    /// Document only ever stored nested inside a parent document
    EmbeddedDocument,
    /// Superclass providing mappings to subclasses, never stored directly
    MappedSuperclass,
}

/// Full mapping metadata for one document type
///
/// Constructed once per type (normally through the registry), mutated
/// during its build phase, then treated as read-only. Survives a
/// snapshot/restore cycle through the `snapshot` module; the reflection
/// handle cache is transient and rebuilt through the injected
/// [`FieldIntrospector`].
pub struct ClassMetadata {
    pub(crate) name: DocumentName,
    pub(crate) namespace: String,
    pub(crate) collection: String,
    pub(crate) root_document_name: DocumentName,
    pub(crate) parent_classes: Vec<DocumentName>,
    pub(crate) sub_classes: Vec<DocumentName>,
    pub(crate) inheritance_type: InheritanceType,
    pub(crate) kind: DocumentKind,
    pub(crate) identifier: Option<String>,
    pub(crate) discriminator_field: Option<String>,
    pub(crate) discriminator_value: Option<String>,
    pub(crate) discriminator_map: IndexMap<String, DocumentName>,
    pub(crate) custom_repository_class_name: Option<DocumentName>,
    pub(crate) field_mappings: IndexMap<String, FieldMapping>,
    pub(crate) shard_key: ShardKey,
    pub(crate) collection_capped: bool,
    pub(crate) collection_size: Option<i64>,
    pub(crate) collection_max: Option<i64>,

    // Transient state, never snapshotted
    pub(crate) introspector: Arc<dyn FieldIntrospector>,
    pub(crate) reflection: RwLock<Option<IndexMap<String, PropertyHandle>>>,
}

impl ClassMetadata {
    /// Create fresh metadata for a document type
    ///
    /// The namespace is derived from the name; the collection defaults to
    /// the short type name; the root document defaults to the type itself.
    pub fn new(name: impl Into<DocumentName>, introspector: Arc<dyn FieldIntrospector>) -> Self {
        let name = name.into();
        let namespace = name.namespace().unwrap_or("").to_string();
        let collection = name.short_name().to_string();
        ClassMetadata {
            root_document_name: name.clone(),
            namespace,
            collection,
            name,
            parent_classes: Vec::new(),
            sub_classes: Vec::new(),
            inheritance_type: InheritanceType::None,
            kind: DocumentKind::Document,
            identifier: None,
            discriminator_field: None,
            discriminator_value: None,
            discriminator_map: IndexMap::new(),
            custom_repository_class_name: None,
            field_mappings: IndexMap::new(),
            shard_key: ShardKey::default(),
            collection_capped: false,
            collection_size: None,
            collection_max: None,
            introspector,
            reflection: RwLock::new(None),
        }
    }

    // =========================================================================
    // Mutation API (build phase only)
    // =========================================================================

    /// Map a scalar field
    ///
    /// The field must be declared on the type or an ancestor, per the
    /// introspector. Re-mapping an existing field name replaces the
    /// earlier record entirely.
    pub fn map_field(&mut self, spec: FieldSpec) -> Result<()> {
        if !self.introspector.has_field(&self.name, &spec.field_name) {
            return Err(MappingError::UnknownField {
                document: self.name.to_string(),
                field: spec.field_name,
            });
        }
        let field_name = spec.field_name;
        let record = FieldMapping {
            storage_key: spec.storage_key.unwrap_or_else(|| field_name.clone()),
            mapping_type: spec
                .mapping_type
                .unwrap_or_else(|| MappingType::Scalar("string".to_string())),
            kind: MappingKind::Field,
            nullable: spec.nullable.unwrap_or(false),
            target_document: None,
            mapped_by: None,
            inversed_by: None,
            field_name: field_name.clone(),
        };
        self.insert_mapping(record)?;
        if spec.id {
            self.identifier = Some(field_name);
        }
        Ok(())
    }

    /// Map a to-one embedded association
    pub fn map_one_embedded(&mut self, spec: AssociationSpec) -> Result<()> {
        self.map_association(spec, MappingKind::Embed, MappingType::One)
    }

    /// Map a to-many embedded association
    pub fn map_many_embedded(&mut self, spec: AssociationSpec) -> Result<()> {
        self.map_association(spec, MappingKind::Embed, MappingType::Many)
    }

    /// Map a to-one referenced association
    pub fn map_one_reference(&mut self, spec: AssociationSpec) -> Result<()> {
        self.map_association(spec, MappingKind::Reference, MappingType::One)
    }

    /// Map a to-many referenced association
    pub fn map_many_reference(&mut self, spec: AssociationSpec) -> Result<()> {
        self.map_association(spec, MappingKind::Reference, MappingType::Many)
    }

    fn map_association(
        &mut self,
        spec: AssociationSpec,
        kind: MappingKind,
        cardinality: MappingType,
    ) -> Result<()> {
        let field_name = spec.field_name;
        let target = match spec.target_document {
            Some(target) => target,
            None => {
                return Err(MappingError::MissingTargetDocument {
                    document: self.name.to_string(),
                    field: field_name,
                })
            }
        };
        let record = FieldMapping {
            storage_key: spec.storage_key.unwrap_or_else(|| field_name.clone()),
            mapping_type: cardinality,
            kind,
            nullable: spec.nullable.unwrap_or(false),
            target_document: Some(target),
            mapped_by: spec.mapped_by,
            inversed_by: spec.inversed_by,
            field_name,
        };
        self.insert_mapping(record)
    }

    /// Insert a record, enforcing the discriminator-name invariant and
    /// last-write-wins replacement
    fn insert_mapping(&mut self, record: FieldMapping) -> Result<()> {
        if self.discriminator_field.as_deref() == Some(record.field_name.as_str()) {
            return Err(MappingError::DiscriminatorFieldConflict {
                document: self.name.to_string(),
                field: record.field_name,
            });
        }
        *self.reflection.get_mut() = None;
        self.field_mappings.insert(record.field_name.clone(), record);
        Ok(())
    }

    /// Set the stored field used to discriminate concrete types
    ///
    /// Fails if the name is already taken by a field mapping.
    pub fn set_discriminator_field(&mut self, field: impl Into<String>) -> Result<()> {
        let field = field.into();
        if self.field_mappings.contains_key(&field) {
            return Err(MappingError::DiscriminatorFieldConflict {
                document: self.name.to_string(),
                field,
            });
        }
        self.discriminator_field = Some(field);
        Ok(())
    }

    /// Set the discriminator map from short keys to type identifiers
    ///
    /// Values may be bare; they are qualified by resolution, not here.
    pub fn set_discriminator_map<I, K, V>(&mut self, map: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<DocumentName>,
    {
        self.discriminator_map = map
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
    }

    /// Set this type's own discriminator value
    pub fn set_discriminator_value(&mut self, value: impl Into<String>) {
        self.discriminator_value = Some(value.into());
    }

    /// Set the inheritance mapping strategy
    pub fn set_inheritance_type(&mut self, inheritance_type: InheritanceType) {
        self.inheritance_type = inheritance_type;
    }

    /// Set the ordered ancestor chain (nearest first); raw identifiers
    pub fn set_parent_classes<I, N>(&mut self, parents: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<DocumentName>,
    {
        self.parent_classes = parents.into_iter().map(Into::into).collect();
    }

    /// Set the ordered subclass list; raw identifiers
    pub fn set_subclasses<I, N>(&mut self, subclasses: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<DocumentName>,
    {
        self.sub_classes = subclasses.into_iter().map(Into::into).collect();
    }

    /// Set the repository type to use instead of the default one
    pub fn set_custom_repository_class(&mut self, name: impl Into<DocumentName>) {
        self.custom_repository_class_name = Some(name.into());
    }

    /// Set the document role
    pub fn set_kind(&mut self, kind: DocumentKind) {
        self.kind = kind;
    }

    /// Set the identifier field name
    pub fn set_identifier(&mut self, field: impl Into<String>) {
        self.identifier = Some(field.into());
    }

    /// Set the shard key, normalizing raw directions
    pub fn set_shard_key<K, D, I>(&mut self, keys: I) -> Result<()>
    where
        K: Into<String>,
        D: Into<ShardDirection>,
        I: IntoIterator<Item = (K, D)>,
    {
        self.set_shard_key_with_options(keys, IndexMap::new())
    }

    /// Set the shard key with store-specific options
    pub fn set_shard_key_with_options<K, D, I>(
        &mut self,
        keys: I,
        options: IndexMap<String, ShardOption>,
    ) -> Result<()>
    where
        K: Into<String>,
        D: Into<ShardDirection>,
        I: IntoIterator<Item = (K, D)>,
    {
        self.shard_key = ShardKey::from_raw(keys, options)?;
        Ok(())
    }

    /// Set the storage collection name
    pub fn set_collection(&mut self, collection: impl Into<String>) {
        self.collection = collection.into();
    }

    /// Enable or disable the capped-collection flag
    ///
    /// `size`/`max` are only meaningful while this is enabled.
    pub fn set_collection_capped(&mut self, capped: bool) {
        self.collection_capped = capped;
    }

    /// Set the capped collection size in bytes
    pub fn set_collection_size(&mut self, size: i64) {
        self.collection_size = Some(size);
    }

    /// Set the capped collection document limit
    pub fn set_collection_max(&mut self, max: i64) {
        self.collection_max = Some(max);
    }

    // =========================================================================
    // Read API
    // =========================================================================

    /// Canonical type identifier
    pub fn name(&self) -> &DocumentName {
        &self.name
    }

    /// Namespace derived from the type identifier (empty for global types)
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Storage collection name
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Topmost ancestor in the inheritance chain, or the type itself
    pub fn root_document_name(&self) -> &DocumentName {
        &self.root_document_name
    }

    /// Ordered ancestor chain
    pub fn parent_classes(&self) -> &[DocumentName] {
        &self.parent_classes
    }

    /// Ordered subclass list
    pub fn sub_classes(&self) -> &[DocumentName] {
        &self.sub_classes
    }

    /// Inheritance mapping strategy
    pub fn inheritance_type(&self) -> InheritanceType {
        self.inheritance_type
    }

    /// Document role
    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Check whether this type is only stored embedded in parents
    pub fn is_embedded_document(&self) -> bool {
        self.kind == DocumentKind::EmbeddedDocument
    }

    /// Check whether this type is a mapped superclass
    pub fn is_mapped_superclass(&self) -> bool {
        self.kind == DocumentKind::MappedSuperclass
    }

    /// Identifier field name, if one was mapped
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Discriminator field name
    pub fn discriminator_field(&self) -> Option<&str> {
        self.discriminator_field.as_deref()
    }

    /// This type's own discriminator value
    pub fn discriminator_value(&self) -> Option<&str> {
        self.discriminator_value.as_deref()
    }

    /// Discriminator map from short keys to type identifiers
    pub fn discriminator_map(&self) -> &IndexMap<String, DocumentName> {
        &self.discriminator_map
    }

    /// Custom repository type, if configured
    pub fn custom_repository_class_name(&self) -> Option<&DocumentName> {
        self.custom_repository_class_name.as_ref()
    }

    /// All mapping records, in insertion order
    pub fn field_mappings(&self) -> &IndexMap<String, FieldMapping> {
        &self.field_mappings
    }

    /// Get one mapping record, failing when the field was never mapped
    pub fn field_mapping(&self, field: &str) -> Result<&FieldMapping> {
        self.field_mappings
            .get(field)
            .ok_or_else(|| MappingError::FieldNotMapped {
                document: self.name.to_string(),
                field: field.to_string(),
            })
    }

    /// Check whether a field mapping exists
    pub fn has_field_mapping(&self, field: &str) -> bool {
        self.field_mappings.contains_key(field)
    }

    /// Association records only: the embed/reference subset of
    /// [`field_mappings`](Self::field_mappings), same order
    pub fn association_mappings(&self) -> impl Iterator<Item = &FieldMapping> {
        self.field_mappings.values().filter(|m| m.is_association())
    }

    /// Whether the given mapped field is nullable; false when unmapped
    pub fn is_nullable(&self, field: &str) -> bool {
        self.field_mappings
            .get(field)
            .map(|m| m.nullable)
            .unwrap_or(false)
    }

    /// Normalized shard key
    pub fn shard_key(&self) -> &ShardKey {
        &self.shard_key
    }

    /// Check whether a shard key is configured
    pub fn is_sharded(&self) -> bool {
        !self.shard_key.is_empty()
    }

    /// Capped-collection flag
    pub fn collection_capped(&self) -> bool {
        self.collection_capped
    }

    /// Capped collection size in bytes
    pub fn collection_size(&self) -> Option<i64> {
        self.collection_size
    }

    /// Capped collection document limit
    pub fn collection_max(&self) -> Option<i64> {
        self.collection_max
    }

    // =========================================================================
    // Reflection cache
    // =========================================================================

    /// Introspection handles for all mapped fields, keyed by field name
    ///
    /// Built lazily on first access and cached; every `map_*` call
    /// invalidates the cache. Fields the introspector cannot locate (an
    /// association not backed by a declared property) are simply absent
    /// from the result.
    pub fn reflection_properties(&self) -> IndexMap<String, PropertyHandle> {
        {
            let guard = self.reflection.read();
            if let Some(handles) = guard.as_ref() {
                return handles.clone();
            }
        }
        let handles = self.build_reflection();
        *self.reflection.write() = Some(handles.clone());
        handles
    }

    /// Drop and rebuild the handle cache eagerly (restore path)
    pub(crate) fn rebuild_reflection(&self) {
        *self.reflection.write() = Some(self.build_reflection());
    }

    fn build_reflection(&self) -> IndexMap<String, PropertyHandle> {
        let mut handles = IndexMap::new();
        for field in self.field_mappings.keys() {
            if let Some(handle) = self.introspector.property(&self.name, field) {
                handles.insert(field.clone(), handle);
            }
        }
        handles
    }

    /// The introspector this metadata validates and rebuilds against
    pub fn introspector(&self) -> &Arc<dyn FieldIntrospector> {
        &self.introspector
    }
}

impl fmt::Debug for ClassMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassMetadata")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("collection", &self.collection)
            .field("root_document_name", &self.root_document_name)
            .field("parent_classes", &self.parent_classes)
            .field("sub_classes", &self.sub_classes)
            .field("inheritance_type", &self.inheritance_type)
            .field("kind", &self.kind)
            .field("identifier", &self.identifier)
            .field("discriminator_field", &self.discriminator_field)
            .field("discriminator_value", &self.discriminator_value)
            .field("discriminator_map", &self.discriminator_map)
            .field(
                "custom_repository_class_name",
                &self.custom_repository_class_name,
            )
            .field("field_mappings", &self.field_mappings)
            .field("shard_key", &self.shard_key)
            .field("collection_capped", &self.collection_capped)
            .field("collection_size", &self.collection_size)
            .field("collection_max", &self.collection_max)
            .finish_non_exhaustive()
    }
}
