//! Field introspection capability
//!
//! The metadata core needs to know which fields a program type declares,
//! both to validate `map_field` targets and to hand hydration layers a
//! per-field handle. Runtime reflection is not portable across process
//! boundaries, so introspection is modeled as a capability trait
//! ([`FieldIntrospector`]) and the handles it produces
//! ([`PropertyHandle`]) are deliberately not serializable: they are
//! excluded from snapshots and rebuilt on demand after restore.
//!
//! [`TypeCatalog`] is the provided implementation: an in-process registry
//! of type descriptors populated by whatever front-end reads the mapping
//! source (attribute reader, config loader, derive macro output).

use dashmap::DashMap;
use docmap_core::DocumentName;

/// Upper bound on ancestor-chain walks, guards against descriptor cycles
const MAX_HIERARCHY_DEPTH: usize = 64;

/// Introspection handle for one declared field
///
/// Intentionally carries no serde implementations: handles are transient
/// and must be regenerated through a [`FieldIntrospector`] after a
/// snapshot/restore cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyHandle {
    declared_by: DocumentName,
    field_name: String,
}

impl PropertyHandle {
    /// Create a handle for a field declared on the given type
    pub fn new(declared_by: DocumentName, field_name: impl Into<String>) -> Self {
        PropertyHandle {
            declared_by,
            field_name: field_name.into(),
        }
    }

    /// Type that declares the field (may be an ancestor of the mapped type)
    pub fn declared_by(&self) -> &DocumentName {
        &self.declared_by
    }

    /// Declared field name
    pub fn field_name(&self) -> &str {
        &self.field_name
    }
}

/// Capability exposing the declared fields of mapped types
///
/// Thread safety: shared behind `Arc` between the registry and every
/// metadata instance, so implementations must be `Send + Sync`.
pub trait FieldIntrospector: Send + Sync {
    /// Fields declared directly on `document`, in declaration order
    ///
    /// Returns None when the type is unknown to this introspector.
    fn own_fields(&self, document: &DocumentName) -> Option<Vec<String>>;

    /// Direct parent of `document` in the type hierarchy, if any
    fn parent_of(&self, document: &DocumentName) -> Option<DocumentName>;

    /// Check whether `document` or any ancestor declares `field`
    fn has_field(&self, document: &DocumentName, field: &str) -> bool {
        self.property(document, field).is_some()
    }

    /// Produce a handle for `field`, searching `document` and its ancestors
    fn property(&self, document: &DocumentName, field: &str) -> Option<PropertyHandle> {
        let mut current = document.clone();
        for _ in 0..MAX_HIERARCHY_DEPTH {
            if let Some(fields) = self.own_fields(&current) {
                if fields.iter().any(|f| f == field) {
                    return Some(PropertyHandle::new(current, field));
                }
            }
            match self.parent_of(&current) {
                Some(parent) => current = parent,
                None => return None,
            }
        }
        None
    }
}

/// Descriptor of one type's declared fields and parent link
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    name: DocumentName,
    parent: Option<DocumentName>,
    fields: Vec<String>,
}

impl TypeDescriptor {
    /// Start a descriptor for the given type
    pub fn new(name: impl Into<DocumentName>) -> Self {
        TypeDescriptor {
            name: name.into(),
            parent: None,
            fields: Vec::new(),
        }
    }

    /// Declare the parent type
    pub fn extends(mut self, parent: impl Into<DocumentName>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Declare one field
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Declare several fields at once
    pub fn fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(names.into_iter().map(Into::into));
        self
    }
}

struct TypeEntry {
    parent: Option<DocumentName>,
    fields: Vec<String>,
}

/// In-process registry of type descriptors
///
/// Concurrent registration and lookup are both lock-free reads on the
/// sharded map; the catalog is shared as `Arc<TypeCatalog>`.
#[derive(Default)]
pub struct TypeCatalog {
    types: DashMap<DocumentName, TypeEntry>,
}

impl TypeCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        TypeCatalog::default()
    }

    /// Register (or replace) a type descriptor
    pub fn register(&self, descriptor: TypeDescriptor) {
        self.types.insert(
            descriptor.name,
            TypeEntry {
                parent: descriptor.parent,
                fields: descriptor.fields,
            },
        );
    }

    /// Check whether a type has been registered
    pub fn is_registered(&self, document: &DocumentName) -> bool {
        self.types.contains_key(document)
    }
}

impl FieldIntrospector for TypeCatalog {
    fn own_fields(&self, document: &DocumentName) -> Option<Vec<String>> {
        self.types.get(document).map(|entry| entry.fields.clone())
    }

    fn parent_of(&self, document: &DocumentName) -> Option<DocumentName> {
        self.types.get(document).and_then(|entry| entry.parent.clone())
    }
}
