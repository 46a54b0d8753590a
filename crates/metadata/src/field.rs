//! Field and association mapping records
//!
//! A [`FieldMapping`] describes how one declared field of a document type
//! is stored: its storage key, type tag, nullability, and (for
//! associations) the target document and owning/inverse role. Records are
//! built by the `ClassMetadata` mutation API from the spec structs defined
//! here and are immutable once inserted.

use docmap_core::DocumentName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of a mapping record
///
/// Scalars carry an arbitrary type name ("string", "int", ...); association
/// records carry their cardinality instead. Serialized as a plain string so
/// the snapshot shape stays flat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MappingType {
    /// To-one association
    One,
    /// To-many association
    Many,
    /// Scalar field with a named type tag
    Scalar(String),
}

impl MappingType {
    /// Get the textual tag for this type
    pub fn as_str(&self) -> &str {
        match self {
            MappingType::One => "one",
            MappingType::Many => "many",
            MappingType::Scalar(tag) => tag,
        }
    }

    /// Check whether this is a to-many tag
    pub fn is_many(&self) -> bool {
        matches!(self, MappingType::Many)
    }
}

impl From<String> for MappingType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "one" => MappingType::One,
            "many" => MappingType::Many,
            _ => MappingType::Scalar(tag),
        }
    }
}

impl From<&str> for MappingType {
    fn from(tag: &str) -> Self {
        MappingType::from(tag.to_string())
    }
}

impl From<MappingType> for String {
    fn from(t: MappingType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for MappingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of a mapping record
///
/// Embed and Reference are the association kinds; Field is a plain scalar.
/// The three are mutually exclusive per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MappingKind {
    /// Plain scalar field stored inline
    Field,
    /// Sub-document physically nested inside the parent document
    Embed,
    /// Link stored as an identifier of a separately stored document
    Reference,
}

/// Description of one mapped field or association
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Declared field name on the program type
    pub field_name: String,
    /// Key the value is stored under in the document
    pub storage_key: String,
    /// Type tag: scalar name or association cardinality
    pub mapping_type: MappingType,
    /// Scalar / embed / reference discriminant
    pub kind: MappingKind,
    /// Whether the stored value may be null
    pub nullable: bool,
    /// Target document type for associations; qualified by resolution
    pub target_document: Option<DocumentName>,
    /// Field on the target that owns this association (inverse side)
    pub mapped_by: Option<String>,
    /// Field on the target this owning side is inversed by
    pub inversed_by: Option<String>,
}

impl FieldMapping {
    /// Check whether this record describes an association
    pub fn is_association(&self) -> bool {
        !matches!(self.kind, MappingKind::Field)
    }

    /// Check whether this record describes an embedded association
    pub fn is_embedded(&self) -> bool {
        matches!(self.kind, MappingKind::Embed)
    }

    /// Check whether this record describes a referenced association
    pub fn is_reference(&self) -> bool {
        matches!(self.kind, MappingKind::Reference)
    }

    /// Check whether this record is the owning side of a bidirectional
    /// association (`inversed_by` present)
    pub fn is_owning_side(&self) -> bool {
        self.inversed_by.is_some()
    }

    /// Check whether this record is the inverse side of a bidirectional
    /// association (`mapped_by` present)
    pub fn is_inverse_side(&self) -> bool {
        self.mapped_by.is_some()
    }
}

/// Raw spec for a scalar field mapping
///
/// Stands in for the raw mapping dictionary an annotation/config reader
/// would produce. Absent values take the documented defaults when the
/// record is built: type tag "string", storage key equal to the field
/// name, not nullable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSpec {
    /// Declared field name
    pub field_name: String,
    /// Scalar type tag; defaults to "string"
    pub mapping_type: Option<MappingType>,
    /// Storage key; defaults to the field name
    pub storage_key: Option<String>,
    /// Nullability; defaults to false
    pub nullable: Option<bool>,
    /// Whether this field is the document identifier
    pub id: bool,
}

impl FieldSpec {
    /// Create a spec for the given field name
    pub fn new(field_name: impl Into<String>) -> Self {
        FieldSpec {
            field_name: field_name.into(),
            ..FieldSpec::default()
        }
    }

    /// Set the scalar type tag
    pub fn with_type(mut self, tag: impl Into<MappingType>) -> Self {
        self.mapping_type = Some(tag.into());
        self
    }

    /// Set the storage key
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Set nullability
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Mark this field as the document identifier
    pub fn id(mut self) -> Self {
        self.id = true;
        self
    }
}

/// Raw spec for an embed or reference mapping
///
/// Cardinality comes from the mutation method (`map_one_*` / `map_many_*`),
/// not from the spec.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssociationSpec {
    /// Declared field name
    pub field_name: String,
    /// Target document type; may be bare, qualified by resolution
    pub target_document: Option<DocumentName>,
    /// Storage key; defaults to the field name
    pub storage_key: Option<String>,
    /// Nullability; defaults to false
    pub nullable: Option<bool>,
    /// Marks this record the inverse side
    pub mapped_by: Option<String>,
    /// Marks this record the owning side
    pub inversed_by: Option<String>,
}

impl AssociationSpec {
    /// Create a spec for the given field name
    pub fn new(field_name: impl Into<String>) -> Self {
        AssociationSpec {
            field_name: field_name.into(),
            ..AssociationSpec::default()
        }
    }

    /// Set the target document type
    pub fn target(mut self, target: impl Into<DocumentName>) -> Self {
        self.target_document = Some(target.into());
        self
    }

    /// Set the storage key
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = Some(key.into());
        self
    }

    /// Set nullability
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }

    /// Mark the inverse side: the given field on the target owns the link
    pub fn mapped_by(mut self, field: impl Into<String>) -> Self {
        self.mapped_by = Some(field.into());
        self
    }

    /// Mark the owning side: the given field on the target mirrors the link
    pub fn inversed_by(mut self, field: impl Into<String>) -> Self {
        self.inversed_by = Some(field.into());
        self
    }
}
