//! Error types for the mapping metadata engine
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations.
//!
//! Every variant except `Io`/`Encoding` is a configuration error: it is
//! fatal to the build operation that triggered it and is never retried. A
//! metadata instance that failed a mutation call is unusable by convention.

use std::io;
use thiserror::Error;

/// Result type alias for mapping operations
pub type Result<T> = std::result::Result<T, MappingError>;

/// Error types for mapping metadata construction and lookup
#[derive(Debug, Error)]
pub enum MappingError {
    /// A read accessor was asked for a field mapping that was never registered
    #[error("document '{document}' has no mapped field '{field}'")]
    FieldNotMapped {
        /// Owning document type
        document: String,
        /// Requested field name
        field: String,
    },

    /// `map_field` targeted a field that introspection cannot find on the
    /// type or any of its ancestors
    #[error("field '{field}' does not exist on '{document}' or any ancestor")]
    UnknownField {
        /// Owning document type
        document: String,
        /// Unknown field name
        field: String,
    },

    /// The discriminator field name collides with a mapped field name
    /// (reported by whichever operation happens second)
    #[error("field '{field}' on '{document}' conflicts with the discriminator field")]
    DiscriminatorFieldConflict {
        /// Owning document type
        document: String,
        /// Conflicting name
        field: String,
    },

    /// An embed/reference mapping was declared without a target document
    #[error("association '{field}' on '{document}' requires a target document")]
    MissingTargetDocument {
        /// Owning document type
        document: String,
        /// Association field name
        field: String,
    },

    /// A shard key direction that is not 1 or -1 (integer or string form)
    #[error("invalid shard key direction '{value}' for field '{field}' (expected 1 or -1)")]
    InvalidShardKey {
        /// Shard key field
        field: String,
        /// Offending direction value
        value: String,
    },

    /// I/O error from the durable metadata cache
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Snapshot encode/decode error
    #[error("snapshot encoding error: {0}")]
    Encoding(String),
}

impl From<bincode::Error> for MappingError {
    fn from(e: bincode::Error) -> Self {
        MappingError::Encoding(e.to_string())
    }
}

impl MappingError {
    /// Check whether this is a configuration error (as opposed to a cache
    /// I/O or encoding failure)
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, MappingError::Io(_) | MappingError::Encoding(_))
    }
}
