//! Shared fixtures for the comprehensive suite

use docmap::{FieldIntrospector, TypeCatalog, TypeDescriptor};
use std::sync::Arc;

/// Catalog describing the document types the suite maps
pub fn catalog() -> Arc<dyn FieldIntrospector> {
    let catalog = TypeCatalog::new();
    catalog.register(TypeDescriptor::new("Documents::Person").fields(["id", "name"]));
    catalog.register(
        TypeDescriptor::new("Documents::CmsUser")
            .extends("Documents::Person")
            .fields(["username", "status", "phonenumbers", "articles"]),
    );
    catalog.register(TypeDescriptor::new("NS::A").fields(["id", "f"]));
    Arc::new(catalog)
}
