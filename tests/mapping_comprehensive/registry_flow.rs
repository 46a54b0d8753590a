//! Registry and durable cache flows

use crate::common::catalog;
use docmap::{
    AssociationSpec, DocumentName, FieldSpec, FileCache, MetadataCache, MetadataRegistry,
};
use std::sync::Arc;

#[test]
fn registry_publishes_resolved_metadata() {
    let registry = MetadataRegistry::new(catalog());
    let metadata = registry
        .metadata_for("Documents::CmsUser", |cm| {
            cm.set_parent_classes(["UserParent"]);
            cm.map_field(FieldSpec::new("username"))?;
            cm.map_one_embedded(AssociationSpec::new("phonenumbers").target("Bar"))
        })
        .unwrap();

    assert_eq!(
        metadata.root_document_name(),
        &DocumentName::new("Documents::UserParent")
    );
    assert_eq!(
        metadata.field_mapping("phonenumbers").unwrap().target_document,
        Some(DocumentName::new("Documents::Bar"))
    );
    assert!(registry.contains(&DocumentName::new("Documents::CmsUser")));
}

#[test]
fn file_cache_warms_a_second_registry() {
    let dir = tempfile::tempdir().unwrap();
    let cache: Arc<dyn MetadataCache> = Arc::new(FileCache::new(dir.path()).unwrap());

    // First process: build and persist
    let cold = MetadataRegistry::with_cache(catalog(), cache.clone());
    cold.metadata_for("Documents::CmsUser", |cm| {
        cm.set_subclasses(["One"]);
        cm.map_field(FieldSpec::new("username").nullable(true))?;
        cm.map_one_embedded(AssociationSpec::new("phonenumbers").target("Bar"))
    })
    .unwrap();

    // Second process: same cache directory, builder must not run
    let warm = MetadataRegistry::with_cache(catalog(), cache);
    let restored = warm
        .metadata_for("Documents::CmsUser", |_| {
            panic!("builder must not run on a warm cache")
        })
        .unwrap();

    assert!(restored.is_nullable("username"));
    assert_eq!(restored.sub_classes(), [DocumentName::new("Documents::One")]);
    assert_eq!(
        restored.field_mapping("phonenumbers").unwrap().target_document,
        Some(DocumentName::new("Documents::Bar"))
    );
    assert!(!restored.reflection_properties().is_empty());
}

#[test]
fn failed_build_leaves_registry_and_cache_empty() {
    let dir = tempfile::tempdir().unwrap();
    let file_cache = Arc::new(FileCache::new(dir.path()).unwrap());
    let registry = MetadataRegistry::with_cache(catalog(), file_cache.clone());

    let name = DocumentName::new("Documents::CmsUser");
    let result = registry.metadata_for(name.clone(), |cm| {
        cm.map_field(FieldSpec::new("no_such_field"))
    });

    assert!(result.is_err());
    assert!(!registry.contains(&name));
    assert!(file_cache.load(&name).unwrap().is_none());
}
