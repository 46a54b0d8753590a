//! Build → snapshot → restore lifecycle

use crate::common::catalog;
use docmap::{
    AssociationSpec, ClassMetadata, DocumentName, FieldSpec, InheritanceType, MetadataSnapshot,
};

// ============================================================================
// Full build + restore, mirroring a complete mapped document
// ============================================================================

#[test]
fn full_metadata_survives_snapshot_and_restore() {
    let catalog = catalog();
    let mut cm = ClassMetadata::new("Documents::CmsUser", catalog.clone());

    // Initial state
    assert!(cm.reflection_properties().is_empty());
    assert_eq!(cm.name(), &DocumentName::new("Documents::CmsUser"));
    assert_eq!(cm.root_document_name(), &DocumentName::new("Documents::CmsUser"));
    assert!(cm.sub_classes().is_empty());
    assert!(cm.parent_classes().is_empty());
    assert_eq!(cm.inheritance_type(), InheritanceType::None);

    // Customize state
    cm.set_inheritance_type(InheritanceType::SingleCollection);
    cm.set_subclasses(["One", "Two", "Three"]);
    cm.set_parent_classes(["UserParent"]);
    cm.set_custom_repository_class("UserRepository");
    cm.set_discriminator_field("disc").unwrap();
    cm.map_one_embedded(AssociationSpec::new("phonenumbers").target("Bar"))
        .unwrap();
    cm.set_shard_key(vec![("_id", "1")]).unwrap();
    cm.set_collection_capped(true);
    cm.set_collection_max(1000);
    cm.set_collection_size(500);

    assert!(cm.field_mapping("phonenumbers").is_ok());
    assert_eq!(cm.field_mappings().len(), 1);
    assert_eq!(cm.association_mappings().count(), 1);

    // Snapshot + restore in place of a serialize/unserialize cycle
    let bytes = cm.snapshot().to_bytes().unwrap();
    let cm = ClassMetadata::restore(MetadataSnapshot::from_bytes(&bytes).unwrap(), catalog);

    // Check state
    assert!(!cm.reflection_properties().is_empty());
    assert_eq!(cm.namespace(), "Documents");
    assert_eq!(cm.name(), &DocumentName::new("Documents::CmsUser"));
    assert_eq!(
        cm.root_document_name(),
        &DocumentName::new("Documents::UserParent")
    );
    assert_eq!(
        cm.sub_classes(),
        [
            DocumentName::new("Documents::One"),
            DocumentName::new("Documents::Two"),
            DocumentName::new("Documents::Three"),
        ]
    );
    assert_eq!(cm.parent_classes(), [DocumentName::new("Documents::UserParent")]);
    assert_eq!(
        cm.custom_repository_class_name(),
        Some(&DocumentName::new("Documents::UserRepository"))
    );
    assert_eq!(cm.discriminator_field(), Some("disc"));
    assert_eq!(cm.field_mappings().len(), 1);
    assert_eq!(cm.association_mappings().count(), 1);

    let shard = cm.shard_key();
    assert_eq!(shard.keys.get("_id"), Some(&1));
    assert!(shard.options.is_empty());

    let mapping = cm.field_mapping("phonenumbers").unwrap();
    assert_eq!(mapping.target_document, Some(DocumentName::new("Documents::Bar")));

    assert!(cm.collection_capped());
    assert_eq!(cm.collection_max(), Some(1000));
    assert_eq!(cm.collection_size(), Some(500));
}

// ============================================================================
// End-to-end qualification scenario
// ============================================================================

#[test]
fn bare_names_qualify_against_owning_namespace_on_restore() {
    let catalog = catalog();
    let mut cm = ClassMetadata::new("NS::A", catalog.clone());

    cm.set_parent_classes(["P"]);
    cm.set_subclasses(["S1", "S2"]);
    cm.map_one_embedded(AssociationSpec::new("f").target("T")).unwrap();

    let bytes = cm.snapshot().to_bytes().unwrap();
    let restored =
        ClassMetadata::restore(MetadataSnapshot::from_bytes(&bytes).unwrap(), catalog);

    assert_eq!(restored.root_document_name(), &DocumentName::new("NS::P"));
    assert_eq!(
        restored.sub_classes(),
        [DocumentName::new("NS::S1"), DocumentName::new("NS::S2")]
    );
    assert_eq!(
        restored.field_mapping("f").unwrap().target_document,
        Some(DocumentName::new("NS::T"))
    );
}

#[test]
fn restored_metadata_matches_resolved_original() {
    let catalog = catalog();
    let mut cm = ClassMetadata::new("NS::A", catalog.clone());
    cm.set_parent_classes(["P"]);
    cm.map_one_embedded(AssociationSpec::new("f").target("T")).unwrap();

    let restored = ClassMetadata::restore(cm.snapshot(), catalog);
    cm.resolve();

    // Restore performs exactly one resolution pass over the snapshot
    assert_eq!(restored.snapshot(), cm.snapshot());
}

// ============================================================================
// Reflection handle lifecycle
// ============================================================================

#[test]
fn reflection_handles_are_transient() {
    let catalog = catalog();
    let mut cm = ClassMetadata::new("Documents::CmsUser", catalog.clone());
    cm.map_field(FieldSpec::new("username")).unwrap();
    cm.map_field(FieldSpec::new("name")).unwrap();

    // Handles exist before the snapshot...
    assert_eq!(cm.reflection_properties().len(), 2);

    // ...are not part of the snapshot bytes, and come back after restore
    let restored = ClassMetadata::restore(cm.snapshot(), catalog);
    let handles = restored.reflection_properties();
    assert_eq!(handles.len(), 2);
    assert_eq!(
        handles["name"].declared_by(),
        &DocumentName::new("Documents::Person")
    );
}
