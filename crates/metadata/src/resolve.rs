//! Namespace resolution pass
//!
//! Raw mapping input may carry bare type identifiers for parents,
//! subclasses, discriminator targets, association targets and the custom
//! repository. The resolution pass qualifies all of them against the
//! owning class's namespace, exactly once, and recomputes the root
//! document name. It runs after the build phase and again after every
//! snapshot restore.
//!
//! Qualification is idempotent: an identifier that already carries a
//! separator is left unchanged, so running the pass twice is harmless.

use crate::class_metadata::ClassMetadata;
use tracing::trace;

impl ClassMetadata {
    /// Qualify every reachable bare identifier and recompute derived state
    pub fn resolve(&mut self) {
        trace!(document = %self.name, "resolving metadata");

        if let Some(repository) = self.custom_repository_class_name.take() {
            self.custom_repository_class_name = Some(repository.qualified_in(&self.namespace));
        }

        for parent in &mut self.parent_classes {
            *parent = parent.qualified_in(&self.namespace);
        }
        for subclass in &mut self.sub_classes {
            *subclass = subclass.qualified_in(&self.namespace);
        }

        self.root_document_name = match self.parent_classes.first() {
            Some(first_ancestor) => first_ancestor.clone(),
            None => self.name.clone(),
        };

        for target in self.discriminator_map.values_mut() {
            *target = target.qualified_in(&self.namespace);
        }

        for mapping in self.field_mappings.values_mut() {
            if !mapping.is_association() {
                continue;
            }
            if let Some(target) = mapping.target_document.take() {
                mapping.target_document = Some(target.qualified_in(&self.namespace));
            }
        }
    }
}
