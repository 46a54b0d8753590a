//! Process-wide metadata registry
//!
//! The registry caches one published [`ClassMetadata`] per document type
//! with construct-once semantics: the registry lock is held across the
//! build, so at most one builder runs per type and later callers get the
//! already-published instance. Before invoking the builder it consults an
//! optional durable [`MetadataCache`] of encoded snapshots, which lets a
//! warm process skip the mapping-source read entirely.
//!
//! The registry is an explicit injected service, not a process global:
//! construct it where the rest of the persistence layer is wired and pass
//! it down.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cache;

pub use cache::{FileCache, MemoryCache, MetadataCache};

use docmap_core::{DocumentName, Result};
use docmap_metadata::{ClassMetadata, FieldIntrospector, MetadataSnapshot};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache of published metadata instances, one per document type
pub struct MetadataRegistry {
    introspector: Arc<dyn FieldIntrospector>,
    durable: Option<Arc<dyn MetadataCache>>,
    loaded: Mutex<HashMap<DocumentName, Arc<ClassMetadata>>>,
}

impl MetadataRegistry {
    /// Create a registry without a durable cache
    pub fn new(introspector: Arc<dyn FieldIntrospector>) -> Self {
        MetadataRegistry {
            introspector,
            durable: None,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Create a registry backed by a durable snapshot cache
    pub fn with_cache(
        introspector: Arc<dyn FieldIntrospector>,
        cache: Arc<dyn MetadataCache>,
    ) -> Self {
        MetadataRegistry {
            introspector,
            durable: Some(cache),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Get published metadata, building it on first request
    ///
    /// Resolution order: published instance, durable cache (restored),
    /// fresh build via `build`. A fresh build is resolved and its
    /// snapshot written back to the durable cache before publication.
    /// If `build` fails nothing is published; there is no
    /// partial-success state.
    ///
    /// Cache failures are never fatal here: a corrupt or unreadable
    /// snapshot falls back to a fresh build, and a failed write-back
    /// leaves the published instance intact.
    pub fn metadata_for<N, F>(&self, name: N, build: F) -> Result<Arc<ClassMetadata>>
    where
        N: Into<DocumentName>,
        F: FnOnce(&mut ClassMetadata) -> Result<()>,
    {
        let name = name.into();
        let mut loaded = self.loaded.lock();
        if let Some(existing) = loaded.get(&name) {
            return Ok(existing.clone());
        }

        if let Some(cache) = &self.durable {
            match cache.load(&name) {
                Ok(Some(bytes)) => match MetadataSnapshot::from_bytes(&bytes) {
                    Ok(snapshot) => {
                        debug!(document = %name, "metadata restored from durable cache");
                        let restored = Arc::new(ClassMetadata::restore(
                            snapshot,
                            self.introspector.clone(),
                        ));
                        loaded.insert(name, restored.clone());
                        return Ok(restored);
                    }
                    Err(err) => {
                        warn!(document = %name, error = %err, "cached snapshot is corrupt, rebuilding");
                    }
                },
                Ok(None) => {}
                Err(err) => {
                    warn!(document = %name, error = %err, "durable cache read failed, rebuilding");
                }
            }
        }

        debug!(document = %name, "building metadata");
        let mut metadata = ClassMetadata::new(name.clone(), self.introspector.clone());
        build(&mut metadata)?;
        metadata.resolve();

        if let Some(cache) = &self.durable {
            match metadata.snapshot().to_bytes() {
                Ok(bytes) => {
                    if let Err(err) = cache.store(&name, &bytes) {
                        warn!(document = %name, error = %err, "durable cache write failed");
                    }
                }
                Err(err) => {
                    warn!(document = %name, error = %err, "snapshot encoding failed, not cached");
                }
            }
        }

        let metadata = Arc::new(metadata);
        loaded.insert(name, metadata.clone());
        Ok(metadata)
    }

    /// Get published metadata without building
    pub fn get(&self, name: &DocumentName) -> Option<Arc<ClassMetadata>> {
        self.loaded.lock().get(name).cloned()
    }

    /// Check whether metadata for a type has been published
    pub fn contains(&self, name: &DocumentName) -> bool {
        self.loaded.lock().contains_key(name)
    }

    /// Number of published metadata instances
    pub fn len(&self) -> usize {
        self.loaded.lock().len()
    }

    /// Check whether no metadata has been published yet
    pub fn is_empty(&self) -> bool {
        self.loaded.lock().is_empty()
    }
}
