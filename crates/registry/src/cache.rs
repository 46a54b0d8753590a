//! Durable metadata cache
//!
//! An opaque key-value store for encoded metadata snapshots, keyed by
//! document type. The registry consults it before building metadata so
//! that a later process can skip the mapping-source read entirely. The
//! payload is whatever `MetadataSnapshot::to_bytes` produced; the cache
//! never interprets it.

use docmap_core::{DocumentName, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key-value store for encoded metadata snapshots
pub trait MetadataCache: Send + Sync {
    /// Load the encoded snapshot for a type, None when absent
    fn load(&self, name: &DocumentName) -> Result<Option<Vec<u8>>>;

    /// Store the encoded snapshot for a type, replacing any earlier entry
    fn store(&self, name: &DocumentName, bytes: &[u8]) -> Result<()>;
}

/// In-process cache, useful for tests and single-process deployments
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        MemoryCache::default()
    }

    /// Number of cached snapshots
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl MetadataCache for MemoryCache {
    fn load(&self, name: &DocumentName) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.lock().get(name.as_str()).cloned())
    }

    fn store(&self, name: &DocumentName, bytes: &[u8]) -> Result<()> {
        self.entries
            .lock()
            .insert(name.as_str().to_string(), bytes.to_vec());
        Ok(())
    }
}

/// File-backed cache: one snapshot file per type under a directory
///
/// Namespace separators are mapped to dots in file names, so
/// `Documents::CmsUser` lands in `Documents.CmsUser.meta`.
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (and create if needed) a cache directory
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileCache { dir })
    }

    /// Directory this cache writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, name: &DocumentName) -> PathBuf {
        let file_name = name.as_str().replace("::", ".");
        self.dir.join(format!("{}.meta", file_name))
    }
}

impl MetadataCache for FileCache {
    fn load(&self, name: &DocumentName) -> Result<Option<Vec<u8>>> {
        match fs::read(self.file_for(name)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn store(&self, name: &DocumentName, bytes: &[u8]) -> Result<()> {
        fs::write(self.file_for(name), bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_cache_round_trip() {
        let cache = MemoryCache::new();
        let name = DocumentName::new("Documents::CmsUser");

        assert!(cache.load(&name).unwrap().is_none());
        cache.store(&name, b"snapshot-bytes").unwrap();
        assert_eq!(cache.load(&name).unwrap().as_deref(), Some(&b"snapshot-bytes"[..]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_memory_cache_store_replaces() {
        let cache = MemoryCache::new();
        let name = DocumentName::new("Documents::CmsUser");

        cache.store(&name, b"first").unwrap();
        cache.store(&name, b"second").unwrap();
        assert_eq!(cache.load(&name).unwrap().as_deref(), Some(&b"second"[..]));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_file_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileCache::new(dir.path()).unwrap();
        let name = DocumentName::new("Documents::CmsUser");

        assert!(cache.load(&name).unwrap().is_none());
        cache.store(&name, b"snapshot-bytes").unwrap();
        assert_eq!(cache.load(&name).unwrap().as_deref(), Some(&b"snapshot-bytes"[..]));

        // Separator maps to a dot in the file name
        assert!(dir.path().join("Documents.CmsUser.meta").exists());
    }

    #[test]
    fn test_file_cache_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let name = DocumentName::new("Documents::CmsUser");

        {
            let cache = FileCache::new(dir.path()).unwrap();
            cache.store(&name, b"persisted").unwrap();
        }

        let reopened = FileCache::new(dir.path()).unwrap();
        assert_eq!(reopened.load(&name).unwrap().as_deref(), Some(&b"persisted"[..]));
    }

    #[test]
    fn test_file_cache_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("meta").join("cache");
        let cache = FileCache::new(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(cache.dir(), nested.as_path());
    }
}
