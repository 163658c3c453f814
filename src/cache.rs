//! On-disk tool cache keyed by (tool name, version, architecture).
//!
//! The cache is a plain directory registry: an entry for key
//! `(name, version, arch)` lives at `<root>/<name>/<version>/<arch>` and is
//! never mutated after creation. `store` copies the source tree into a
//! staged sibling directory and renames it into place, so a partially
//! copied entry is never visible under the final key. Eviction is managed
//! externally by the build agent.

use crate::error::Result;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Suffix for the staging directory used during [`CacheRegistry::store`].
const PARTIAL_SUFFIX: &str = ".partial";

/// Lookup and registration operations on the tool cache.
///
/// The install flow depends on this trait rather than [`ToolCache`]
/// directly so tests can substitute a misbehaving cache.
#[cfg_attr(test, mockall::automock)]
pub trait CacheRegistry {
    /// Look up a cached installation.
    ///
    /// Returns the entry directory when it exists, `None` otherwise. Lookup
    /// is a pure function of the key triple.
    fn find(&self, name: &str, version: &str, arch: &str) -> Option<Utf8PathBuf>;

    /// Register `source_dir` under the given key and return the entry path.
    ///
    /// When an entry already exists for the key, it is left untouched and
    /// its path is returned; cached entries are immutable.
    ///
    /// # Errors
    ///
    /// Returns an error if registering the source tree fails.
    fn store(
        &self,
        source_dir: &Utf8Path,
        name: &str,
        version: &str,
        arch: &str,
    ) -> Result<Utf8PathBuf>;
}

/// A local key-to-directory registry for installed tools.
#[derive(Debug, Clone)]
pub struct ToolCache {
    root: Utf8PathBuf,
}

impl ToolCache {
    /// Create a cache rooted at `root`. The directory is created lazily on
    /// first store.
    #[must_use]
    pub const fn new(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    /// Return the cache root directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Return the directory an entry for this key would occupy.
    #[must_use]
    pub fn entry_path(&self, name: &str, version: &str, arch: &str) -> Utf8PathBuf {
        self.root.join(name).join(version).join(arch)
    }
}

impl CacheRegistry for ToolCache {
    fn find(&self, name: &str, version: &str, arch: &str) -> Option<Utf8PathBuf> {
        let path = self.entry_path(name, version, arch);
        path.is_dir().then_some(path)
    }

    fn store(
        &self,
        source_dir: &Utf8Path,
        name: &str,
        version: &str,
        arch: &str,
    ) -> Result<Utf8PathBuf> {
        let entry = self.entry_path(name, version, arch);
        if entry.is_dir() {
            log::debug!("cache entry {entry} already present, keeping existing entry");
            return Ok(entry);
        }

        let staged = Utf8PathBuf::from(format!("{entry}{PARTIAL_SUFFIX}"));
        if staged.exists() {
            fs::remove_dir_all(&staged)?;
        }
        if let Some(parent) = entry.parent() {
            fs::create_dir_all(parent)?;
        }

        copy_dir_recursive(source_dir.as_std_path(), staged.as_std_path())?;
        fs::rename(&staged, &entry)?;
        log::debug!("stored cache entry {entry}");
        Ok(entry)
    }
}

/// Recursively copy a directory tree, preserving file permissions.
fn copy_dir_recursive(source: &std::path::Path, dest: &std::path::Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry_result in fs::read_dir(source)? {
        let entry = entry_result?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_recursive(&entry.path(), &target)?;
        } else {
            // fs::copy carries permission bits across, keeping tool
            // scripts executable.
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf8(path: &std::path::Path) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(path.to_path_buf()).expect("UTF-8 temp path")
    }

    fn sample_source(dir: &std::path::Path) -> Utf8PathBuf {
        let source = dir.join("extracted");
        std::fs::create_dir_all(source.join("flutter/bin")).expect("source dirs");
        std::fs::write(source.join("flutter/bin/flutter"), b"#!/bin/sh\n").expect("source file");
        utf8(&source)
    }

    #[test]
    fn find_misses_on_empty_cache() {
        let temp = tempfile::tempdir().expect("temp dir");
        let cache = ToolCache::new(utf8(temp.path()));
        assert!(cache.find("Flutter", "1.2.3", "linux").is_none());
    }

    #[test]
    fn store_then_find_returns_the_same_path() {
        let temp = tempfile::tempdir().expect("temp dir");
        let cache = ToolCache::new(utf8(temp.path()).join("cache"));
        let source = sample_source(temp.path());

        let stored = cache
            .store(&source, "Flutter", "1.2.3", "linux")
            .expect("store succeeds");
        let found = cache.find("Flutter", "1.2.3", "linux").expect("cache hit");
        assert_eq!(stored, found);
        assert!(found.join("flutter/bin/flutter").is_file());
        // Repeated lookups stay stable.
        assert_eq!(cache.find("Flutter", "1.2.3", "linux"), Some(found));
    }

    #[test]
    fn store_onto_existing_key_keeps_first_entry() {
        let temp = tempfile::tempdir().expect("temp dir");
        let cache = ToolCache::new(utf8(temp.path()).join("cache"));
        let source = sample_source(temp.path());
        cache
            .store(&source, "Flutter", "1.2.3", "linux")
            .expect("first store");

        let other = temp.path().join("other");
        std::fs::create_dir_all(&other).expect("other source");
        std::fs::write(other.join("marker"), b"second").expect("marker");
        let entry = cache
            .store(&utf8(&other), "Flutter", "1.2.3", "linux")
            .expect("second store");

        assert!(entry.join("flutter/bin/flutter").is_file());
        assert!(!entry.join("marker").exists());
    }

    #[test]
    fn keys_are_distinguished_by_every_component() {
        let temp = tempfile::tempdir().expect("temp dir");
        let cache = ToolCache::new(utf8(temp.path()).join("cache"));
        let source = sample_source(temp.path());
        cache
            .store(&source, "Flutter", "1.2.3", "linux")
            .expect("store");

        assert!(cache.find("Flutter", "1.2.3", "macos").is_none());
        assert!(cache.find("Flutter", "1.2.4", "linux").is_none());
        assert!(cache.find("Dart", "1.2.3", "linux").is_none());
    }

    #[test]
    fn no_partial_entry_remains_after_store() {
        let temp = tempfile::tempdir().expect("temp dir");
        let cache = ToolCache::new(utf8(temp.path()).join("cache"));
        let source = sample_source(temp.path());
        let entry = cache
            .store(&source, "Flutter", "1.2.3", "linux")
            .expect("store");

        let staged = Utf8PathBuf::from(format!("{entry}{PARTIAL_SUFFIX}"));
        assert!(!staged.exists());
    }
}
