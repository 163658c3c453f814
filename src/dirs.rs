//! Directory resolution abstraction for platform-specific paths.
//!
//! Wraps `directories-next` behind a trait so tests can substitute fixed
//! paths for the platform cache directory.

use std::path::PathBuf;

/// Provides platform-specific base directories.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// The default root for the local tool cache, or `None` when the
    /// platform cache directory cannot be determined.
    fn tool_cache_dir(&self) -> Option<PathBuf>;

    /// The root under which temporary download and extraction directories
    /// are created.
    fn temp_root(&self) -> PathBuf;
}

/// Production implementation backed by `directories-next`.
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn tool_cache_dir(&self) -> Option<PathBuf> {
        directories_next::ProjectDirs::from("", "", "flutter-installer")
            .map(|dirs| dirs.cache_dir().join("tool-cache"))
    }

    fn temp_root(&self) -> PathBuf {
        std::env::temp_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_cache_dir_ends_with_registry_segment() {
        let dirs = SystemBaseDirs;
        if let Some(path) = dirs.tool_cache_dir() {
            assert!(path.ends_with("tool-cache"));
        }
    }

    #[test]
    fn temp_root_exists() {
        let dirs = SystemBaseDirs;
        assert!(dirs.temp_root().exists());
    }
}
