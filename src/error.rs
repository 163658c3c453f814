//! Error types for the Flutter installer task.
//!
//! This module defines semantic error variants for every failure the install
//! flow can hit. No error is retried or recovered locally: each one aborts
//! the remaining steps and surfaces as a single task-level failure.

use thiserror::Error;

/// Errors that can occur during the installation process.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// A required task input was missing or empty.
    #[error("invalid input: {reason}")]
    Input {
        /// Description of the missing or malformed input.
        reason: String,
    },

    /// An HTTP request failed at the transport level.
    #[error("download failed for {url}: {reason}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The release manifest body was not valid JSON of the expected shape.
    #[error("invalid release manifest: {reason}")]
    Parse {
        /// Description of the parse error.
        reason: String,
    },

    /// No release record matched the requested channel and version.
    #[error("no release found for channel {channel}, version {version}")]
    Selection {
        /// The requested release channel.
        channel: String,
        /// The requested version (or the literal `latest`).
        version: String,
    },

    /// Archive extraction failed.
    #[error("extraction failed: {reason}")]
    Extract {
        /// Description of the extraction failure.
        reason: String,
    },

    /// The cache reported a miss immediately after a successful store.
    #[error("tool cache inconsistency: stored {name} {version} ({arch}) but lookup still misses")]
    CacheInconsistency {
        /// The cached tool name.
        name: String,
        /// The cached tool version.
        version: String,
        /// The cached architecture key.
        arch: String,
    },

    /// Publishing the resolved tool path failed.
    #[error("failed to publish tool path: {reason}")]
    Publish {
        /// Description of the publish failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
