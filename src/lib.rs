//! Flutter installer library.
//!
//! This crate provides the core functionality for resolving, downloading,
//! caching, and publishing Flutter SDK releases on a build agent. It is used
//! by the `flutter-installer` CLI binary and can be consumed programmatically
//! for testing or custom install workflows.
//!
//! # Modules
//!
//! - [`cache`] - On-disk tool cache keyed by (name, version, architecture)
//! - [`cli`] - Command-line argument definitions
//! - [`dirs`] - Directory resolution abstraction for platform-specific paths
//! - [`download`] - HTTP retrieval of release manifests and SDK archives
//! - [`error`] - Semantic error types, one variant per failure mode
//! - [`extraction`] - Zip and tar archive extraction
//! - [`installer`] - End-to-end install orchestration
//! - [`manifest`] - Release manifest schema and release selection
//! - [`output`] - Progress output and tool-path publication formatting
//! - [`platform`] - Host platform to manifest architecture key mapping

pub mod cache;
pub mod cli;
pub mod dirs;
pub mod download;
pub mod error;
pub mod extraction;
pub mod installer;
pub mod manifest;
pub mod output;
pub mod platform;
