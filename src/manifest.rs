//! Release manifest schema and release selection.
//!
//! The Flutter release index publishes one JSON manifest per architecture
//! key. The manifest carries a `current_release` table mapping each channel
//! to the hash of its newest build, an ordered list of release records, and
//! the base URL that archive paths are relative to.
//!
//! Selection returns [`Option`] rather than panicking on absent channels or
//! versions; the orchestrator converts `None` into a typed selection error
//! before any path construction happens.

use crate::error::{InstallerError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// A validated release channel name (e.g. `stable`, `beta`, `dev`).
///
/// # Examples
///
/// ```
/// use flutter_installer::manifest::Channel;
///
/// let channel: Channel = "stable".try_into().expect("valid channel");
/// assert_eq!(channel.as_str(), "stable");
/// assert!(Channel::try_from("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Channel(String);

impl Channel {
    /// Return the channel as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Channel {
    type Error = InstallerError;

    fn try_from(value: &str) -> Result<Self> {
        if value.trim().is_empty() {
            return Err(InstallerError::Input {
                reason: "channel must not be empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Channel {
    type Error = InstallerError;

    fn try_from(value: String) -> Result<Self> {
        Self::try_from(value.as_str())
    }
}

impl AsRef<str> for Channel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One installable build entry in the release manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseRecord {
    /// Content hash identifying this build.
    pub hash: String,
    /// The channel this build was published on.
    pub channel: String,
    /// The SDK version string (e.g. `1.2.3`).
    pub version: String,
    /// Archive path relative to the manifest's base URL.
    pub archive: String,
}

/// The per-architecture release manifest.
///
/// Fetched fresh on every run and never persisted; immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseManifest {
    /// Base URL that `ReleaseRecord::archive` paths are relative to.
    pub base_url: String,
    /// Channel name to newest-build hash.
    pub current_release: BTreeMap<String, String>,
    /// All published builds, newest first.
    pub releases: Vec<ReleaseRecord>,
}

impl ReleaseManifest {
    /// Select the newest release on `channel`.
    ///
    /// Resolves `current_release[channel]` to a hash, then returns the first
    /// record carrying that hash. Returns `None` when the channel is absent
    /// from `current_release` or no record matches the hash.
    #[must_use]
    pub fn latest(&self, channel: &Channel) -> Option<&ReleaseRecord> {
        let hash = self.current_release.get(channel.as_str())?;
        self.releases.iter().find(|record| &record.hash == hash)
    }

    /// Select the release matching `channel` and `version` exactly.
    ///
    /// The first record in manifest order that matches both fields wins.
    #[must_use]
    pub fn release(&self, channel: &Channel, version: &str) -> Option<&ReleaseRecord> {
        self.releases
            .iter()
            .find(|record| record.version == version && record.channel == channel.as_str())
    }

    /// Build the absolute download URL for a release record.
    ///
    /// # Examples
    ///
    /// ```
    /// use flutter_installer::manifest::parse_manifest;
    ///
    /// let manifest = parse_manifest(concat!(
    ///     r#"{"base_url":"https://example.test/releases","#,
    ///     r#""current_release":{"stable":"h1"},"#,
    ///     r#""releases":[{"hash":"h1","channel":"stable","version":"1.2.3","#,
    ///     r#""archive":"stable/linux/flutter.tar.xz"}]}"#,
    /// ))
    /// .expect("valid manifest");
    /// let record = manifest.releases.first().expect("one record");
    /// assert_eq!(
    ///     manifest.archive_url(record),
    ///     "https://example.test/releases/stable/linux/flutter.tar.xz",
    /// );
    /// ```
    #[must_use]
    pub fn archive_url(&self, record: &ReleaseRecord) -> String {
        format!("{}/{}", self.base_url, record.archive)
    }
}

/// Parse a JSON string into a [`ReleaseManifest`].
///
/// # Errors
///
/// Returns [`InstallerError::Parse`] if the body is not valid JSON of the
/// expected shape.
pub fn parse_manifest(json: &str) -> Result<ReleaseManifest> {
    serde_json::from_str(json).map_err(|e| InstallerError::Parse {
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
