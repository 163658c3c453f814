//! End-to-end install orchestration.
//!
//! The install flow is a linear state machine with no back-edges:
//! resolve platform, fetch the release manifest, select the requested
//! release, look up the tool cache, download and extract on a miss, then
//! publish the resolved tool path. Any failure at any step aborts the run;
//! there is no partial success.

use crate::cache::CacheRegistry;
use crate::download::ReleaseDownloader;
use crate::error::{InstallerError, Result};
use crate::extraction::ArchiveExtractor;
use crate::manifest::{Channel, ReleaseRecord, parse_manifest};
use crate::output::write_stderr_line;
use crate::platform::Architecture;
use camino::Utf8PathBuf;
use std::io::Write;

/// The tool name all cache entries are registered under.
pub const TOOL_NAME: &str = "Flutter";

/// The version value requesting the newest release on a channel.
pub const LATEST_VERSION: &str = "latest";

/// A validated install request.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// The requested release channel.
    pub channel: Channel,
    /// The requested version, or [`LATEST_VERSION`].
    pub version: String,
}

impl InstallRequest {
    /// Validate raw channel and version inputs into a request.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Input`] when either input is empty.
    pub fn new(channel: &str, version: &str) -> Result<Self> {
        if version.trim().is_empty() {
            return Err(InstallerError::Input {
                reason: "version must not be empty".to_owned(),
            });
        }
        Ok(Self {
            channel: Channel::try_from(channel)?,
            version: version.to_owned(),
        })
    }

    /// Whether this request asks for the newest release on its channel.
    #[must_use]
    pub fn wants_latest(&self) -> bool {
        self.version == LATEST_VERSION
    }
}

/// Explicit configuration for one install run.
///
/// The cache root and temp root are passed in rather than looked up
/// ambiently so tests can run against isolated directories.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Root directory of the local tool cache.
    pub cache_root: Utf8PathBuf,
    /// Root under which temporary download directories are created.
    pub temp_root: Utf8PathBuf,
    /// The manifest architecture key for this run.
    pub arch: Architecture,
    /// Diagnostic verbosity level; above zero, extra detail lines are
    /// written alongside progress output.
    pub verbosity: u8,
    /// When true, suppress progress output (errors still shown).
    pub quiet: bool,
}

/// The published result of a successful install run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// The concrete version that was installed (never `latest`).
    pub version: String,
    /// The cache entry directory holding the SDK.
    pub cached_path: Utf8PathBuf,
    /// The SDK executable directory to publish as `FlutterToolPath`.
    pub tool_path: Utf8PathBuf,
}

/// Composes the downloader, extractor, and tool cache into the install flow.
pub struct Installer<'a> {
    config: &'a InstallConfig,
    downloader: &'a dyn ReleaseDownloader,
    extractor: &'a dyn ArchiveExtractor,
    cache: &'a dyn CacheRegistry,
}

impl<'a> Installer<'a> {
    /// Create an installer with injected collaborators.
    #[must_use]
    pub const fn new(
        config: &'a InstallConfig,
        downloader: &'a dyn ReleaseDownloader,
        extractor: &'a dyn ArchiveExtractor,
        cache: &'a dyn CacheRegistry,
    ) -> Self {
        Self {
            config,
            downloader,
            extractor,
            cache,
        }
    }

    /// Run the install flow for `request`.
    ///
    /// # Errors
    ///
    /// Returns the originating [`InstallerError`] of whichever step failed;
    /// no step is retried.
    pub fn run(&self, request: &InstallRequest, stderr: &mut dyn Write) -> Result<InstallOutcome> {
        let arch = self.config.arch;
        log::debug!("resolved platform architecture: {arch}");

        self.progress(stderr, format!("Fetching release manifest for {arch}..."));
        let manifest_json = self.downloader.fetch_manifest(arch)?;
        let manifest = parse_manifest(&manifest_json)?;
        self.detail(stderr, format!("Manifest base URL: {}", manifest.base_url));

        let record = self.select_release(&manifest, request)?;
        self.detail(
            stderr,
            format!(
                "Selected Flutter {} on {} (hash {})",
                record.version, record.channel, record.hash
            ),
        );

        let cached_path = match self.cache.find(TOOL_NAME, &record.version, arch.as_str()) {
            Some(path) => {
                log::debug!("cache hit at {path}");
                self.progress(
                    stderr,
                    format!("Found Flutter {} in the tool cache.", record.version),
                );
                path
            }
            None => self.download_and_store(&manifest.archive_url(record), record, stderr)?,
        };

        let tool_path = cached_path.join("flutter").join("bin");
        log::debug!("publishing tool path {tool_path}");
        Ok(InstallOutcome {
            version: record.version.clone(),
            cached_path,
            tool_path,
        })
    }

    /// Select the release record for the request, turning an absent match
    /// into a typed selection error.
    fn select_release<'m>(
        &self,
        manifest: &'m crate::manifest::ReleaseManifest,
        request: &InstallRequest,
    ) -> Result<&'m ReleaseRecord> {
        let selected = if request.wants_latest() {
            manifest.latest(&request.channel)
        } else {
            manifest.release(&request.channel, &request.version)
        };
        selected.ok_or_else(|| InstallerError::Selection {
            channel: request.channel.to_string(),
            version: request.version.clone(),
        })
    }

    /// Handle a cache miss: download the archive, extract it, store the
    /// result, and re-run the lookup.
    fn download_and_store(
        &self,
        archive_url: &str,
        record: &ReleaseRecord,
        stderr: &mut dyn Write,
    ) -> Result<Utf8PathBuf> {
        std::fs::create_dir_all(&self.config.temp_root)?;
        let work_dir = tempfile::Builder::new()
            .prefix("flutter-install-")
            .tempdir_in(&self.config.temp_root)?;

        let archive_path = work_dir.path().join(archive_filename(&record.archive));
        self.progress(stderr, format!("Downloading {archive_url}..."));
        self.downloader.download_archive(archive_url, &archive_path)?;

        let extract_dir = work_dir.path().join("extracted");
        self.progress(stderr, "Extracting the SDK archive...");
        self.extractor.extract(&archive_path, &extract_dir)?;

        let source_dir =
            Utf8PathBuf::from_path_buf(extract_dir).map_err(|path| InstallerError::Extract {
                reason: format!("extraction directory is not valid UTF-8: {}", path.display()),
            })?;
        self.cache.store(
            &source_dir,
            TOOL_NAME,
            &record.version,
            self.config.arch.as_str(),
        )?;

        // The store just succeeded, so a miss here means the cache is
        // returning different answers for the same key.
        let entry = self
            .cache
            .find(TOOL_NAME, &record.version, self.config.arch.as_str())
            .ok_or_else(|| InstallerError::CacheInconsistency {
                name: TOOL_NAME.to_owned(),
                version: record.version.clone(),
                arch: self.config.arch.as_str().to_owned(),
            })?;
        self.detail(stderr, format!("Stored cache entry at {entry}"));
        Ok(entry)
    }

    fn progress(&self, stderr: &mut dyn Write, message: impl std::fmt::Display) {
        if !self.config.quiet {
            write_stderr_line(stderr, message);
        }
    }

    /// Write an extra diagnostic line when verbosity was requested.
    fn detail(&self, stderr: &mut dyn Write, message: impl std::fmt::Display) {
        if self.config.verbosity > 0 && !self.config.quiet {
            write_stderr_line(stderr, message);
        }
    }
}

/// Return the final path segment of a relative archive path.
fn archive_filename(archive: &str) -> &str {
    archive.rsplit('/').next().unwrap_or(archive)
}

/// Build the manifest URL and configuration summary for dry-run output.
#[must_use]
pub fn dry_run_summary(config: &InstallConfig, request: &InstallRequest) -> Vec<String> {
    vec![
        "Dry run - no files will be modified".to_owned(),
        String::new(),
        format!("Architecture: {}", config.arch),
        format!(
            "Manifest URL: {}",
            crate::download::HttpDownloader::manifest_url(config.arch)
        ),
        format!("Channel: {}", request.channel),
        format!("Version: {}", request.version),
        format!("Cache root: {}", config.cache_root),
        format!("Temp root: {}", config.temp_root),
        format!("Verbosity level: {}", config.verbosity),
    ]
}

#[cfg(test)]
#[path = "installer_tests.rs"]
mod tests;
