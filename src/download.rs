//! HTTP retrieval of release manifests and SDK archives.
//!
//! Provides a trait-based abstraction over the two network operations the
//! installer performs, enabling dependency injection for testing. There is
//! no retry policy: any transport failure aborts the run.

use crate::error::{InstallerError, Result};
use crate::platform::Architecture;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// URL template for the per-architecture release index.
const RELEASES_URL_TEMPLATE: &str =
    "https://storage.googleapis.com/flutter_infra/releases/releases_{arch}.json";

/// Network timeout for manifest and archive downloads.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Trait for fetching release data over the network.
///
/// Abstractions allow tests to mock HTTP behaviour without network access.
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseDownloader {
    /// Fetch the release manifest JSON for the given architecture key.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Network`] on transport failure or
    /// [`InstallerError::NotFound`] when the index has no manifest for the
    /// architecture.
    fn fetch_manifest(&self, arch: Architecture) -> Result<String>;

    /// Download the archive at `url` into the file at `dest`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Network`] on transport failure, or an I/O
    /// error if the destination file cannot be written.
    fn download_archive(&self, url: &str, dest: &Path) -> Result<()>;
}

/// HTTP-based downloader using `ureq`.
pub struct HttpDownloader;

impl HttpDownloader {
    /// Construct the release manifest URL for an architecture key.
    ///
    /// # Examples
    ///
    /// ```
    /// use flutter_installer::download::HttpDownloader;
    /// use flutter_installer::platform::Architecture;
    ///
    /// let url = HttpDownloader::manifest_url(Architecture::Linux);
    /// assert!(url.ends_with("releases_linux.json"));
    /// ```
    #[must_use]
    pub fn manifest_url(arch: Architecture) -> String {
        RELEASES_URL_TEMPLATE.replace("{arch}", arch.as_str())
    }
}

impl ReleaseDownloader for HttpDownloader {
    fn fetch_manifest(&self, arch: Architecture) -> Result<String> {
        let url = Self::manifest_url(arch);
        log::debug!("fetching release manifest from {url}");
        download_text(&url)
    }

    fn download_archive(&self, url: &str, dest: &Path) -> Result<()> {
        log::debug!("downloading archive {url} to {}", dest.display());
        download_to_file(url, dest)
    }
}

/// Download a URL and return the body as a string.
fn download_text(url: &str) -> Result<String> {
    let response = http_agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    response
        .into_body()
        .read_to_string()
        .map_err(|e| InstallerError::Network {
            url: url.to_owned(),
            reason: e.to_string(),
        })
}

/// Download a URL and stream the body into a file.
fn download_to_file(url: &str, dest: &Path) -> Result<()> {
    let response = http_agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    let mut file = std::fs::File::create(dest)?;
    std::io::copy(&mut response.into_body().as_reader(), &mut file)?;
    Ok(())
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to an [`InstallerError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> InstallerError {
    match err {
        ureq::Error::StatusCode(404) => InstallerError::NotFound {
            url: url.to_owned(),
        },
        other => InstallerError::Network {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
