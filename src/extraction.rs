//! Archive extraction for downloaded SDK archives.
//!
//! Release archives are either `.zip` (extracted in-process via the `zip`
//! crate) or `.tar.xz` (delegated to the external `tar` utility, which
//! autodetects the xz compression). Dispatch is by filename extension; the
//! two-way branch is part of the installer's contract with the release
//! index. Zip entries are validated against path traversal before unpacking.

use crate::error::{InstallerError, Result};
use std::path::{Component, Path};
use std::process::Command;

/// Trait for extracting release archives, enabling test mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::Extract`] if the archive is corrupt, an
    /// entry attempts to escape the destination, or the extraction
    /// subprocess exits non-zero.
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<()>;
}

/// Default extractor dispatching on the archive filename.
pub struct SdkExtractor;

impl ArchiveExtractor for SdkExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dest_dir)?;
        if is_zip(archive_path) {
            log::debug!("extracting zip archive {}", archive_path.display());
            extract_zip(archive_path, dest_dir)
        } else {
            log::debug!("extracting tar archive {}", archive_path.display());
            extract_with_tar(archive_path, dest_dir)
        }
    }
}

/// Return true when the archive filename carries a `.zip` extension.
#[must_use]
pub fn is_zip(archive_path: &Path) -> bool {
    archive_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Extract a zip archive entry by entry with traversal validation.
fn extract_zip(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let file = std::fs::File::open(archive_path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| InstallerError::Extract {
        reason: format!("cannot read zip archive: {e}"),
    })?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| InstallerError::Extract {
            reason: format!("cannot read zip entry {index}: {e}"),
        })?;
        let entry_path = entry
            .enclosed_name()
            .ok_or_else(|| InstallerError::Extract {
                reason: format!("zip entry {index} has an unsafe path"),
            })?;
        validate_entry_path(&entry_path)?;

        let dest_path = dest_dir.join(&entry_path);
        if entry.is_dir() {
            std::fs::create_dir_all(&dest_path)?;
            continue;
        }
        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut out = std::fs::File::create(&dest_path)?;
        std::io::copy(&mut entry, &mut out)?;

        #[cfg(unix)]
        restore_unix_mode(&entry, &dest_path)?;
    }

    Ok(())
}

/// Restore the entry's Unix permission bits where the archive recorded them.
///
/// The Flutter SDK ships executable tool scripts under `flutter/bin`; losing
/// the execute bit would break every downstream step.
#[cfg(unix)]
fn restore_unix_mode(entry: &zip::read::ZipFile<'_>, dest_path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    if let Some(mode) = entry.unix_mode() {
        std::fs::set_permissions(dest_path, std::fs::Permissions::from_mode(mode))?;
    }
    Ok(())
}

/// Extract a non-zip archive by invoking the external `tar` utility.
///
/// `tar xf` autodetects the compression format, covering the `.tar.xz`
/// archives the release index serves for Linux and macOS.
fn extract_with_tar(archive_path: &Path, dest_dir: &Path) -> Result<()> {
    let output = Command::new("tar")
        .arg("xf")
        .arg(archive_path)
        .arg("-C")
        .arg(dest_dir)
        .output()
        .map_err(|e| InstallerError::Extract {
            reason: format!("failed to run tar: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InstallerError::Extract {
            reason: format!("tar exited with {}: {}", output.status, stderr.trim()),
        });
    }
    Ok(())
}

/// Validate that an archive entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<()> {
    if path.is_absolute()
        || path
            .components()
            .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(InstallerError::Extract {
            reason: format!("path traversal detected: {}", path.display()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use std::path::PathBuf;

    #[rstest]
    #[case::zip("flutter_linux_1.2.3.zip", true)]
    #[case::upper_zip("FLUTTER.ZIP", true)]
    #[case::tar_xz("flutter_linux_1.2.3.tar.xz", false)]
    #[case::no_extension("flutter", false)]
    fn dispatches_on_filename_extension(#[case] name: &str, #[case] expect_zip: bool) {
        assert_eq!(is_zip(&PathBuf::from(name)), expect_zip);
    }

    #[rstest]
    #[case::parent_dir("../escape.txt")]
    #[case::nested_parent("flutter/../../escape.txt")]
    fn rejects_path_traversal(#[case] bad_path: &str) {
        let result = validate_entry_path(&PathBuf::from(bad_path));
        assert!(matches!(result, Err(InstallerError::Extract { .. })));
    }

    #[test]
    fn accepts_normal_paths() {
        assert!(validate_entry_path(&PathBuf::from("flutter/bin/flutter")).is_ok());
    }

    #[test]
    fn extracts_real_zip_archive() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let archive_path = temp_dir.path().join("sdk.zip");
        let dest_dir = temp_dir.path().join("out");

        let file = std::fs::File::create(&archive_path).expect("create archive");
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("flutter/bin/flutter", zip::write::SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(b"#!/bin/sh\n").expect("write entry");
        writer.finish().expect("finish archive");

        let extractor = SdkExtractor;
        extractor
            .extract(&archive_path, &dest_dir)
            .expect("extract succeeds");
        assert!(dest_dir.join("flutter/bin/flutter").exists());
    }

    #[test]
    fn corrupt_zip_reports_extract_error() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let archive_path = temp_dir.path().join("sdk.zip");
        std::fs::write(&archive_path, b"not a zip archive").expect("write file");

        let extractor = SdkExtractor;
        let result = extractor.extract(&archive_path, &temp_dir.path().join("out"));
        assert!(matches!(result, Err(InstallerError::Extract { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn extracts_real_tar_archive_via_subprocess() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let payload = temp_dir.path().join("flutter");
        std::fs::create_dir_all(payload.join("bin")).expect("payload dirs");
        std::fs::write(payload.join("bin/flutter"), b"#!/bin/sh\n").expect("payload file");

        let archive_path = temp_dir.path().join("sdk.tar");
        let status = Command::new("tar")
            .arg("cf")
            .arg(&archive_path)
            .arg("-C")
            .arg(temp_dir.path())
            .arg("flutter")
            .status()
            .expect("tar available");
        assert!(status.success());

        let dest_dir = temp_dir.path().join("out");
        let extractor = SdkExtractor;
        extractor
            .extract(&archive_path, &dest_dir)
            .expect("extract succeeds");
        assert!(dest_dir.join("flutter/bin/flutter").exists());
    }

    #[test]
    fn missing_tar_archive_reports_extract_error() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let extractor = SdkExtractor;
        let result = extractor.extract(
            &temp_dir.path().join("absent.tar.xz"),
            &temp_dir.path().join("out"),
        );
        assert!(matches!(result, Err(InstallerError::Extract { .. })));
    }
}
