//! Host platform resolution for manifest architecture keys.
//!
//! The Flutter release index publishes one manifest per architecture key:
//! `macos`, `linux`, or `windows`. Unrecognized operating systems fall back
//! to `windows`; the release index publishes no other keys, so this quirk is
//! preserved for compatibility with the manifest API.

use std::fmt;

/// A manifest architecture key.
///
/// # Examples
///
/// ```
/// use flutter_installer::platform::Architecture;
///
/// assert_eq!(Architecture::from_os("linux").as_str(), "linux");
/// assert_eq!(Architecture::from_os("freebsd").as_str(), "windows");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Architecture {
    /// The `macos` manifest key.
    Macos,
    /// The `linux` manifest key.
    Linux,
    /// The `windows` manifest key.
    Windows,
}

impl Architecture {
    /// Resolve the architecture key for the running operating system.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an operating system identifier to an architecture key.
    ///
    /// `macos` and `linux` map to their own keys; everything else maps to
    /// `windows`, matching the keys published by the release index.
    #[must_use]
    pub fn from_os(os: &str) -> Self {
        match os {
            "macos" | "darwin" => Self::Macos,
            "linux" => Self::Linux,
            _ => Self::Windows,
        }
    }

    /// Return the manifest key as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Macos => "macos",
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
