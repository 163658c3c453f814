//! CLI argument definitions for the Flutter installer task.
//!
//! Separated from the main entrypoint to keep the binary focused on
//! orchestration. Required inputs are enforced here; empty strings passed
//! explicitly are still rejected during request validation.

use crate::platform::Architecture;
use camino::Utf8PathBuf;
use clap::Parser;

/// Install a Flutter SDK release into the local tool cache.
#[derive(Parser, Debug, Clone)]
#[command(name = "flutter-installer")]
// No built-in version flag: --version/-V is the requested SDK version.
#[command(about, disable_version_flag = true)]
#[command(long_about = concat!(
    "Install a Flutter SDK release into the local tool cache.\n\n",
    "The installer resolves the requested channel and version against the ",
    "public Flutter release manifest, reuses a cached installation when one ",
    "exists for the resolved (version, architecture) pair, and otherwise ",
    "downloads and extracts the release archive. On success the SDK's ",
    "flutter/bin directory is published as the FlutterToolPath environment ",
    "variable for downstream build steps.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install the newest stable release:\n",
    "    $ flutter-installer --channel stable\n\n",
    "  Install a pinned version:\n",
    "    $ flutter-installer --channel stable --version 1.2.3\n\n",
    "  Hand the tool path to a later pipeline step:\n",
    "    $ flutter-installer --channel beta --env-file \"$AGENT_ENV_FILE\"\n\n",
    "  Preview without touching network or disk:\n",
    "    $ flutter-installer --channel stable --dry-run",
))]
pub struct Cli {
    /// Release channel to install from (e.g. stable, beta, dev).
    #[arg(short, long, value_name = "CHANNEL")]
    pub channel: String,

    /// SDK version to install, or "latest" for the channel's newest build.
    #[arg(short = 'V', long, value_name = "VERSION", default_value = "latest")]
    pub version: String,

    /// Tool cache root [default: platform cache directory].
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<Utf8PathBuf>,

    /// Root for temporary download directories [default: system temp].
    #[arg(long, value_name = "DIR")]
    pub temp_dir: Option<Utf8PathBuf>,

    /// Override the detected architecture key.
    #[arg(long, value_name = "ARCH", value_enum)]
    pub arch: Option<Architecture>,

    /// Append FlutterToolPath=<path> to this agent environment file.
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<Utf8PathBuf>,

    /// Show configuration and exit without installing.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase diagnostic verbosity (repeatable).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Default for Cli {
    /// A stable-channel, latest-version request with all flags disabled.
    ///
    /// # Examples
    ///
    /// ```
    /// use flutter_installer::cli::Cli;
    ///
    /// let cli = Cli::default();
    /// assert_eq!(cli.version, "latest");
    /// assert!(!cli.quiet);
    /// ```
    fn default() -> Self {
        Self {
            channel: "stable".to_owned(),
            version: "latest".to_owned(),
            cache_dir: None,
            temp_dir: None,
            arch: None,
            env_file: None,
            dry_run: false,
            verbosity: 0,
            quiet: false,
        }
    }
}
