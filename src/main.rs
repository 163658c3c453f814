//! Flutter installer CLI entrypoint.
//!
//! This binary resolves a requested Flutter release, installs it into the
//! local tool cache if absent, and publishes the SDK's executable directory
//! as the `FlutterToolPath` environment variable for downstream build steps.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use flutter_installer::cache::ToolCache;
use flutter_installer::cli::Cli;
use flutter_installer::dirs::{BaseDirs, SystemBaseDirs};
use flutter_installer::download::HttpDownloader;
use flutter_installer::error::{InstallerError, Result};
use flutter_installer::extraction::SdkExtractor;
use flutter_installer::installer::{
    InstallConfig, InstallOutcome, InstallRequest, Installer, dry_run_summary,
};
use flutter_installer::output::{ShellSnippet, env_file_line, success_message, write_stderr_line};
use flutter_installer::platform::Architecture;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let request = InstallRequest::new(&cli.channel, &cli.version)?;
    let config = build_config(cli, &SystemBaseDirs)?;

    if cli.dry_run {
        for line in dry_run_summary(&config, &request) {
            write_stderr_line(stderr, line);
        }
        return Ok(());
    }

    let downloader = HttpDownloader;
    let extractor = SdkExtractor;
    let cache = ToolCache::new(config.cache_root.clone());
    let installer = Installer::new(&config, &downloader, &extractor, &cache);
    let outcome = installer.run(&request, stderr)?;

    publish(cli, &outcome, stderr)?;
    Ok(())
}

/// Assemble the install configuration from CLI flags and platform defaults.
fn build_config(cli: &Cli, dirs: &dyn BaseDirs) -> Result<InstallConfig> {
    let cache_root = match cli.cache_dir.clone() {
        Some(dir) => dir,
        None => default_cache_root(dirs)?,
    };
    let temp_root = match cli.temp_dir.clone() {
        Some(dir) => dir,
        None => utf8_path(dirs.temp_root(), "temp root")?,
    };
    Ok(InstallConfig {
        cache_root,
        temp_root,
        arch: cli.arch.unwrap_or_else(Architecture::detect),
        verbosity: cli.verbosity,
        quiet: cli.quiet,
    })
}

/// Resolve the default tool cache root from platform directories.
fn default_cache_root(dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    let dir = dirs.tool_cache_dir().ok_or_else(|| InstallerError::Input {
        reason: "could not determine a tool cache directory; pass --cache-dir".to_owned(),
    })?;
    utf8_path(dir, "tool cache directory")
}

fn utf8_path(path: std::path::PathBuf, what: &str) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).map_err(|p| InstallerError::Input {
        reason: format!("{what} is not valid UTF-8: {}", p.display()),
    })
}

/// Publish the resolved tool path: agent env file, shell snippet, summary.
fn publish(cli: &Cli, outcome: &InstallOutcome, stderr: &mut dyn Write) -> Result<()> {
    if let Some(env_file) = &cli.env_file {
        append_env_file(env_file, &outcome.tool_path)?;
    }

    if !cli.quiet {
        write_stderr_line(stderr, "");
        write_stderr_line(stderr, success_message(&outcome.version, &outcome.tool_path));
        write_stderr_line(stderr, "");
        write_stderr_line(stderr, ShellSnippet::new(&outcome.tool_path).display_text());
    }
    Ok(())
}

/// Append the `FlutterToolPath` assignment to the agent environment file.
fn append_env_file(env_file: &Utf8Path, tool_path: &Utf8Path) -> Result<()> {
    use std::fs::OpenOptions;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(env_file)
        .map_err(|e| InstallerError::Publish {
            reason: format!("cannot open {env_file}: {e}"),
        })?;
    file.write_all(env_file_line(tool_path).as_bytes())
        .map_err(|e| InstallerError::Publish {
            reason: format!("cannot write {env_file}: {e}"),
        })
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed-path stand-in for [`SystemBaseDirs`].
    struct StubDirs {
        cache: Option<std::path::PathBuf>,
        temp: std::path::PathBuf,
    }

    impl BaseDirs for StubDirs {
        fn tool_cache_dir(&self) -> Option<std::path::PathBuf> {
            self.cache.clone()
        }

        fn temp_root(&self) -> std::path::PathBuf {
            self.temp.clone()
        }
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        assert_eq!(exit_code_for_run_result(Ok(()), &mut stderr), 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = InstallerError::Selection {
            channel: "beta".to_owned(),
            version: "9.9.9".to_owned(),
        };
        let mut stderr = Vec::new();
        assert_eq!(exit_code_for_run_result(Err(err), &mut stderr), 1);
        let text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(text.contains("no release found"));
    }

    #[test]
    fn build_config_prefers_explicit_directories() {
        let cli = Cli {
            cache_dir: Some(Utf8PathBuf::from("/opt/cache")),
            temp_dir: Some(Utf8PathBuf::from("/opt/tmp")),
            arch: Some(Architecture::Linux),
            ..Cli::default()
        };
        let dirs = StubDirs {
            cache: None,
            temp: std::path::PathBuf::from("/unused"),
        };

        let config = build_config(&cli, &dirs).expect("config builds");
        assert_eq!(config.cache_root, Utf8PathBuf::from("/opt/cache"));
        assert_eq!(config.temp_root, Utf8PathBuf::from("/opt/tmp"));
        assert_eq!(config.arch, Architecture::Linux);
    }

    #[test]
    fn build_config_falls_back_to_platform_directories() {
        let cli = Cli {
            arch: Some(Architecture::Linux),
            ..Cli::default()
        };
        let dirs = StubDirs {
            cache: Some(std::path::PathBuf::from("/home/agent/.cache/tool-cache")),
            temp: std::path::PathBuf::from("/tmp"),
        };

        let config = build_config(&cli, &dirs).expect("config builds");
        assert_eq!(
            config.cache_root,
            Utf8PathBuf::from("/home/agent/.cache/tool-cache")
        );
        assert_eq!(config.temp_root, Utf8PathBuf::from("/tmp"));
    }

    #[test]
    fn build_config_propagates_verbosity_level() {
        let cli = Cli {
            arch: Some(Architecture::Linux),
            verbosity: 2,
            ..Cli::default()
        };
        let dirs = StubDirs {
            cache: Some(std::path::PathBuf::from("/home/agent/.cache/tool-cache")),
            temp: std::path::PathBuf::from("/tmp"),
        };

        let config = build_config(&cli, &dirs).expect("config builds");
        assert_eq!(config.verbosity, 2);
    }

    #[test]
    fn build_config_errors_when_no_cache_directory_is_available() {
        let cli = Cli {
            arch: Some(Architecture::Linux),
            ..Cli::default()
        };
        let dirs = StubDirs {
            cache: None,
            temp: std::path::PathBuf::from("/tmp"),
        };

        let err = build_config(&cli, &dirs).expect_err("config must fail");
        assert!(matches!(err, InstallerError::Input { .. }));
    }

    #[test]
    fn append_env_file_writes_assignment_line() {
        let temp = tempfile::tempdir().expect("temp dir");
        let env_file = Utf8PathBuf::from_path_buf(temp.path().join("env")).expect("UTF-8 path");
        let tool_path = Utf8PathBuf::from("/opt/cache/Flutter/1.2.3/linux/flutter/bin");

        append_env_file(&env_file, &tool_path).expect("append succeeds");
        append_env_file(&env_file, &tool_path).expect("second append succeeds");

        let contents = std::fs::read_to_string(&env_file).expect("read env file");
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.starts_with("FlutterToolPath=/opt/cache"));
    }
}
