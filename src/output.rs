//! Output formatting for the installer CLI.
//!
//! Provides the stderr progress helper, shell configuration snippets for
//! exporting the resolved tool path, and the agent environment-file line
//! consumed by downstream build steps.

use camino::Utf8Path;
use std::io::Write;

/// The environment variable published on success.
pub const TOOL_PATH_VARIABLE: &str = "FlutterToolPath";

/// Shell configuration snippets for different shells.
#[derive(Debug, Clone)]
pub struct ShellSnippet {
    /// Export line for bash/zsh.
    pub bash: String,
    /// Set line for fish shell.
    pub fish: String,
    /// Set line for PowerShell.
    pub powershell: String,
}

impl ShellSnippet {
    /// Create shell snippets exporting the given tool path.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8PathBuf;
    /// use flutter_installer::output::ShellSnippet;
    ///
    /// let path = Utf8PathBuf::from("/opt/cache/Flutter/1.2.3/linux/flutter/bin");
    /// let snippet = ShellSnippet::new(&path);
    /// assert!(snippet.bash.contains("FlutterToolPath"));
    /// ```
    #[must_use]
    pub fn new(tool_path: &Utf8Path) -> Self {
        Self {
            bash: format!("export {TOOL_PATH_VARIABLE}=\"{tool_path}\""),
            fish: format!("set -gx {TOOL_PATH_VARIABLE} \"{tool_path}\""),
            powershell: format!("$env:{TOOL_PATH_VARIABLE} = \"{tool_path}\""),
        }
    }

    /// Format the snippet for display to the user.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!(
            concat!(
                "To use the installed SDK in this shell:\n\n",
                "  # bash/zsh\n",
                "  {}\n\n",
                "  # fish\n",
                "  {}\n\n",
                "  # PowerShell\n",
                "  {}"
            ),
            self.bash, self.fish, self.powershell
        )
    }
}

/// Format the `NAME=value` line appended to an agent environment file.
#[must_use]
pub fn env_file_line(tool_path: &Utf8Path) -> String {
    format!("{TOOL_PATH_VARIABLE}={tool_path}\n")
}

/// Format a success message after installation.
#[must_use]
pub fn success_message(version: &str, tool_path: &Utf8Path) -> String {
    format!("Successfully installed Flutter {version}; tool path: {tool_path}")
}

/// Write a line to the given stderr writer, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
