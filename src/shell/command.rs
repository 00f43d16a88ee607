//! Shell command execution.

use crate::error::{DeployError, Result};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::platform::{is_ci, shell_executable};

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Turn a non-zero exit into [`DeployError::CommandFailed`].
    pub fn check(self, command: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(DeployError::CommandFailed {
                command: command.to_string(),
                code: self.exit_code,
            })
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Capture stdout and stderr (if false, both are inherited).
    pub capture: bool,

    /// Data written to the child's stdin, which is then closed.
    /// When `None`, stdin is inherited so interactive tools keep working.
    pub stdin: Option<String>,
}

impl CommandOptions {
    /// Options for a command whose output is read by the caller.
    pub fn captured(cwd: &Path) -> Self {
        Self {
            cwd: Some(cwd.to_path_buf()),
            capture: true,
            ..Default::default()
        }
    }

    /// Options for a command that talks to the user directly.
    pub fn inherited(cwd: &Path) -> Self {
        Self {
            cwd: Some(cwd.to_path_buf()),
            ..Default::default()
        }
    }

    /// Set the stdin payload.
    pub fn with_stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Execute a shell command.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let shell = shell_executable();
    let mut cmd = Command::new(&shell);
    cmd.arg(shell_flag());
    cmd.arg(command);

    // Set working directory
    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    // Set environment
    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    // Configure stdio
    if options.capture {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }
    if options.stdin.is_some() {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::inherit());
    }

    tracing::debug!("Executing: {}", command);

    let spawn_failed = |_| DeployError::CommandFailed {
        command: command.to_string(),
        code: None,
    };

    let mut child = cmd.spawn().map_err(spawn_failed)?;

    if let Some(input) = &options.stdin {
        if let Some(mut stdin) = child.stdin.take() {
            // A child that exits without reading stdin closes the pipe early;
            // its exit status is what gets reported.
            if let Err(e) = stdin.write_all(input.as_bytes()) {
                tracing::debug!("Writing stdin for '{}' failed: {}", command, e);
            }
        }
    }

    let output = child.wait_with_output().map_err(spawn_failed)?;
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Quote a single argument for the shell.
///
/// Plain words are returned unchanged so logged command lines stay readable.
///
/// ```
/// use gaedeploy::shell::quote;
///
/// assert_eq!(quote("key-auth"), "key-auth");
/// assert_eq!(quote("my dir"), "'my dir'");
/// assert_eq!(quote("it's"), r"'it'\''s'");
/// ```
pub fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@+%,".contains(c));
    if plain {
        arg.to_string()
    } else if cfg!(target_os = "windows") {
        format!("\"{}\"", arg.replace('"', "\\\""))
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

/// Get the flag to pass commands to the shell.
///
/// Uses `-lic` (interactive login shell) on Unix so that the user's
/// full shell environment is available. Platform SDK tools such as
/// `appcfg.py` are commonly put on PATH from `.zshrc`/`.bashrc`
/// (interactive) or `.zprofile`/`.bash_profile` (login).
///
/// In CI environments, uses `-lc` (login, non-interactive) to avoid
/// `bash: cannot set terminal process group` errors caused by `-i`
/// trying to set up job control without a TTY.
fn shell_flag() -> &'static str {
    if cfg!(target_os = "windows") {
        "/C"
    } else if is_ci() {
        "-lc"
    } else {
        "-lic"
    }
}
