//! Shell command execution utilities for the reconciler.
//!
//! This module provides safe shell command execution with proper quoting
//! to prevent command injection, plus the [`CommandRunner`] capability the
//! applier is parameterized over so tests can substitute a fake.
//!
//! # Example
//!
//! ```ignore
//! use linkmgr_common::shell::{self, IP_CMD, shellquote};
//!
//! let name = "eth0.10";
//! let cmd = format!("{} link del {}", IP_CMD, shellquote(name));
//! let result = shell::exec(&cmd).await?;
//! ```

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{LinkMgrError, LinkMgrResult};

/// Path to the `ip` command for network interface configuration.
pub const IP_CMD: &str = "/sbin/ip";

/// Path to the `modprobe` command for kernel module loading.
pub const MODPROBE_CMD: &str = "/sbin/modprobe";

/// Regex for characters that need escaping in shell double-quotes.
/// Matches: $, `, ", \, and newline
static SHELL_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([$`"\\\n])"#).expect("Invalid regex pattern"));

/// Quotes a string for safe use in shell commands.
///
/// Wraps the string in double quotes and escapes any characters with
/// special meaning inside double quotes:
/// - `$` (variable expansion)
/// - `` ` `` (command substitution)
/// - `"` (quote termination)
/// - `\` (escape character)
/// - newline (command termination)
///
/// # Example
///
/// ```
/// use linkmgr_common::shell::shellquote;
///
/// assert_eq!(shellquote("eth0.10"), "\"eth0.10\"");
/// assert_eq!(shellquote("with$var"), "\"with\\$var\"");
/// ```
pub fn shellquote(s: &str) -> String {
    let escaped = SHELL_ESCAPE_RE.replace_all(s, r"\$1");
    format!("\"{}\"", escaped)
}

/// Result of a shell command execution.
#[derive(Debug, Clone)]
pub struct ExecResult {
    /// The exit code of the command (0 = success).
    pub exit_code: i32,
    /// The combined stdout output.
    pub stdout: String,
    /// The combined stderr output.
    pub stderr: String,
}

impl ExecResult {
    /// Returns true if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Returns the combined output (stdout + stderr) for error messages.
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Executes a shell command asynchronously.
///
/// The command runs through `/bin/sh -c` to support shell features like
/// command chaining.
pub async fn exec(cmd: &str) -> LinkMgrResult<ExecResult> {
    tracing::debug!(command = %cmd, "Executing shell command");

    let output = Command::new("/bin/sh")
        .arg("-c")
        .arg(cmd)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|e| LinkMgrError::ShellExec {
            command: cmd.to_string(),
            source: e,
        })?;

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    let result = ExecResult {
        exit_code,
        stdout,
        stderr,
    };

    if result.success() {
        tracing::trace!(command = %cmd, exit_code = exit_code, "Command succeeded");
    } else {
        tracing::warn!(
            command = %cmd,
            exit_code = exit_code,
            stderr = %result.stderr,
            "Command failed"
        );
    }

    Ok(result)
}

/// Executes a shell command and returns an error on non-zero exit.
///
/// # Returns
///
/// * `Ok(String)` - The stdout output on success
/// * `Err(LinkMgrError)` - If the command fails to spawn or returns non-zero
pub async fn exec_or_throw(cmd: &str) -> LinkMgrResult<String> {
    let result = exec(cmd).await?;
    if result.success() {
        Ok(result.stdout)
    } else {
        Err(LinkMgrError::ShellCommandFailed {
            command: cmd.to_string(),
            exit_code: result.exit_code,
            output: result.combined_output(),
        })
    }
}

/// Capability for running one OS-level operation.
///
/// The applier holds a `CommandRunner` rather than calling [`exec_or_throw`]
/// directly, so tests can substitute a recording fake for the real shell.
#[async_trait]
pub trait CommandRunner: Send {
    /// Runs one shell-equivalent operation, returning its stdout on success.
    async fn run(&mut self, cmd: &str) -> LinkMgrResult<String>;
}

/// Production [`CommandRunner`] backed by the real shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&mut self, cmd: &str) -> LinkMgrResult<String> {
        exec_or_throw(cmd).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shellquote_simple() {
        assert_eq!(shellquote("simple"), "\"simple\"");
        assert_eq!(shellquote("eth0.10"), "\"eth0.10\"");
        assert_eq!(shellquote("1488"), "\"1488\"");
    }

    #[test]
    fn test_shellquote_special_chars() {
        // Dollar sign (variable expansion)
        assert_eq!(shellquote("$HOME"), "\"\\$HOME\"");

        // Backtick (command substitution)
        assert_eq!(shellquote("`whoami`"), "\"\\`whoami\\`\"");

        // Double quote
        assert_eq!(shellquote("say \"hello\""), "\"say \\\"hello\\\"\"");

        // Backslash
        assert_eq!(shellquote("path\\to"), "\"path\\\\to\"");
    }

    #[test]
    fn test_shellquote_empty() {
        assert_eq!(shellquote(""), "\"\"");
    }

    #[test]
    fn test_exec_result_success() {
        let result = ExecResult {
            exit_code: 0,
            stdout: "output".to_string(),
            stderr: "".to_string(),
        };
        assert!(result.success());
        assert_eq!(result.combined_output(), "output");
    }

    #[test]
    fn test_exec_result_failure() {
        let result = ExecResult {
            exit_code: 1,
            stdout: "".to_string(),
            stderr: "error message".to_string(),
        };
        assert!(!result.success());
        assert_eq!(result.combined_output(), "error message");
    }

    #[test]
    fn test_exec_result_combined() {
        let result = ExecResult {
            exit_code: 0,
            stdout: "stdout".to_string(),
            stderr: "stderr".to_string(),
        };
        assert_eq!(result.combined_output(), "stdout\nstderr");
    }

    #[tokio::test]
    async fn test_exec_echo() {
        let result = exec("echo hello").await.unwrap();
        assert!(result.success());
        assert_eq!(result.stdout, "hello");
    }

    #[tokio::test]
    async fn test_exec_failure() {
        let result = exec("exit 42").await.unwrap();
        assert!(!result.success());
        assert_eq!(result.exit_code, 42);
    }

    #[tokio::test]
    async fn test_exec_or_throw_failure() {
        let result = exec_or_throw("exit 1").await;
        match result {
            Err(LinkMgrError::ShellCommandFailed { exit_code, .. }) => {
                assert_eq!(exit_code, 1);
            }
            _ => panic!("Expected ShellCommandFailed error"),
        }
    }

    #[tokio::test]
    async fn test_shell_runner() {
        let mut runner = ShellRunner;
        let out = runner.run("echo runner").await.unwrap();
        assert_eq!(out, "runner");
    }
}
