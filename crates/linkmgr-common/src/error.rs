//! Error types for reconciler operations.
//!
//! This module defines the error types used throughout the linkmgr crates.
//! All errors implement `std::error::Error` via `thiserror`.
//!
//! Three error families surface to the top of a reconciliation run and
//! terminate it: configuration errors ([`LinkMgrError::InvalidConfig`]),
//! prerequisite errors ([`LinkMgrError::Prerequisite`]) and operation
//! errors ([`LinkMgrError::ShellCommandFailed`]). None are caught and
//! converted into a degraded-but-running mode; a failed run is expected to
//! be re-invoked wholesale once the root cause is fixed.

use std::io;
use thiserror::Error;

/// Result type alias for reconciler operations.
pub type LinkMgrResult<T> = Result<T, LinkMgrError>;

/// Errors that can occur during a reconciliation run.
#[derive(Debug, Error)]
pub enum LinkMgrError {
    /// Failed to execute a shell command (spawn error).
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Shell command returned non-zero exit code.
    #[error("Shell command failed: '{command}' (exit code {exit_code}): {output}")]
    ShellCommandFailed {
        /// The command that failed.
        command: String,
        /// The exit code.
        exit_code: i32,
        /// Combined stdout/stderr output.
        output: String,
    },

    /// Desired configuration is incomplete or inconsistent.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The configuration field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// A required kernel facility could not be made available.
    #[error("Failed to provide kernel module {module}: {message}")]
    Prerequisite {
        /// The kernel module name.
        module: String,
        /// Error message.
        message: String,
    },

    /// The OS interface directory backing is unavailable.
    #[error("Interface directory '{path}' unavailable: {source}")]
    NetDirUnavailable {
        /// The directory path that could not be read.
        path: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl LinkMgrError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a prerequisite error.
    pub fn prerequisite(module: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Prerequisite {
            module: module.into(),
            message: message.into(),
        }
    }

    /// Returns true if the error was raised before any OS mutation,
    /// i.e. the run aborted while the system state was still untouched.
    pub fn is_pre_mutation(&self) -> bool {
        matches!(self, LinkMgrError::InvalidConfig { .. })
    }
}
