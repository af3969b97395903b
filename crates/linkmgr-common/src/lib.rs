//! Common infrastructure for the linkmgr interface reconciler.
//!
//! This crate provides the shared plumbing used by the reconciler daemon:
//!
//! - [`shell`]: Safe shell command execution with proper quoting, plus the
//!   [`shell::CommandRunner`] capability injected into the applier
//! - [`config`]: The two-snapshot (desired/effective) configuration tree
//! - [`netdir`]: The OS interface directory and the hierarchical
//!   sub-interface predicate
//! - [`error`]: Error types for reconciler operations
//!
//! # Architecture
//!
//! A reconciliation run follows this pattern:
//!
//! 1. Extract the desired record for one interface instance from the
//!    configuration tree (falling back to effective state for deletions)
//! 2. Validate the record before any OS mutation is attempted
//! 3. Plan an ordered operation sequence against the live interface set
//! 4. Execute shell commands to converge the Linux network stack
//!
//! # Example
//!
//! ```ignore
//! use linkmgr_common::{
//!     error::LinkMgrResult,
//!     shell::{self, IP_CMD, shellquote},
//! };
//!
//! async fn set_mtu(name: &str, mtu: u32) -> LinkMgrResult<()> {
//!     let cmd = format!("{} link set dev {} mtu {}",
//!         IP_CMD, shellquote(name), mtu);
//!     shell::exec_or_throw(&cmd).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod netdir;
pub mod shell;

// Re-export commonly used items at crate root
pub use config::{ConfigScope, ConfigTree};
pub use error::{LinkMgrError, LinkMgrResult};
pub use netdir::{descendants_of, NetDir, SysfsNetDir};
pub use shell::{CommandRunner, ShellRunner};
