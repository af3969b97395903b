//! Integration test infrastructure for the linkmgr reconciler
//!
//! Provides:
//! - A recording command runner standing in for the shell
//! - A static interface directory and module probe
//! - Configuration tree fixtures for common scenarios

pub mod fixtures;

pub use fixtures::*;
