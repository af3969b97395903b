//! OS interface directory and hierarchical sub-interface discovery.
//!
//! [`NetDir`] enumerates the interface names the kernel currently exposes.
//! [`descendants_of`] is a pure predicate over such a name set: given a
//! parent name it returns the hierarchical children (`parent.<id>` and
//! Q-in-Q `parent.<id>.<id>`), deepest first. Children must be removed in
//! that order, two-level names strictly before one-level names, before the
//! parent itself may go.

use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use crate::error::{LinkMgrError, LinkMgrResult};

/// Default sysfs directory listing kernel network interfaces.
pub const SYSFS_NET_DIR: &str = "/sys/class/net";

/// Read-only view of the interface names visible in the OS.
pub trait NetDir {
    /// Returns the set of interface names currently visible.
    ///
    /// An unavailable backing directory is fatal to the whole run.
    fn list(&self) -> LinkMgrResult<BTreeSet<String>>;
}

/// Interface directory backed by a sysfs-style directory listing.
#[derive(Debug, Clone)]
pub struct SysfsNetDir {
    root: PathBuf,
}

impl SysfsNetDir {
    /// Creates a directory view over [`SYSFS_NET_DIR`].
    pub fn new() -> Self {
        Self::with_root(SYSFS_NET_DIR)
    }

    /// Creates a directory view over an alternate root (used in tests).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for SysfsNetDir {
    fn default() -> Self {
        Self::new()
    }
}

impl NetDir for SysfsNetDir {
    fn list(&self) -> LinkMgrResult<BTreeSet<String>> {
        let unavailable = |source| LinkMgrError::NetDirUnavailable {
            path: self.root.display().to_string(),
            source,
        };

        let mut names = BTreeSet::new();
        for entry in fs::read_dir(&self.root).map_err(unavailable)? {
            let entry = entry.map_err(unavailable)?;
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }
}

/// Returns the VLAN nesting depth of `candidate` below `parent`.
///
/// `eth0.10` is depth 1 below `eth0`; `eth0.10.20` is depth 2. Suffix
/// components must be purely numeric. Returns `None` for unrelated names.
fn vlan_depth_below(parent: &str, candidate: &str) -> Option<usize> {
    let suffix = candidate.strip_prefix(parent)?.strip_prefix('.')?;
    let components: Vec<&str> = suffix.split('.').collect();
    if components.len() > 2 {
        return None;
    }
    let all_numeric = components
        .iter()
        .all(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()));
    if all_numeric {
        Some(components.len())
    } else {
        None
    }
}

/// Returns the hierarchical descendants of `name` within `names`,
/// deepest first: all two-level (Q-in-Q) children, then all one-level
/// children.
pub fn descendants_of(name: &str, names: &BTreeSet<String>) -> Vec<String> {
    let mut ordered: Vec<String> = names
        .iter()
        .filter(|n| vlan_depth_below(name, n) == Some(2))
        .cloned()
        .collect();
    ordered.extend(
        names
            .iter()
            .filter(|n| vlan_depth_below(name, n) == Some(1))
            .cloned(),
    );
    ordered
}
