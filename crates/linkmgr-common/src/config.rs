//! Two-snapshot configuration tree.
//!
//! The reconciler is driven by a pair of configuration snapshots: the
//! *desired* tree (what the operator asked for) and the *effective* tree
//! (what was last applied). The effective side exists so that identity
//! fields of a now-deleted interface can still be recovered for teardown.
//!
//! Paths are space-separated node words, e.g.
//! `interfaces l2tpv3 l2tpeth10 tunnel-id`. A node "exists" when it is a
//! stored leaf or a prefix of one. [`ConfigTree::scoped`] returns a view
//! that resolves relative paths under a chosen subtree.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{LinkMgrError, LinkMgrResult};

/// In-memory configuration store holding desired and effective snapshots.
#[derive(Debug, Clone, Default)]
pub struct ConfigTree {
    desired: BTreeMap<String, Vec<String>>,
    effective: BTreeMap<String, Vec<String>>,
}

/// Raw JSON layout of a configuration snapshot file.
///
/// Leaf values are either a single string or an ordered array of strings:
///
/// ```json
/// {
///   "desired": {
///     "interfaces l2tpv3 l2tpeth10 tunnel-id": "100",
///     "interfaces l2tpv3 l2tpeth10 address": ["10.0.0.1/24"]
///   },
///   "effective": {}
/// }
/// ```
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    desired: BTreeMap<String, RawValue>,
    #[serde(default)]
    effective: BTreeMap<String, RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    One(String),
    Many(Vec<String>),
}

impl From<RawValue> for Vec<String> {
    fn from(raw: RawValue) -> Self {
        match raw {
            RawValue::One(v) => vec![v],
            RawValue::Many(vs) => vs,
        }
    }
}

fn node_exists(map: &BTreeMap<String, Vec<String>>, path: &str) -> bool {
    if map.contains_key(path) {
        return true;
    }
    let prefix = format!("{} ", path);
    map.range(path.to_string()..)
        .next()
        .is_some_and(|(k, _)| k.starts_with(&prefix))
}

impl ConfigTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a tree from a JSON snapshot document.
    pub fn from_json_str(raw: &str) -> LinkMgrResult<Self> {
        let snapshot: RawSnapshot = serde_json::from_str(raw).map_err(|e| {
            LinkMgrError::invalid_config("config", format!("malformed snapshot: {}", e))
        })?;

        let mut tree = Self::new();
        for (path, value) in snapshot.desired {
            tree.desired.insert(path, value.into());
        }
        for (path, value) in snapshot.effective {
            tree.effective.insert(path, value.into());
        }
        Ok(tree)
    }

    /// Sets a single-valued leaf in the desired snapshot.
    pub fn set(&mut self, path: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.desired.insert(path.into(), vec![value.into()]);
        self
    }

    /// Appends a value to a multi-valued leaf in the desired snapshot.
    pub fn push(&mut self, path: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.desired
            .entry(path.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Marks a valueless node as present in the desired snapshot.
    pub fn touch(&mut self, path: impl Into<String>) -> &mut Self {
        self.desired.entry(path.into()).or_default();
        self
    }

    /// Sets a single-valued leaf in the effective snapshot.
    pub fn set_effective(
        &mut self,
        path: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.effective.insert(path.into(), vec![value.into()]);
        self
    }

    /// Returns true if the desired snapshot has the node.
    pub fn exists(&self, path: &str) -> bool {
        node_exists(&self.desired, path)
    }

    /// Returns the first desired value of the leaf, if any.
    pub fn value(&self, path: &str) -> Option<&str> {
        self.desired
            .get(path)
            .and_then(|vs| vs.first())
            .map(String::as_str)
    }

    /// Returns all desired values of the leaf, in configured order.
    pub fn values(&self, path: &str) -> Vec<String> {
        self.desired.get(path).cloned().unwrap_or_default()
    }

    /// Returns true if the effective snapshot has the node.
    pub fn exists_effective(&self, path: &str) -> bool {
        node_exists(&self.effective, path)
    }

    /// Returns the first effective value of the leaf, if any.
    pub fn effective_value(&self, path: &str) -> Option<&str> {
        self.effective
            .get(path)
            .and_then(|vs| vs.first())
            .map(String::as_str)
    }

    /// Returns all effective values of the leaf, in last-applied order.
    pub fn effective_values(&self, path: &str) -> Vec<String> {
        self.effective.get(path).cloned().unwrap_or_default()
    }

    /// Returns a view resolving relative paths under `level`.
    pub fn scoped(&self, level: &str) -> ConfigScope<'_> {
        ConfigScope {
            tree: self,
            level: level.to_string(),
        }
    }
}

/// A level-scoped view of a [`ConfigTree`].
///
/// All lookups resolve relative to the subtree chosen at construction.
#[derive(Debug, Clone)]
pub struct ConfigScope<'a> {
    tree: &'a ConfigTree,
    level: String,
}

impl ConfigScope<'_> {
    fn resolve(&self, rel: &str) -> String {
        if rel.is_empty() {
            self.level.clone()
        } else {
            format!("{} {}", self.level, rel)
        }
    }

    /// Returns true if the desired snapshot has the node.
    pub fn exists(&self, rel: &str) -> bool {
        self.tree.exists(&self.resolve(rel))
    }

    /// Returns the first desired value of the leaf, if any.
    pub fn value(&self, rel: &str) -> Option<&str> {
        self.tree.value(&self.resolve(rel))
    }

    /// Returns all desired values of the leaf, in configured order.
    pub fn values(&self, rel: &str) -> Vec<String> {
        self.tree.values(&self.resolve(rel))
    }

    /// Returns true if the effective snapshot has the node.
    pub fn exists_effective(&self, rel: &str) -> bool {
        self.tree.exists_effective(&self.resolve(rel))
    }

    /// Returns the first effective value of the leaf, if any.
    pub fn effective_value(&self, rel: &str) -> Option<&str> {
        self.tree.effective_value(&self.resolve(rel))
    }

    /// Returns all effective values of the leaf, in last-applied order.
    pub fn effective_values(&self, rel: &str) -> Vec<String> {
        self.tree.effective_values(&self.resolve(rel))
    }
}
