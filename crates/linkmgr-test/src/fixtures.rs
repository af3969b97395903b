//! Test fixtures for reconciler scenarios

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use linkmgr_common::config::ConfigTree;
use linkmgr_common::error::{LinkMgrError, LinkMgrResult};
use linkmgr_common::netdir::NetDir;
use linkmgr_common::shell::CommandRunner;
use linkmgrd::apply::Applier;
use linkmgrd::modules::{KernelModule, ModulePresence};
use linkmgrd::LinkMgr;

/// Command runner that records every command instead of executing it.
///
/// The log is shared, so a clone kept by the test still observes commands
/// after the runner moved into the applier.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    log: Arc<Mutex<Vec<String>>>,
    fail_matching: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner that fails any command containing `pattern`.
    pub fn failing_on(pattern: impl Into<String>) -> Self {
        Self {
            log: Arc::default(),
            fail_matching: Some(pattern.into()),
        }
    }

    /// All commands recorded so far, in execution order.
    pub fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&mut self, cmd: &str) -> LinkMgrResult<String> {
        self.log.lock().unwrap().push(cmd.to_string());
        if let Some(pattern) = &self.fail_matching {
            if cmd.contains(pattern.as_str()) {
                return Err(LinkMgrError::ShellCommandFailed {
                    command: cmd.to_string(),
                    exit_code: 1,
                    output: "injected failure".to_string(),
                });
            }
        }
        Ok(String::new())
    }
}

/// Interface directory backed by a fixed name set.
#[derive(Debug, Clone, Default)]
pub struct StaticNetDir(BTreeSet<String>);

impl StaticNetDir {
    pub fn of(names: &[&str]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl NetDir for StaticNetDir {
    fn list(&self) -> LinkMgrResult<BTreeSet<String>> {
        Ok(self.0.clone())
    }
}

/// Module probe backed by a fixed set of loaded module names.
#[derive(Debug, Clone, Default)]
pub struct StaticModules(BTreeSet<String>);

impl StaticModules {
    pub fn of(names: &[&str]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }

    pub fn none() -> Self {
        Self::default()
    }
}

impl ModulePresence for StaticModules {
    fn is_present(&self, module: KernelModule) -> bool {
        self.0.contains(module.name())
    }
}

/// Wires a manager from fixture parts.
pub fn manager(
    config: ConfigTree,
    netdir: StaticNetDir,
    modules: StaticModules,
    runner: RecordingRunner,
) -> LinkMgr<StaticNetDir, StaticModules, RecordingRunner> {
    LinkMgr::new(config, Applier::new(netdir, modules, runner))
}

/// Configuration tree fixtures for common scenarios.
pub mod config_fixtures {
    use super::ConfigTree;

    fn tunnel_path(name: &str, field: &str) -> String {
        format!("interfaces l2tpv3 {} {}", name, field)
    }

    fn vlan_path(name: &str, field: &str) -> String {
        format!("interfaces vlan {} {}", name, field)
    }

    /// Fully-specified UDP tunnel with identity ids 100/200 and 1/2.
    pub fn l2tpv3_minimal(name: &str) -> ConfigTree {
        let mut tree = ConfigTree::new();
        tree.set(tunnel_path(name, "tunnel-id"), "100")
            .set(tunnel_path(name, "peer-tunnel-id"), "200")
            .set(tunnel_path(name, "session-id"), "1")
            .set(tunnel_path(name, "peer-session-id"), "2")
            .set(tunnel_path(name, "local-ip"), "10.0.0.1")
            .set(tunnel_path(name, "remote-ip"), "10.0.0.2");
        tree
    }

    /// Removed tunnel: only effective identity fields remain.
    pub fn l2tpv3_deleted(name: &str, tunnel_id: &str, session_id: &str) -> ConfigTree {
        let mut tree = ConfigTree::new();
        tree.set_effective(tunnel_path(name, "tunnel-id"), tunnel_id)
            .set_effective(tunnel_path(name, "session-id"), session_id);
        tree
    }

    /// VLAN sub-interface present in desired state with one address.
    pub fn vlan_basic(name: &str) -> ConfigTree {
        let mut tree = ConfigTree::new();
        tree.push(vlan_path(name, "address"), "10.1.1.1/24");
        tree
    }
}
