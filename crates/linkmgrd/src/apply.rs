//! Plan applier - executes operations strictly in sequence
//!
//! The first failing operation aborts the remaining plan and surfaces with
//! its context; there is no rollback. Re-running the whole reconciliation
//! later continues converging because destroys tolerate absent names and
//! VLAN creation tolerates existing ones.

use tracing::{debug, info};

use linkmgr_common::error::{LinkMgrError, LinkMgrResult};
use linkmgr_common::netdir::NetDir;
use linkmgr_common::shell::CommandRunner;

use crate::commands::*;
use crate::modules::{KernelModule, ModulePresence};
use crate::plan::{Attributes, DestroyMethod, Operation};
use crate::types::{InterfaceRecord, KindParams};

/// Executes reconciliation plans against the OS.
///
/// All three OS touchpoints are injected: the interface directory, the
/// kernel module probe, and the command runner.
pub struct Applier<D, P, R> {
    netdir: D,
    modules: P,
    runner: R,
}

impl<D, P, R> Applier<D, P, R>
where
    D: NetDir,
    P: ModulePresence,
    R: CommandRunner,
{
    pub fn new(netdir: D, modules: P, runner: R) -> Self {
        Self {
            netdir,
            modules,
            runner,
        }
    }

    /// The interface directory, shared with the planner.
    pub fn netdir(&self) -> &D {
        &self.netdir
    }

    /// Applies the operations in order, stopping at the first failure.
    pub async fn apply(&mut self, operations: &[Operation]) -> LinkMgrResult<()> {
        for operation in operations {
            self.apply_one(operation).await?;
        }
        Ok(())
    }

    async fn apply_one(&mut self, operation: &Operation) -> LinkMgrResult<()> {
        match operation {
            Operation::EnsureModule(module) => self.ensure_module(*module).await,
            Operation::Destroy { name, method } => self.destroy(name, method).await,
            Operation::Create(record) => self.create(record).await,
            Operation::ApplyAttributes { name, attrs } => self.apply_attributes(name, attrs).await,
            Operation::AdminUp(name) => {
                self.runner.run(&build_set_admin_cmd(name, true)).await?;
                info!("Enabled {}", name);
                Ok(())
            }
        }
    }

    async fn ensure_module(&mut self, module: KernelModule) -> LinkMgrResult<()> {
        if self.modules.is_present(module) {
            debug!("Kernel module {} already loaded", module.name());
            return Ok(());
        }

        self.runner
            .run(&build_modprobe_cmd(module))
            .await
            .map_err(|e| LinkMgrError::prerequisite(module.name(), e.to_string()))?;
        info!("Loaded kernel module {}", module.name());
        Ok(())
    }

    async fn destroy(&mut self, name: &str, method: &DestroyMethod) -> LinkMgrResult<()> {
        let existing = self.netdir.list()?;
        if !existing.contains(name) {
            debug!("Interface {} not present, nothing to destroy", name);
            return Ok(());
        }

        match method {
            DestroyMethod::Link => {
                self.runner.run(&build_del_link_cmd(name)).await?;
            }
            DestroyMethod::L2tp {
                tunnel_id,
                session_id,
            } => {
                // The link goes down before the session/tunnel teardown;
                // removing the session deletes the interface itself.
                self.runner.run(&build_set_admin_cmd(name, false)).await?;
                self.runner
                    .run(&build_l2tp_del_session_cmd(tunnel_id, session_id))
                    .await?;
                self.runner
                    .run(&build_l2tp_del_tunnel_cmd(tunnel_id))
                    .await?;
            }
        }
        info!("Destroyed {}", name);
        Ok(())
    }

    async fn create(&mut self, record: &InterfaceRecord) -> LinkMgrResult<()> {
        match &record.params {
            KindParams::Vlan(params) => {
                let existing = self.netdir.list()?;
                if existing.contains(&record.name) {
                    debug!("Interface {} already exists, skipping create", record.name);
                    return Ok(());
                }
                self.runner
                    .run(&build_add_vlan_cmd(&record.name, params))
                    .await?;
            }
            KindParams::L2tpv3(params) => {
                self.runner
                    .run(&build_l2tp_add_tunnel_cmd(params))
                    .await?;
                self.runner
                    .run(&build_l2tp_add_session_cmd(&record.name, params))
                    .await?;
            }
        }
        info!("Created {} ({})", record.name, record.params.kind_name());
        Ok(())
    }

    async fn apply_attributes(&mut self, name: &str, attrs: &Attributes) -> LinkMgrResult<()> {
        if !attrs.description.is_empty() {
            self.runner
                .run(&build_set_alias_cmd(name, &attrs.description))
                .await?;
        }
        self.runner
            .run(&build_set_mtu_cmd(name, attrs.mtu))
            .await?;
        for address in &attrs.addresses {
            self.runner.run(&build_add_addr_cmd(name, address)).await?;
        }
        debug!("Applied attributes to {}", name);
        Ok(())
    }
}
