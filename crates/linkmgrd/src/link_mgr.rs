//! LinkMgr - one-shot reconciliation of a single interface instance

use tracing::{info, instrument};

use linkmgr_common::config::ConfigTree;
use linkmgr_common::error::LinkMgrResult;
use linkmgr_common::netdir::{NetDir, SysfsNetDir};
use linkmgr_common::shell::{CommandRunner, ShellRunner};

use crate::apply::Applier;
use crate::extract::extract;
use crate::modules::{ModulePresence, SysfsModules};
use crate::plan::plan;
use crate::validate::validate;

/// Reconciles one named interface instance against its desired
/// configuration: extract, validate, plan, apply.
///
/// A run is strictly sequential and holds no state beyond its own
/// duration. Runs on *different* instance names are independent; callers
/// invoking runs concurrently must serialize overlapping names themselves.
pub struct LinkMgr<D, P, R> {
    config: ConfigTree,
    applier: Applier<D, P, R>,
}

impl LinkMgr<SysfsNetDir, SysfsModules, ShellRunner> {
    /// Creates a manager wired to the live system: sysfs interface
    /// directory, sysfs module markers, real shell.
    pub fn system(config: ConfigTree) -> Self {
        Self::new(
            config,
            Applier::new(SysfsNetDir::new(), SysfsModules::new(), ShellRunner),
        )
    }
}

impl<D, P, R> LinkMgr<D, P, R>
where
    D: NetDir,
    P: ModulePresence,
    R: CommandRunner,
{
    pub fn new(config: ConfigTree, applier: Applier<D, P, R>) -> Self {
        Self { config, applier }
    }

    /// Converges the OS state of `name` with the configuration tree.
    ///
    /// Fails fast on incomplete configuration (before any OS mutation),
    /// on unavailable kernel prerequisites, and on the first failing
    /// operation; rerunning after the root cause is fixed converges.
    #[instrument(skip(self))]
    pub async fn reconcile(&mut self, name: &str) -> LinkMgrResult<()> {
        let record = extract(name, &self.config)?;
        validate(&record)?;

        let existing = self.applier.netdir().list()?;
        let operations = plan(&record, &existing);
        info!(
            "Reconciling {} ({}, {}): {} operations",
            name,
            record.params.kind_name(),
            if record.deleted { "delete" } else { "converge" },
            operations.len()
        );

        self.applier.apply(&operations).await
    }
}
