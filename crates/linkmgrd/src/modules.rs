//! Kernel module prerequisites for L2TPv3 interfaces

use std::path::PathBuf;

use crate::types::Encapsulation;

/// Default sysfs directory carrying loaded-module markers.
pub const SYSFS_MODULE_DIR: &str = "/sys/module";

/// Kernel facilities an L2TPv3 interface may depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelModule {
    L2tpEth,
    L2tpNetlink,
    L2tpIp,
    L2tpIp6,
}

impl KernelModule {
    /// Module name as known to modprobe and sysfs.
    pub fn name(&self) -> &'static str {
        match self {
            KernelModule::L2tpEth => "l2tp_eth",
            KernelModule::L2tpNetlink => "l2tp_netlink",
            KernelModule::L2tpIp => "l2tp_ip",
            KernelModule::L2tpIp6 => "l2tp_ip6",
        }
    }

    /// Modules required for a tunnel of the given encapsulation, in load
    /// order. IP encapsulation additionally needs the l2tp_ip family.
    pub fn required_for(encapsulation: Encapsulation) -> Vec<KernelModule> {
        let mut required = vec![KernelModule::L2tpEth, KernelModule::L2tpNetlink];
        if encapsulation == Encapsulation::Ip {
            required.push(KernelModule::L2tpIp);
            required.push(KernelModule::L2tpIp6);
        }
        required
    }
}

/// Presence probe for kernel modules.
///
/// Checking the marker first avoids issuing redundant load commands.
pub trait ModulePresence {
    /// Returns true if the module is already loaded.
    fn is_present(&self, module: KernelModule) -> bool;
}

/// Sysfs-backed module presence probe.
#[derive(Debug, Clone)]
pub struct SysfsModules {
    root: PathBuf,
}

impl SysfsModules {
    /// Creates a probe over [`SYSFS_MODULE_DIR`].
    pub fn new() -> Self {
        Self::with_root(SYSFS_MODULE_DIR)
    }

    /// Creates a probe over an alternate root (used in tests).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for SysfsModules {
    fn default() -> Self {
        Self::new()
    }
}

impl ModulePresence for SysfsModules {
    fn is_present(&self, module: KernelModule) -> bool {
        self.root.join(module.name()).is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_names() {
        assert_eq!(KernelModule::L2tpEth.name(), "l2tp_eth");
        assert_eq!(KernelModule::L2tpNetlink.name(), "l2tp_netlink");
        assert_eq!(KernelModule::L2tpIp.name(), "l2tp_ip");
        assert_eq!(KernelModule::L2tpIp6.name(), "l2tp_ip6");
    }

    #[test]
    fn test_required_for_udp() {
        assert_eq!(
            KernelModule::required_for(Encapsulation::Udp),
            vec![KernelModule::L2tpEth, KernelModule::L2tpNetlink]
        );
    }

    #[test]
    fn test_required_for_ip() {
        assert_eq!(
            KernelModule::required_for(Encapsulation::Ip),
            vec![
                KernelModule::L2tpEth,
                KernelModule::L2tpNetlink,
                KernelModule::L2tpIp,
                KernelModule::L2tpIp6,
            ]
        );
    }

    #[test]
    fn test_sysfs_presence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("l2tp_eth")).unwrap();

        let probe = SysfsModules::with_root(dir.path());
        assert!(probe.is_present(KernelModule::L2tpEth));
        assert!(!probe.is_present(KernelModule::L2tpNetlink));
    }
}
