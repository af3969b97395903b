//! Lifecycle planner - derives the ordered operation sequence
//!
//! The planner compares one record against the live interface name set and
//! emits operations in the only order that converges safely: kernel
//! prerequisites first, children destroyed before parents, tunnels
//! destroyed before recreation, attributes and addresses applied before
//! the interface is brought up.

use std::collections::BTreeSet;

use linkmgr_common::netdir::descendants_of;

use crate::modules::KernelModule;
use crate::types::{InterfaceRecord, KindParams};

/// Non-identity attributes applied after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    pub description: String,
    pub mtu: u32,
    /// Ordered CIDR list; recreation cleared any stale assignments, so
    /// every desired address is re-added.
    pub addresses: Vec<String>,
}

impl Attributes {
    fn of(record: &InterfaceRecord) -> Self {
        Self {
            description: record.description.clone(),
            mtu: record.mtu,
            addresses: record.addresses.clone(),
        }
    }
}

/// How an interface is torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyMethod {
    /// Plain link deletion by name (VLANs and their descendants).
    Link,
    /// L2TP teardown: session first, then the tunnel.
    L2tp {
        tunnel_id: String,
        session_id: String,
    },
}

/// One step of a reconciliation plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Make a kernel facility available (checked before loading).
    EnsureModule(KernelModule),
    /// Remove an interface; silently succeeds if the name is absent.
    Destroy { name: String, method: DestroyMethod },
    /// Create the interface. VLAN creation is idempotent at the
    /// OS-existence level; tunnel creation always runs.
    Create(InterfaceRecord),
    /// Apply description, MTU and the ordered address list.
    ApplyAttributes { name: String, attrs: Attributes },
    /// Bring the interface administratively up; always the last step.
    AdminUp(String),
}

fn destroy_op(record: &InterfaceRecord) -> Operation {
    let method = match &record.params {
        KindParams::Vlan(_) => DestroyMethod::Link,
        KindParams::L2tpv3(p) => DestroyMethod::L2tp {
            tunnel_id: p.tunnel_id.clone(),
            session_id: p.session_id.clone(),
        },
    };
    Operation::Destroy {
        name: record.name.clone(),
        method,
    }
}

/// Derives the plan for one record against the live name set.
pub fn plan(record: &InterfaceRecord, existing: &BTreeSet<String>) -> Vec<Operation> {
    if record.deleted {
        // Teardown only: hierarchical children deepest first, then the
        // interface itself. Nothing is created for a deleted record.
        let mut ops: Vec<Operation> = descendants_of(&record.name, existing)
            .into_iter()
            .map(|name| Operation::Destroy {
                name,
                method: DestroyMethod::Link,
            })
            .collect();
        ops.push(destroy_op(record));
        return ops;
    }

    let mut ops = Vec::new();

    if let KindParams::L2tpv3(params) = &record.params {
        for module in KernelModule::required_for(params.encapsulation) {
            ops.push(Operation::EnsureModule(module));
        }
        // Tunnel identity is immutable post-creation. An existing interface
        // of the same name is destroyed unconditionally, without diffing
        // identity fields, and recreated below.
        if existing.contains(&record.name) {
            ops.push(destroy_op(record));
        }
    }

    ops.push(Operation::Create(record.clone()));
    ops.push(Operation::ApplyAttributes {
        name: record.name.clone(),
        attrs: Attributes::of(record),
    });
    if !record.admin_disabled {
        ops.push(Operation::AdminUp(record.name.clone()));
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{L2tpParams, VlanParams};

    fn tunnel_record(name: &str) -> InterfaceRecord {
        InterfaceRecord::new_l2tpv3(
            name,
            L2tpParams {
                tunnel_id: "100".into(),
                peer_tunnel_id: "200".into(),
                session_id: "1".into(),
                peer_session_id: "2".into(),
                local_address: "10.0.0.1".into(),
                remote_address: "10.0.0.2".into(),
                ..L2tpParams::default()
            },
        )
    }

    fn vlan_record(name: &str) -> InterfaceRecord {
        InterfaceRecord::new_vlan(name, VlanParams::from_name(name).unwrap())
    }

    fn names(set: &[&str]) -> BTreeSet<String> {
        set.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_fresh_tunnel_plan() {
        let record = tunnel_record("l2tpeth10");
        let ops = plan(&record, &BTreeSet::new());

        assert_eq!(
            ops,
            vec![
                Operation::EnsureModule(KernelModule::L2tpEth),
                Operation::EnsureModule(KernelModule::L2tpNetlink),
                Operation::Create(record.clone()),
                Operation::ApplyAttributes {
                    name: "l2tpeth10".into(),
                    attrs: Attributes {
                        description: String::new(),
                        mtu: 1488,
                        addresses: Vec::new(),
                    },
                },
                Operation::AdminUp("l2tpeth10".into()),
            ]
        );
    }

    #[test]
    fn test_existing_tunnel_is_destroyed_first() {
        // Identity fields are never diffed: any existing interface of the
        // same name means destroy-then-recreate.
        let record = tunnel_record("l2tpeth10");
        let ops = plan(&record, &names(&["l2tpeth10", "eth0"]));

        let destroy_pos = ops
            .iter()
            .position(|op| matches!(op, Operation::Destroy { .. }))
            .expect("plan must contain a destroy");
        let create_pos = ops
            .iter()
            .position(|op| matches!(op, Operation::Create(_)))
            .expect("plan must contain a create");
        assert!(destroy_pos < create_pos);

        assert!(matches!(
            &ops[destroy_pos],
            Operation::Destroy {
                name,
                method: DestroyMethod::L2tp { tunnel_id, session_id },
            } if name == "l2tpeth10" && tunnel_id == "100" && session_id == "1"
        ));
    }

    #[test]
    fn test_ip_encapsulation_pulls_extra_modules() {
        let mut record = tunnel_record("l2tpeth10");
        let KindParams::L2tpv3(params) = &mut record.params else {
            unreachable!()
        };
        params.encapsulation = crate::types::Encapsulation::Ip;

        let ops = plan(&record, &BTreeSet::new());
        let modules: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                Operation::EnsureModule(m) => Some(*m),
                _ => None,
            })
            .collect();
        assert_eq!(
            modules,
            vec![
                KernelModule::L2tpEth,
                KernelModule::L2tpNetlink,
                KernelModule::L2tpIp,
                KernelModule::L2tpIp6,
            ]
        );
    }

    #[test]
    fn test_admin_disabled_suppresses_admin_up() {
        let mut record = tunnel_record("l2tpeth10");
        record.admin_disabled = true;

        let ops = plan(&record, &BTreeSet::new());
        assert!(!ops.iter().any(|op| matches!(op, Operation::AdminUp(_))));
        // Attributes still applied
        assert!(ops
            .iter()
            .any(|op| matches!(op, Operation::ApplyAttributes { .. })));
    }

    #[test]
    fn test_admin_up_is_last() {
        let ops = plan(&tunnel_record("l2tpeth10"), &BTreeSet::new());
        assert!(matches!(ops.last(), Some(Operation::AdminUp(_))));
    }

    #[test]
    fn test_deleted_record_short_circuits() {
        let mut record = tunnel_record("l2tpeth10");
        record.deleted = true;

        let ops = plan(&record, &names(&["l2tpeth10"]));
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], Operation::Destroy { name, .. } if name == "l2tpeth10"));
        assert!(!ops.iter().any(|op| {
            matches!(
                op,
                Operation::Create(_) | Operation::ApplyAttributes { .. } | Operation::AdminUp(_)
            )
        }));
    }

    #[test]
    fn test_deleted_vlan_destroys_descendants_deepest_first() {
        let mut record = vlan_record("eth0.10");
        record.deleted = true;

        let existing = names(&["eth0", "eth0.10", "eth0.10.20", "eth0.10.30", "eth1.10"]);
        let ops = plan(&record, &existing);

        let destroyed: Vec<_> = ops
            .iter()
            .map(|op| match op {
                Operation::Destroy { name, .. } => name.clone(),
                other => panic!("unexpected operation {:?}", other),
            })
            .collect();
        assert_eq!(destroyed, vec!["eth0.10.20", "eth0.10.30", "eth0.10"]);
    }

    #[test]
    fn test_vlan_plan_has_no_modules_or_destroy() {
        let ops = plan(&vlan_record("eth0.10"), &names(&["eth0"]));
        assert!(!ops
            .iter()
            .any(|op| matches!(op, Operation::EnsureModule(_) | Operation::Destroy { .. })));
        assert!(matches!(&ops[0], Operation::Create(_)));
    }

    #[test]
    fn test_vlan_create_planned_even_when_present() {
        // Existence is resolved at apply time: the create step stays in the
        // plan and degenerates to a no-op there, while attributes still run.
        let ops = plan(&vlan_record("eth0.10"), &names(&["eth0", "eth0.10"]));
        assert!(ops.iter().any(|op| matches!(op, Operation::Create(_))));
        assert!(ops
            .iter()
            .any(|op| matches!(op, Operation::ApplyAttributes { .. })));
    }
}
