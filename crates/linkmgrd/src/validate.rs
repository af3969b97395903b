//! Record validation - completeness checks before any OS mutation
//!
//! A deleted record is never validated: an interface being removed must
//! not be blocked by an incomplete configuration. Validation reads only
//! the record; it never consults the interface directory.

use linkmgr_common::error::{LinkMgrError, LinkMgrResult};

use crate::types::{InterfaceRecord, KindParams};

/// One missing-field violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Configuration field that is missing.
    pub field: &'static str,
    /// Human-readable message naming the interface instance.
    pub message: String,
}

/// Returns all missing-field violations for the record.
///
/// Empty for deleted records and for complete ones.
pub fn violations(record: &InterfaceRecord) -> Vec<Violation> {
    if record.deleted {
        return Vec::new();
    }

    let mut found = Vec::new();
    let mut missing = |field: &'static str, empty: bool| {
        if empty {
            found.push(Violation {
                field,
                message: format!(
                    "must configure the {} {} for {}",
                    record.params.kind_name(),
                    field,
                    record.name
                ),
            });
        }
    };

    match &record.params {
        KindParams::L2tpv3(p) => {
            use crate::paths::l2tpv3_fields::*;
            missing(LOCAL_IP, p.local_address.is_empty());
            missing(REMOTE_IP, p.remote_address.is_empty());
            missing(TUNNEL_ID, p.tunnel_id.is_empty());
            missing(PEER_TUNNEL_ID, p.peer_tunnel_id.is_empty());
            missing(SESSION_ID, p.session_id.is_empty());
            missing(PEER_SESSION_ID, p.peer_session_id.is_empty());
        }
        KindParams::Vlan(p) => {
            missing("parent", p.parent.is_empty());
            missing("vlan-id", p.leaf_vlan_id() == 0);
        }
    }

    found
}

/// Validates the record, mapping violations to a configuration error.
pub fn validate(record: &InterfaceRecord) -> LinkMgrResult<()> {
    let found = violations(record);
    match found.first() {
        None => Ok(()),
        Some(first) => Err(LinkMgrError::invalid_config(
            first.field,
            found
                .iter()
                .map(|v| v.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )),
    }
}
