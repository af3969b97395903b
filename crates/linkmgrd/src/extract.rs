//! Config extractor - builds one normalized interface record per run
//!
//! Desired state is read from the configuration tree under the instance's
//! subtree. When the desired node is gone the record is marked deleted and
//! only the identity fields needed for teardown are recovered from the
//! effective (last-applied) snapshot: tunnel-id and session-id for a
//! tunnel, nothing extra for a VLAN (the name alone suffices).

use linkmgr_common::config::{ConfigScope, ConfigTree};
use linkmgr_common::error::{LinkMgrError, LinkMgrResult};

use crate::paths::{L2TPV3_ROOT, VLAN_ROOT};
use crate::types::{InterfaceRecord, L2tpParams, VlanParams};

/// Extracts the record for one interface instance.
///
/// Kind resolution: a name present under the l2tpv3 subtree (desired or
/// effective) is a tunnel; otherwise a name parsing as `parent.vid[.vid]`
/// is a VLAN sub-interface; anything else is a configuration error.
pub fn extract(name: &str, config: &ConfigTree) -> LinkMgrResult<InterfaceRecord> {
    let tunnel_level = format!("{} {}", L2TPV3_ROOT, name);
    if config.exists(&tunnel_level) {
        return extract_l2tpv3(name, &config.scoped(&tunnel_level));
    }
    if config.exists_effective(&tunnel_level) {
        return Ok(deleted_l2tpv3(name, &config.scoped(&tunnel_level)));
    }

    if let Some(params) = VlanParams::from_name(name) {
        let vlan_level = format!("{} {}", VLAN_ROOT, name);
        if config.exists(&vlan_level) {
            return extract_vlan(name, params, &config.scoped(&vlan_level));
        }
        let mut record = InterfaceRecord::new_vlan(name, params);
        record.deleted = true;
        return Ok(record);
    }

    Err(LinkMgrError::invalid_config(
        "interface",
        format!("cannot determine interface kind for '{}'", name),
    ))
}

fn parse_u16(cfg: &ConfigScope<'_>, field: &str, name: &str) -> LinkMgrResult<Option<u16>> {
    match cfg.value(field) {
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            LinkMgrError::invalid_config(field, format!("invalid value '{}' for {}", raw, name))
        }),
        None => Ok(None),
    }
}

fn parse_u32(cfg: &ConfigScope<'_>, field: &str, name: &str) -> LinkMgrResult<Option<u32>> {
    match cfg.value(field) {
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            LinkMgrError::invalid_config(field, format!("invalid value '{}' for {}", raw, name))
        }),
        None => Ok(None),
    }
}

fn extract_l2tpv3(name: &str, cfg: &ConfigScope<'_>) -> LinkMgrResult<InterfaceRecord> {
    use crate::paths::l2tpv3_fields::*;

    let mut params = L2tpParams::default();

    if let Some(raw) = cfg.value(ENCAPSULATION) {
        params.encapsulation = raw.parse().map_err(|e: String| {
            LinkMgrError::invalid_config(ENCAPSULATION, format!("{} for {}", e, name))
        })?;
    }
    if let Some(v) = cfg.value(LOCAL_IP) {
        params.local_address = v.to_string();
    }
    if let Some(v) = cfg.value(REMOTE_IP) {
        params.remote_address = v.to_string();
    }
    if let Some(v) = cfg.value(TUNNEL_ID) {
        params.tunnel_id = v.to_string();
    }
    if let Some(v) = cfg.value(PEER_TUNNEL_ID) {
        params.peer_tunnel_id = v.to_string();
    }
    if let Some(v) = cfg.value(SESSION_ID) {
        params.session_id = v.to_string();
    }
    if let Some(v) = cfg.value(PEER_SESSION_ID) {
        params.peer_session_id = v.to_string();
    }
    if let Some(port) = parse_u16(cfg, SOURCE_PORT, name)? {
        params.local_port = port;
    }
    if let Some(port) = parse_u16(cfg, DESTINATION_PORT, name)? {
        params.remote_port = port;
    }

    let mut record = InterfaceRecord::new_l2tpv3(name, params);
    record.addresses = cfg.values(ADDRESS);
    if let Some(v) = cfg.value(DESCRIPTION) {
        record.description = v.to_string();
    }
    if let Some(mtu) = parse_u32(cfg, MTU, name)? {
        record.mtu = mtu;
    }
    record.admin_disabled = cfg.exists(DISABLE);

    Ok(record)
}

fn deleted_l2tpv3(name: &str, cfg: &ConfigScope<'_>) -> InterfaceRecord {
    use crate::paths::l2tpv3_fields::{SESSION_ID, TUNNEL_ID};

    let mut params = L2tpParams::default();
    if let Some(v) = cfg.effective_value(TUNNEL_ID) {
        params.tunnel_id = v.to_string();
    }
    if let Some(v) = cfg.effective_value(SESSION_ID) {
        params.session_id = v.to_string();
    }

    let mut record = InterfaceRecord::new_l2tpv3(name, params);
    record.deleted = true;
    record
}

fn extract_vlan(
    name: &str,
    mut params: VlanParams,
    cfg: &ConfigScope<'_>,
) -> LinkMgrResult<InterfaceRecord> {
    use crate::paths::vlan_fields::*;

    params.ethertype = cfg.value(ETHERTYPE).map(str::to_string);
    params.ingress_qos = cfg.value(INGRESS_QOS).map(str::to_string);
    params.egress_qos = cfg.value(EGRESS_QOS).map(str::to_string);

    let mut record = InterfaceRecord::new_vlan(name, params);
    record.addresses = cfg.values(ADDRESS);
    if let Some(v) = cfg.value(DESCRIPTION) {
        record.description = v.to_string();
    }
    if let Some(mtu) = parse_u32(cfg, MTU, name)? {
        record.mtu = mtu;
    }
    record.admin_disabled = cfg.exists(DISABLE);

    Ok(record)
}
