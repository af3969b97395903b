//! Shell command builders for interface operations

use linkmgr_common::shell::{shellquote, IP_CMD, MODPROBE_CMD};

use crate::modules::KernelModule;
use crate::types::{Encapsulation, L2tpParams, VlanParams};

/// Build VLAN sub-interface creation command
///
/// Creates both 802.1q and Q-in-Q interfaces; the ethertype selects the
/// protocol, the optional QoS maps translate between VLAN header prio and
/// internal packet priority.
pub fn build_add_vlan_cmd(name: &str, params: &VlanParams) -> String {
    let mut cmd = format!(
        "{} link add link {} name {} type vlan",
        IP_CMD,
        shellquote(&params.link_parent()),
        shellquote(name)
    );
    if let Some(proto) = &params.ethertype {
        cmd.push_str(&format!(" proto {}", shellquote(proto)));
    }
    cmd.push_str(&format!(" id {}", params.leaf_vlan_id()));
    if let Some(qos) = &params.egress_qos {
        cmd.push_str(&format!(" egress-qos-map {}", shellquote(qos)));
    }
    if let Some(qos) = &params.ingress_qos {
        cmd.push_str(&format!(" ingress-qos-map {}", shellquote(qos)));
    }
    cmd
}

/// Build link deletion command
pub fn build_del_link_cmd(name: &str) -> String {
    format!("{} link del {}", IP_CMD, shellquote(name))
}

/// Build L2TPv3 tunnel creation command
///
/// UDP encapsulation additionally carries the source/destination ports.
pub fn build_l2tp_add_tunnel_cmd(params: &L2tpParams) -> String {
    let mut cmd = format!(
        "{} l2tp add tunnel tunnel_id {} peer_tunnel_id {} encap {} local {} remote {}",
        IP_CMD,
        shellquote(&params.tunnel_id),
        shellquote(&params.peer_tunnel_id),
        params.encapsulation.as_str(),
        shellquote(&params.local_address),
        shellquote(&params.remote_address)
    );
    if params.encapsulation == Encapsulation::Udp {
        cmd.push_str(&format!(
            " udp_sport {} udp_dport {}",
            params.local_port, params.remote_port
        ));
    }
    cmd
}

/// Build L2TPv3 session creation command
pub fn build_l2tp_add_session_cmd(name: &str, params: &L2tpParams) -> String {
    format!(
        "{} l2tp add session name {} tunnel_id {} session_id {} peer_session_id {}",
        IP_CMD,
        shellquote(name),
        shellquote(&params.tunnel_id),
        shellquote(&params.session_id),
        shellquote(&params.peer_session_id)
    )
}

/// Build L2TPv3 session deletion command
pub fn build_l2tp_del_session_cmd(tunnel_id: &str, session_id: &str) -> String {
    format!(
        "{} l2tp del session tunnel_id {} session_id {}",
        IP_CMD,
        shellquote(tunnel_id),
        shellquote(session_id)
    )
}

/// Build L2TPv3 tunnel deletion command
pub fn build_l2tp_del_tunnel_cmd(tunnel_id: &str) -> String {
    format!("{} l2tp del tunnel tunnel_id {}", IP_CMD, shellquote(tunnel_id))
}

/// Build interface alias command
pub fn build_set_alias_cmd(name: &str, alias: &str) -> String {
    format!(
        "{} link set dev {} alias {}",
        IP_CMD,
        shellquote(name),
        shellquote(alias)
    )
}

/// Build MTU command
pub fn build_set_mtu_cmd(name: &str, mtu: u32) -> String {
    format!("{} link set dev {} mtu {}", IP_CMD, shellquote(name), mtu)
}

/// Build address assignment command
pub fn build_add_addr_cmd(name: &str, cidr: &str) -> String {
    format!(
        "{} addr add {} dev {}",
        IP_CMD,
        shellquote(cidr),
        shellquote(name)
    )
}

/// Build admin state command
pub fn build_set_admin_cmd(name: &str, up: bool) -> String {
    let state = if up { "up" } else { "down" };
    format!("{} link set dev {} {}", IP_CMD, shellquote(name), state)
}

/// Build kernel module load command
pub fn build_modprobe_cmd(module: KernelModule) -> String {
    format!("{} {}", MODPROBE_CMD, module.name())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlan_params(name: &str) -> VlanParams {
        VlanParams::from_name(name).unwrap()
    }

    fn tunnel_params() -> L2tpParams {
        L2tpParams {
            tunnel_id: "100".into(),
            peer_tunnel_id: "200".into(),
            session_id: "1".into(),
            peer_session_id: "2".into(),
            local_address: "10.0.0.1".into(),
            remote_address: "10.0.0.2".into(),
            ..L2tpParams::default()
        }
    }

    #[test]
    fn test_build_add_vlan_cmd() {
        let cmd = build_add_vlan_cmd("eth0.10", &vlan_params("eth0.10"));
        assert!(cmd.contains("link add link \"eth0\""));
        assert!(cmd.contains("name \"eth0.10\""));
        assert!(cmd.contains("type vlan id 10"));
        assert!(!cmd.contains("proto"));
    }

    #[test]
    fn test_build_add_vlan_cmd_q_in_q() {
        let cmd = build_add_vlan_cmd("eth0.10.20", &vlan_params("eth0.10.20"));
        assert!(cmd.contains("link add link \"eth0.10\""));
        assert!(cmd.contains("name \"eth0.10.20\""));
        assert!(cmd.contains("id 20"));
    }

    #[test]
    fn test_build_add_vlan_cmd_options() {
        let mut params = vlan_params("eth0.10");
        params.ethertype = Some("802.1ad".into());
        params.ingress_qos = Some("1:4".into());
        params.egress_qos = Some("4:1".into());

        let cmd = build_add_vlan_cmd("eth0.10", &params);
        assert!(cmd.contains("proto \"802.1ad\""));
        assert!(cmd.contains("egress-qos-map \"4:1\""));
        assert!(cmd.contains("ingress-qos-map \"1:4\""));
    }

    #[test]
    fn test_build_del_link_cmd() {
        assert_eq!(build_del_link_cmd("eth0.10"), "/sbin/ip link del \"eth0.10\"");
    }

    #[test]
    fn test_build_l2tp_add_tunnel_cmd_udp() {
        let cmd = build_l2tp_add_tunnel_cmd(&tunnel_params());
        assert!(cmd.contains("l2tp add tunnel tunnel_id \"100\""));
        assert!(cmd.contains("peer_tunnel_id \"200\""));
        assert!(cmd.contains("encap udp"));
        assert!(cmd.contains("local \"10.0.0.1\""));
        assert!(cmd.contains("remote \"10.0.0.2\""));
        assert!(cmd.contains("udp_sport 5000 udp_dport 5000"));
    }

    #[test]
    fn test_build_l2tp_add_tunnel_cmd_ip_has_no_ports() {
        let mut params = tunnel_params();
        params.encapsulation = Encapsulation::Ip;
        let cmd = build_l2tp_add_tunnel_cmd(&params);
        assert!(cmd.contains("encap ip"));
        assert!(!cmd.contains("udp_sport"));
    }

    #[test]
    fn test_build_l2tp_add_session_cmd() {
        let cmd = build_l2tp_add_session_cmd("l2tpeth10", &tunnel_params());
        assert!(cmd.contains("l2tp add session name \"l2tpeth10\""));
        assert!(cmd.contains("tunnel_id \"100\""));
        assert!(cmd.contains("session_id \"1\""));
        assert!(cmd.contains("peer_session_id \"2\""));
    }

    #[test]
    fn test_build_l2tp_del_cmds() {
        let cmd = build_l2tp_del_session_cmd("100", "1");
        assert!(cmd.contains("l2tp del session tunnel_id \"100\" session_id \"1\""));

        let cmd = build_l2tp_del_tunnel_cmd("100");
        assert!(cmd.contains("l2tp del tunnel tunnel_id \"100\""));
    }

    #[test]
    fn test_build_attribute_cmds() {
        assert!(build_set_alias_cmd("eth0.10", "uplink").contains("alias \"uplink\""));
        assert!(build_set_mtu_cmd("eth0.10", 1488).contains("mtu 1488"));
        assert!(build_add_addr_cmd("eth0.10", "10.1.1.1/24")
            .contains("addr add \"10.1.1.1/24\" dev \"eth0.10\""));
        assert!(build_set_admin_cmd("eth0.10", true).ends_with(" up"));
        assert!(build_set_admin_cmd("eth0.10", false).ends_with(" down"));
    }

    #[test]
    fn test_build_modprobe_cmd() {
        assert_eq!(
            build_modprobe_cmd(KernelModule::L2tpEth),
            "/sbin/modprobe l2tp_eth"
        );
    }

    #[test]
    fn test_shellquote_safety() {
        // Dangerous names are neutralized by quoting
        let cmd = build_del_link_cmd("eth0; rm -rf /");
        assert!(cmd.contains("\"eth0; rm -rf /\""));
    }
}
