//! Interface record types and defaults

use std::str::FromStr;

/// Documented defaults merged into every extracted record.
pub mod defaults {
    /// Default MTU for L2TPv3 pseudo-wire interfaces.
    pub const TUNNEL_MTU: u32 = 1488;

    /// Default MTU for VLAN sub-interfaces.
    pub const VLAN_MTU: u32 = 1500;

    /// Default UDP port for both tunnel endpoints.
    pub const L2TP_PORT: u16 = 5000;
}

/// L2TPv3 tunnel encapsulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encapsulation {
    #[default]
    Udp,
    Ip,
}

impl Encapsulation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encapsulation::Udp => "udp",
            Encapsulation::Ip => "ip",
        }
    }
}

impl FromStr for Encapsulation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "udp" => Ok(Encapsulation::Udp),
            "ip" => Ok(Encapsulation::Ip),
            other => Err(format!("unknown encapsulation '{}'", other)),
        }
    }
}

/// Identity parameters of a VLAN sub-interface.
///
/// The interface name encodes the hierarchy: `eth0.10` is an 802.1q
/// sub-interface of `eth0`, `eth0.10.20` a Q-in-Q sub-interface of
/// `eth0.10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanParams {
    /// Physical parent interface (e.g. "eth0").
    pub parent: String,
    /// Outer VLAN ID.
    pub vlan_id: u16,
    /// Inner VLAN ID for Q-in-Q names.
    pub inner_vlan_id: Option<u16>,
    /// Optional 802.1ad/802.1q protocol override.
    pub ethertype: Option<String>,
    /// VLAN header prio → internal priority map for incoming frames.
    pub ingress_qos: Option<String>,
    /// Internal priority → VLAN header prio map for outgoing frames.
    pub egress_qos: Option<String>,
}

impl VlanParams {
    /// Parses a hierarchical VLAN name (`parent.vid` or `parent.vid.vid`).
    pub fn from_name(name: &str) -> Option<Self> {
        let components: Vec<&str> = name.split('.').collect();
        if !(2..=3).contains(&components.len()) || components[0].is_empty() {
            return None;
        }

        let vlan_id: u16 = components[1].parse().ok()?;
        let inner_vlan_id = match components.get(2) {
            Some(c) => Some(c.parse().ok()?),
            None => None,
        };

        Some(Self {
            parent: components[0].to_string(),
            vlan_id,
            inner_vlan_id,
            ethertype: None,
            ingress_qos: None,
            egress_qos: None,
        })
    }

    /// Interface the leaf VLAN hangs off: the physical parent for 802.1q,
    /// the outer sub-interface for Q-in-Q.
    pub fn link_parent(&self) -> String {
        match self.inner_vlan_id {
            Some(_) => format!("{}.{}", self.parent, self.vlan_id),
            None => self.parent.clone(),
        }
    }

    /// The VLAN ID carried by the leaf interface itself.
    pub fn leaf_vlan_id(&self) -> u16 {
        self.inner_vlan_id.unwrap_or(self.vlan_id)
    }
}

/// Identity parameters of an L2TPv3 pseudo-wire interface.
///
/// All identity fields are immutable once the interface exists; changing
/// any of them requires destroy-then-recreate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L2tpParams {
    pub tunnel_id: String,
    pub peer_tunnel_id: String,
    pub session_id: String,
    pub peer_session_id: String,
    pub encapsulation: Encapsulation,
    pub local_address: String,
    pub remote_address: String,
    pub local_port: u16,
    pub remote_port: u16,
}

impl Default for L2tpParams {
    fn default() -> Self {
        Self {
            tunnel_id: String::new(),
            peer_tunnel_id: String::new(),
            session_id: String::new(),
            peer_session_id: String::new(),
            encapsulation: Encapsulation::default(),
            local_address: String::new(),
            remote_address: String::new(),
            local_port: defaults::L2TP_PORT,
            remote_port: defaults::L2TP_PORT,
        }
    }
}

/// Kind-specific identity of an interface record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindParams {
    Vlan(VlanParams),
    L2tpv3(L2tpParams),
}

impl KindParams {
    /// Kind name used in messages and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            KindParams::Vlan(_) => "vlan",
            KindParams::L2tpv3(_) => "l2tpv3",
        }
    }

    /// Tunnel kinds are picky about in-place changes and are always
    /// destroyed before recreation.
    pub fn is_tunnel(&self) -> bool {
        matches!(self, KindParams::L2tpv3(_))
    }
}

/// Desired (or, for deletions, last-applied) state of one interface.
///
/// Constructed fresh each reconciliation run and discarded after the plan
/// is applied; the reconciler holds no record store of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRecord {
    /// OS-unique interface name.
    pub name: String,
    /// Whether the record represents a removal request.
    pub deleted: bool,
    /// Kind-specific identity fields.
    pub params: KindParams,
    /// Ordered CIDR address list.
    pub addresses: Vec<String>,
    /// Interface alias, e.g. for SNMP.
    pub description: String,
    /// Maximum transmission unit.
    pub mtu: u32,
    /// Leave the interface administratively down.
    pub admin_disabled: bool,
}

impl InterfaceRecord {
    /// Creates a VLAN record with attribute defaults.
    pub fn new_vlan(name: impl Into<String>, params: VlanParams) -> Self {
        Self {
            name: name.into(),
            deleted: false,
            params: KindParams::Vlan(params),
            addresses: Vec::new(),
            description: String::new(),
            mtu: defaults::VLAN_MTU,
            admin_disabled: false,
        }
    }

    /// Creates an L2TPv3 record with attribute defaults.
    pub fn new_l2tpv3(name: impl Into<String>, params: L2tpParams) -> Self {
        Self {
            name: name.into(),
            deleted: false,
            params: KindParams::L2tpv3(params),
            addresses: Vec::new(),
            description: String::new(),
            mtu: defaults::TUNNEL_MTU,
            admin_disabled: false,
        }
    }
}
