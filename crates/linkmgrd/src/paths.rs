//! Configuration tree paths and field name constants

// Subtree roots
pub const L2TPV3_ROOT: &str = "interfaces l2tpv3";
pub const VLAN_ROOT: &str = "interfaces vlan";

/// l2tpv3 interface fields
pub mod l2tpv3_fields {
    pub const ADDRESS: &str = "address";
    pub const DESCRIPTION: &str = "description";
    pub const DESTINATION_PORT: &str = "destination-port";
    pub const DISABLE: &str = "disable";
    pub const ENCAPSULATION: &str = "encapsulation";
    pub const LOCAL_IP: &str = "local-ip";
    pub const MTU: &str = "mtu";
    pub const PEER_SESSION_ID: &str = "peer-session-id";
    pub const PEER_TUNNEL_ID: &str = "peer-tunnel-id";
    pub const REMOTE_IP: &str = "remote-ip";
    pub const SESSION_ID: &str = "session-id";
    pub const SOURCE_PORT: &str = "source-port";
    pub const TUNNEL_ID: &str = "tunnel-id";
}

/// vlan sub-interface fields
pub mod vlan_fields {
    pub const ADDRESS: &str = "address";
    pub const DESCRIPTION: &str = "description";
    pub const DISABLE: &str = "disable";
    pub const EGRESS_QOS: &str = "egress-qos";
    pub const ETHERTYPE: &str = "ethertype";
    pub const INGRESS_QOS: &str = "ingress-qos";
    pub const MTU: &str = "mtu";
}
