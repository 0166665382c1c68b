//! Azure networking resource models: VNets, subnets, peerings, NICs, NSGs
//! and public IPs, as delivered by the inventory snapshot.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// An Azure Virtual Network with its subnets and directed peering records.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetwork {
    /// ARM id of the virtual network.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    /// CIDR blocks of the address space, as reported by Azure.
    #[serde(default)]
    pub address_prefixes: Vec<String>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    /// One record per peering declared on this side of a connection.
    #[serde(default)]
    pub peerings: Vec<VnetPeering>,
}

/// An address range inside a [`VirtualNetwork`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address_prefix: String,
    /// Network Security Group id (if attached).
    #[serde(default)]
    pub nsg_id: Option<String>,
    #[serde(default)]
    pub route_table_id: Option<String>,
}

/// Peering state as reported on a peering record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PeeringState {
    Connected,
    Initiated,
    Disconnected,
    #[default]
    Unknown,
}

impl PeeringState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeeringState::Connected => "connected",
            PeeringState::Initiated => "initiated",
            PeeringState::Disconnected => "disconnected",
            PeeringState::Unknown => "unknown",
        }
    }
}

impl From<&str> for PeeringState {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "connected" => PeeringState::Connected,
            "initiated" => PeeringState::Initiated,
            "disconnected" => PeeringState::Disconnected,
            _ => PeeringState::Unknown,
        }
    }
}

impl fmt::Display for PeeringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PeeringState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PeeringState {
    fn deserialize<D>(deserializer: D) -> Result<PeeringState, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Azure reports null for peerings still being provisioned.
        let s: Option<String> = Option::deserialize(deserializer)?;
        Ok(s.as_deref().map(PeeringState::from).unwrap_or_default())
    }
}

/// A directed peering record, declared on one VNet and pointing at another.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VnetPeering {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: PeeringState,
    #[serde(rename = "remoteVNetId", default)]
    pub remote_vnet_id: String,
    #[serde(default)]
    pub allow_forwarded_traffic: bool,
    #[serde(default)]
    pub allow_gateway_transit: bool,
    #[serde(default)]
    pub use_remote_gateways: bool,
}

/// One allow/deny rule of a [`NetworkSecurityGroup`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SecurityRule {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub priority: u32,
    /// `Inbound` or `Outbound`.
    #[serde(default)]
    pub direction: String,
    /// `Allow` or `Deny`.
    #[serde(default)]
    pub access: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub source_address_prefix: String,
    #[serde(default)]
    pub destination_address_prefix: String,
    #[serde(default)]
    pub destination_port_range: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSecurityGroup {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rules: Vec<SecurityRule>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicIpAddress {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Reserved but unassigned addresses come back as null or "".
    #[serde(default)]
    pub ip_address: Option<String>,
}

impl PublicIpAddress {
    /// The assigned address, if any.
    pub fn assigned_address(&self) -> Option<&str> {
        self.ip_address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

/// One IP configuration of a [`NetworkInterface`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IpConfiguration {
    #[serde(rename = "privateIP", default)]
    pub private_ip: Option<String>,
    #[serde(default)]
    pub subnet_id: Option<String>,
    #[serde(rename = "publicIPId", default)]
    pub public_ip_id: Option<String>,
}

/// Network interface. Input only, folded into its VM by the correlator.
///
/// Ownership is declared by the VM (`nicIds`), not by the NIC.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterface {
    pub id: String,
    #[serde(default)]
    pub ip_configurations: Vec<IpConfiguration>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteTable {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peering_state_from_str() {
        assert_eq!(PeeringState::from("Connected"), PeeringState::Connected);
        assert_eq!(PeeringState::from(" INITIATED "), PeeringState::Initiated);
        assert_eq!(PeeringState::from("Disconnected"), PeeringState::Disconnected);
        assert_eq!(PeeringState::from("Updating"), PeeringState::Unknown);
    }

    #[test]
    fn test_peering_deserialize_null_state() {
        let json = r#"{"name":"hub-to-spoke","state":null,"remoteVNetId":"/x/spoke"}"#;
        let peering: VnetPeering = serde_json::from_str(json).expect("Error parsing peering");
        assert_eq!(peering.state, PeeringState::Unknown);
        assert_eq!(peering.remote_vnet_id, "/x/spoke");
        assert!(!peering.allow_gateway_transit);
    }

    #[test]
    fn test_vnet_deserialize_defaults() {
        let vnet: VirtualNetwork =
            serde_json::from_str(r#"{"id":"/x/vnet-a"}"#).expect("Error parsing vnet");
        assert_eq!(vnet.name, "");
        assert!(vnet.subnets.is_empty());
        assert!(vnet.peerings.is_empty());
    }

    #[test]
    fn test_subnet_field_names() {
        let json = r#"{"id":"/x/s","name":"default","addressPrefix":"10.0.1.0/24","nsgId":"/x/nsg"}"#;
        let subnet: Subnet = serde_json::from_str(json).expect("Error parsing subnet");
        assert_eq!(subnet.address_prefix, "10.0.1.0/24");
        assert_eq!(subnet.nsg_id.as_deref(), Some("/x/nsg"));
        assert_eq!(subnet.route_table_id, None);
    }

    #[test]
    fn test_public_ip_assigned_address() {
        let mut pip = PublicIpAddress {
            id: "/x/pip".to_string(),
            ..Default::default()
        };
        assert_eq!(pip.assigned_address(), None);
        pip.ip_address = Some("".to_string());
        assert_eq!(pip.assigned_address(), None, "empty string is unassigned");
        pip.ip_address = Some("20.1.2.3".to_string());
        assert_eq!(pip.assigned_address(), Some("20.1.2.3"));
    }

    #[test]
    fn test_nic_ip_configuration_names() {
        let json = r#"{"id":"/x/nic","ipConfigurations":[{"privateIP":"10.0.1.4","subnetId":"/x/s","publicIPId":"/x/pip"}]}"#;
        let nic: NetworkInterface = serde_json::from_str(json).expect("Error parsing nic");
        assert_eq!(nic.ip_configurations.len(), 1);
        assert_eq!(nic.ip_configurations[0].private_ip.as_deref(), Some("10.0.1.4"));
        assert_eq!(nic.ip_configurations[0].public_ip_id.as_deref(), Some("/x/pip"));
    }
}
