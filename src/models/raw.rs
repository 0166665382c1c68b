//! Raw inventory snapshot, as assembled by the fetch layer.

use super::{
    LoadBalancer, NetworkInterface, NetworkSecurityGroup, PublicIpAddress, RouteTable,
    VirtualMachine, VirtualNetwork,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Best-effort snapshot of every resource type the diagram needs.
///
/// Any collection may be empty when its fetch failed; the failure is then
/// described in `errors`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawTopology {
    #[serde(default)]
    pub vnets: Vec<VirtualNetwork>,
    #[serde(default)]
    pub vms: Vec<VirtualMachine>,
    /// Network interfaces before they are folded into their VMs.
    #[serde(default)]
    pub nics: Vec<NetworkInterface>,
    #[serde(default)]
    pub nsgs: Vec<NetworkSecurityGroup>,
    #[serde(rename = "publicIPs", default)]
    pub public_ips: Vec<PublicIpAddress>,
    #[serde(default)]
    pub load_balancers: Vec<LoadBalancer>,
    #[serde(default)]
    pub route_tables: Vec<RouteTable>,
    /// Per resource type fetch failures.
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub fetched_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_topology_empty_object() {
        let raw: RawTopology = serde_json::from_str("{}").expect("Error parsing empty snapshot");
        assert!(raw.vnets.is_empty());
        assert!(raw.public_ips.is_empty());
        assert!(raw.errors.is_empty());
        assert!(raw.fetched_at.is_none());
    }

    #[test]
    fn test_raw_topology_field_names() {
        let json = r#"{
            "publicIPs": [{"id": "/x/pip", "ipAddress": "20.0.0.1"}],
            "loadBalancers": [{"id": "/x/lb"}],
            "routeTables": [],
            "errors": ["nsgs: az graph query failed"],
            "fetchedAt": "2024-05-01T10:00:00Z"
        }"#;
        let raw: RawTopology = serde_json::from_str(json).expect("Error parsing snapshot");
        assert_eq!(raw.public_ips.len(), 1);
        assert_eq!(raw.load_balancers.len(), 1);
        assert_eq!(raw.errors, vec!["nsgs: az graph query failed".to_string()]);
        assert_eq!(
            raw.fetched_at.map(|t| t.to_rfc3339()),
            Some("2024-05-01T10:00:00+00:00".to_string())
        );
    }
}
