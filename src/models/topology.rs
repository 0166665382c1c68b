//! Assembled topology, as handed to the layout engine and the presentation layer.

use super::{NetworkSecurityGroup, PeeringState, VirtualMachine, VnetPeering};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A subnet with its attached VMs and resolved NSG.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopologySubnet {
    pub id: String,
    pub name: String,
    pub address_prefix: String,
    /// `None` when the subnet has no NSG or its id did not resolve.
    pub nsg: Option<NetworkSecurityGroup>,
    pub route_table_id: Option<String>,
    pub vms: Vec<VirtualMachine>,
}

/// A VNet with its subnets, ready for layout.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopologyVNet {
    pub id: String,
    pub name: String,
    pub location: String,
    pub address_prefixes: Vec<String>,
    pub subnets: Vec<TopologySubnet>,
    /// Directed peering records declared on this VNet.
    pub peerings: Vec<VnetPeering>,
    /// Sum of VMs across all subnets.
    pub vm_count: usize,
}

/// An undirected connection between two VNets.
///
/// `from_vnet_id` is the VNet whose record was seen first.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Peering {
    pub name: String,
    #[serde(rename = "fromVNetId")]
    pub from_vnet_id: String,
    #[serde(rename = "toVNetId")]
    pub to_vnet_id: String,
    pub state: PeeringState,
    pub allow_forwarded_traffic: bool,
    pub allow_gateway_transit: bool,
    pub use_remote_gateways: bool,
}

/// Aggregate counts over the snapshot.
///
/// `running_vms + deallocated_vms + stopped_vms + other_vms == total_vms`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TopologyStats {
    #[serde(rename = "totalVMs")]
    pub total_vms: usize,
    #[serde(rename = "runningVMs")]
    pub running_vms: usize,
    #[serde(rename = "deallocatedVMs")]
    pub deallocated_vms: usize,
    #[serde(rename = "stoppedVMs")]
    pub stopped_vms: usize,
    #[serde(rename = "otherVMs")]
    pub other_vms: usize,
    #[serde(rename = "vmsByOS")]
    pub vms_by_os: BTreeMap<String, usize>,
    pub vms_by_size: BTreeMap<String, usize>,
    pub vms_by_location: BTreeMap<String, usize>,
    #[serde(rename = "totalVNets")]
    pub total_vnets: usize,
    pub total_subnets: usize,
    #[serde(rename = "totalNSGs")]
    pub total_nsgs: usize,
    #[serde(rename = "totalPublicIPs")]
    pub total_public_ips: usize,
    pub peering_count: usize,
}

/// The hierarchical model built from one snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BuiltTopology {
    /// Sorted by `vm_count` descending, then name ascending.
    pub vnets: Vec<TopologyVNet>,
    #[serde(rename = "orphanedVMs")]
    pub orphaned_vms: Vec<VirtualMachine>,
    pub peerings: Vec<Peering>,
    pub stats: TopologyStats,
    /// Upstream fetch failures, passed through unchanged.
    pub errors: Vec<String>,
    pub fetched_at: Option<DateTime<Utc>>,
}

impl fmt::Display for TopologyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{vnets} VNets, {subnets} subnets, {vms} VMs ({running} running, {deallocated} deallocated, {stopped} stopped, {other} other), {nsgs} NSGs, {pips} public IPs, {peerings} peerings",
            vnets = self.total_vnets,
            subnets = self.total_subnets,
            vms = self.total_vms,
            running = self.running_vms,
            deallocated = self.deallocated_vms,
            stopped = self.stopped_vms,
            other = self.other_vms,
            nsgs = self.total_nsgs,
            pips = self.total_public_ips,
            peerings = self.peering_count,
        )
    }
}
