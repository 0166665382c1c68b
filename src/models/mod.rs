//! Domain models for the Azure topology diagram.
//!
//! This module contains the core data structures used throughout the application:
//! - [`RawTopology`] - the inventory snapshot consumed by the pipeline
//! - [`VirtualNetwork`], [`Subnet`], [`NetworkInterface`], ... - Azure resources
//! - [`VirtualMachine`] and [`PowerState`] - compute resources
//! - [`BuiltTopology`] - the assembled VNet -> subnet -> VM hierarchy

mod arm_id;
mod compute;
mod network;
mod raw;
mod topology;

// Re-export public types
pub use arm_id::{normalize_id, resource_group, resource_name};
pub use compute::{PowerState, VirtualMachine};
pub use network::{
    IpConfiguration, LoadBalancer, NetworkInterface, NetworkSecurityGroup, PeeringState,
    PublicIpAddress, RouteTable, SecurityRule, Subnet, VirtualNetwork, VnetPeering,
};
pub use raw::RawTopology;
pub use topology::{BuiltTopology, Peering, TopologyStats, TopologySubnet, TopologyVNet};
