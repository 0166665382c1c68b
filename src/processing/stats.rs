//! Aggregate statistics over a built topology.

use crate::models::{PowerState, PublicIpAddress, TopologyStats, TopologyVNet, VirtualMachine};
use std::collections::BTreeMap;

/// Compute VM and network counts.
///
/// `total_public_ips` is left at zero, see [`count_assigned_public_ips`].
pub fn compute_stats(
    vnets: &[TopologyVNet],
    vms: &[VirtualMachine],
    nsg_count: usize,
    peering_count: usize,
) -> TopologyStats {
    let mut stats = TopologyStats {
        total_vms: vms.len(),
        total_vnets: vnets.len(),
        total_subnets: vnets.iter().map(|v| v.subnets.len()).sum(),
        total_nsgs: nsg_count,
        peering_count,
        ..Default::default()
    };

    for vm in vms {
        match vm.power_state {
            PowerState::Running => stats.running_vms += 1,
            PowerState::Deallocated => stats.deallocated_vms += 1,
            PowerState::Stopped => stats.stopped_vms += 1,
            PowerState::Unknown => {}
        }
        increment(&mut stats.vms_by_os, &vm.os_type);
        increment(&mut stats.vms_by_size, &vm.size);
        increment(&mut stats.vms_by_location, &vm.location);
    }
    stats.other_vms =
        stats.total_vms - stats.running_vms - stats.deallocated_vms - stats.stopped_vms;

    stats
}

/// Public IPs that actually hold an address; reserved-only ones are excluded.
pub fn count_assigned_public_ips(public_ips: &[PublicIpAddress]) -> usize {
    public_ips
        .iter()
        .filter(|pip| pip.assigned_address().is_some())
        .count()
}

fn increment(counts: &mut BTreeMap<String, usize>, key: &str) {
    let key = match key.trim() {
        "" => "unknown",
        k => k,
    };
    *counts.entry(key.to_string()).or_insert(0) += 1;
}
