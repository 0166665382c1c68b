//! Assembly of the VNet -> subnet -> VM hierarchy.
//!
//! All joins go through normalized ARM ids, so the builder never fails on
//! missing references: an unresolved NSG is `None`, an unresolved subnet
//! makes its VM an orphan.

use super::correlate::enrich;
use super::stats::{compute_stats, count_assigned_public_ips};
use crate::models::{
    normalize_id, BuiltTopology, NetworkSecurityGroup, Peering, RawTopology, TopologySubnet,
    TopologyVNet, VirtualMachine, VirtualNetwork,
};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

/// Build the topology from already enriched VMs.
///
/// VNets come back sorted by VM count descending, then name ascending.
/// `stats.total_public_ips`, `errors` and `fetched_at` are left empty; the
/// full pipeline in [`build_topology`] fills them in.
pub fn build(
    vnets: &[VirtualNetwork],
    vms: &[VirtualMachine],
    nsgs: &[NetworkSecurityGroup],
) -> BuiltTopology {
    // Indices into `vms`, so duplicated VM ids are still tracked one by one.
    let mut vms_by_subnet: HashMap<String, Vec<usize>> = HashMap::new();
    let mut vm_ids: HashSet<String> = HashSet::new();
    for (i, vm) in vms.iter().enumerate() {
        if !vm_ids.insert(normalize_id(&vm.id)) {
            log::warn!("VM {} listed more than once", vm.id);
        }
        if let Some(subnet_id) = vm.subnet_id.as_deref().filter(|id| !id.trim().is_empty()) {
            vms_by_subnet
                .entry(normalize_id(subnet_id))
                .or_default()
                .push(i);
        }
    }

    let nsg_by_id: HashMap<String, &NetworkSecurityGroup> = nsgs
        .iter()
        .map(|nsg| (normalize_id(&nsg.id), nsg))
        .collect();

    let mut attached: HashSet<usize> = HashSet::new();
    let mut seen_subnets: HashSet<String> = HashSet::new();
    let mut topology_vnets = Vec::with_capacity(vnets.len());

    for vnet in vnets {
        let mut subnets = Vec::with_capacity(vnet.subnets.len());
        for subnet in &vnet.subnets {
            let subnet_key = normalize_id(&subnet.id);
            if !seen_subnets.insert(subnet_key.clone()) {
                log::warn!(
                    "Subnet {} listed more than once, VMs attached to first occurrence only",
                    subnet.id
                );
            }
            // remove() so a repeated subnet id can never attach the same VMs twice
            let subnet_indices = vms_by_subnet.remove(&subnet_key).unwrap_or_default();
            attached.extend(subnet_indices.iter().copied());
            let subnet_vms: Vec<VirtualMachine> =
                subnet_indices.into_iter().map(|i| vms[i].clone()).collect();

            let nsg = subnet
                .nsg_id
                .as_deref()
                .and_then(|id| nsg_by_id.get(&normalize_id(id)))
                .map(|nsg| with_sorted_rules(nsg));

            subnets.push(TopologySubnet {
                id: subnet.id.clone(),
                name: subnet.name.clone(),
                address_prefix: subnet.address_prefix.clone(),
                nsg,
                route_table_id: subnet.route_table_id.clone(),
                vms: subnet_vms,
            });
        }

        topology_vnets.push(TopologyVNet {
            id: vnet.id.clone(),
            name: vnet.name.clone(),
            location: vnet.location.clone(),
            address_prefixes: vnet.address_prefixes.clone(),
            vm_count: subnets.iter().map(|s| s.vms.len()).sum(),
            subnets,
            peerings: vnet.peerings.clone(),
        });
    }

    let topology_vnets: Vec<TopologyVNet> = topology_vnets
        .into_iter()
        .sorted_by(|a, b| b.vm_count.cmp(&a.vm_count).then_with(|| a.name.cmp(&b.name)))
        .collect();

    let orphaned_vms: Vec<VirtualMachine> = vms
        .iter()
        .enumerate()
        .filter(|(i, _)| !attached.contains(i))
        .map(|(_, vm)| vm.clone())
        .collect();

    let peerings = dedup_peerings(vnets);
    let stats = compute_stats(&topology_vnets, vms, nsgs.len(), peerings.len());

    log::debug!(
        "build: {} VNets, {} attached VMs, {} orphaned VMs, {} peerings",
        topology_vnets.len(),
        attached.len(),
        orphaned_vms.len(),
        peerings.len()
    );

    BuiltTopology {
        vnets: topology_vnets,
        orphaned_vms,
        peerings,
        stats,
        errors: Vec::new(),
        fetched_at: None,
    }
}

/// Collapse directed peering records into one undirected [`Peering`] per VNet pair.
///
/// VNets are scanned in the given order and the first record seen for a pair
/// is kept, so `from_vnet_id` is the VNet that declared it first.
pub fn dedup_peerings(vnets: &[VirtualNetwork]) -> Vec<Peering> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut peerings = Vec::new();

    for vnet in vnets {
        let local = normalize_id(&vnet.id);
        for record in &vnet.peerings {
            let remote = normalize_id(&record.remote_vnet_id);
            let key = if local <= remote {
                (local.clone(), remote)
            } else {
                (remote, local.clone())
            };
            if !seen.insert(key) {
                log::trace!("Skipping reciprocal peering {} on {}", record.name, vnet.name);
                continue;
            }
            peerings.push(Peering {
                name: record.name.clone(),
                from_vnet_id: vnet.id.clone(),
                to_vnet_id: record.remote_vnet_id.clone(),
                state: record.state,
                allow_forwarded_traffic: record.allow_forwarded_traffic,
                allow_gateway_transit: record.allow_gateway_transit,
                use_remote_gateways: record.use_remote_gateways,
            });
        }
    }

    peerings
}

/// Run the whole reconstruction over a raw snapshot: enrich VMs, build the
/// hierarchy, then attach public IP count, upstream errors and fetch time.
pub fn build_topology(raw: &RawTopology) -> BuiltTopology {
    log::info!(
        "#Start build_topology() vnets={} vms={} nics={} nsgs={} public_ips={} load_balancers={} route_tables={}",
        raw.vnets.len(),
        raw.vms.len(),
        raw.nics.len(),
        raw.nsgs.len(),
        raw.public_ips.len(),
        raw.load_balancers.len(),
        raw.route_tables.len()
    );

    let vms = enrich(raw.vms.clone(), &raw.nics, &raw.public_ips);
    let mut topology = build(&raw.vnets, &vms, &raw.nsgs);
    topology.stats.total_public_ips = count_assigned_public_ips(&raw.public_ips);
    topology.errors = raw.errors.clone();
    topology.fetched_at = raw.fetched_at;

    for error in &topology.errors {
        log::warn!("Partial snapshot: {error}");
    }
    log::info!("Topology: {}", topology.stats);

    topology
}

fn with_sorted_rules(nsg: &NetworkSecurityGroup) -> NetworkSecurityGroup {
    let mut nsg = nsg.clone();
    nsg.rules.sort_by_key(|rule| rule.priority);
    nsg
}
