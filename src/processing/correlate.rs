//! VM enrichment from NIC and public IP inventories.
//!
//! Azure reports a VM's addresses on its network interfaces, and the public
//! address on a separate public IP resource. This joins the three collections.

use crate::models::{
    normalize_id, resource_group, NetworkInterface, PublicIpAddress, VirtualMachine,
};
use std::collections::HashMap;

/// Fill in `private_ip`, `subnet_id` and `public_ip` on each VM.
///
/// Private IP and subnet are first-match-wins across the VM's NICs and IP
/// configurations; public IP is last-match-wins. NICs no VM declares are
/// ignored.
///
/// # Arguments
/// * `vms` - VMs as fetched, ownership of NICs declared in `nic_ids`
/// * `nics` - Network interfaces in fetch order
/// * `public_ips` - Public IP resources
///
/// # Returns
/// The same VMs, in the same order, enriched.
pub fn enrich(
    mut vms: Vec<VirtualMachine>,
    nics: &[NetworkInterface],
    public_ips: &[PublicIpAddress],
) -> Vec<VirtualMachine> {
    let mut vm_by_nic: HashMap<String, usize> = HashMap::new();
    for (i, vm) in vms.iter().enumerate() {
        for nic_id in &vm.nic_ids {
            vm_by_nic.insert(normalize_id(nic_id), i);
        }
    }

    let address_by_public_ip: HashMap<String, &str> = public_ips
        .iter()
        .filter_map(|pip| {
            pip.assigned_address()
                .map(|address| (normalize_id(&pip.id), address))
        })
        .collect();

    let mut unmatched = 0;
    for nic in nics {
        let Some(&i) = vm_by_nic.get(&normalize_id(&nic.id)) else {
            log::trace!("NIC {} has no owning VM, skipping", nic.id);
            unmatched += 1;
            continue;
        };
        let vm = &mut vms[i];
        for ip_config in &nic.ip_configurations {
            if let Some(private_ip) = ip_config.private_ip.as_deref() {
                if !private_ip.is_empty() && vm.private_ip.is_empty() {
                    vm.private_ip = private_ip.to_string();
                }
            }
            if let Some(subnet_id) = ip_config.subnet_id.as_deref() {
                if !subnet_id.is_empty() && vm.subnet_id.is_none() {
                    vm.subnet_id = Some(subnet_id.to_string());
                }
            }
            let public_address = ip_config
                .public_ip_id
                .as_deref()
                .and_then(|id| address_by_public_ip.get(&normalize_id(id)));
            if let Some(address) = public_address {
                vm.public_ip = Some(address.to_string());
            }
        }
    }

    for vm in vms.iter_mut().filter(|vm| vm.resource_group.is_empty()) {
        if let Some(rg) = resource_group(&vm.id) {
            vm.resource_group = rg.to_string();
        }
    }

    log::debug!(
        "enrich: {} VMs, {} NICs ({} unmatched), {} public IPs with address",
        vms.len(),
        nics.len(),
        unmatched,
        address_by_public_ip.len()
    );
    vms
}
