//! CSV output of the VM inventory.

use crate::models::{BuiltTopology, VirtualMachine};

use super::terminal::format_field;

/// One VM with the VNet and subnet it was attached to.
#[derive(Debug, PartialEq)]
pub struct VmPrintRow {
    pub vnet_name: String,
    pub subnet_name: String,
    pub subnet_prefix: String,
    pub vm_name: String,
    pub power_state: String,
    pub private_ip: String,
    pub public_ip: String,
    pub size: String,
    pub os_type: String,
    pub location: String,
    pub resource_group: String,
}

fn row(vm: &VirtualMachine, vnet_name: &str, subnet_name: &str, subnet_prefix: &str) -> VmPrintRow {
    VmPrintRow {
        vnet_name: vnet_name.to_string(),
        subnet_name: subnet_name.to_string(),
        subnet_prefix: subnet_prefix.to_string(),
        vm_name: vm.name.clone(),
        power_state: vm.power_state.to_string(),
        private_ip: vm.private_ip.clone(),
        public_ip: vm.public_ip.clone().unwrap_or_default(),
        size: vm.size.clone(),
        os_type: vm.os_type.clone(),
        location: vm.location.clone(),
        resource_group: vm.resource_group.clone(),
    }
}

/// Rows in diagram order, orphaned VMs last with `-` for VNet and subnet.
pub fn vm_rows(topology: &BuiltTopology) -> Vec<VmPrintRow> {
    let mut rows = Vec::with_capacity(topology.stats.total_vms);
    for vnet in &topology.vnets {
        for subnet in &vnet.subnets {
            for vm in &subnet.vms {
                rows.push(row(vm, &vnet.name, &subnet.name, &subnet.address_prefix));
            }
        }
    }
    for vm in &topology.orphaned_vms {
        rows.push(row(vm, "-", "-", "-"));
    }
    rows
}

/// Print the VM inventory as CSV to stdout.
pub fn vm_print(topology: &BuiltTopology) {
    log::info!("#Start vm_print() vms={}", topology.stats.total_vms);

    println!(
        r#"      "vnet_name",           "subnet_name",     "subnet_prefix",          "vm_name",     "state",     "private_ip",     "public_ip",              "size",     "os",       "location",     "resource_group""#
    );
    for row in vm_rows(topology) {
        print_csv_row(&row);
    }
}

fn print_csv_row(row: &VmPrintRow) {
    println!(
        r#"{vnet_name},{subnet_name},{subnet_prefix},{vm_name},{power_state},{private_ip},{public_ip},{size},{os_type},{location},{resource_group}"#,
        vnet_name = format_field(&row.vnet_name, 18),
        subnet_name = format_field(&row.subnet_name, 24),
        subnet_prefix = format_field(&row.subnet_prefix, 18),
        vm_name = format_field(&row.vm_name, 18),
        power_state = format_field(&row.power_state, 13),
        private_ip = format_field(&row.private_ip, 16),
        public_ip = format_field(&row.public_ip, 16),
        size = format_field(&row.size, 20),
        os_type = format_field(&row.os_type, 10),
        location = format_field(&row.location, 16),
        resource_group = format_field(&row.resource_group, 18),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PowerState, TopologySubnet, TopologyVNet};

    #[test]
    fn test_vm_rows_order_and_orphans() {
        let vm = |name: &str| VirtualMachine {
            id: format!("/vms/{name}"),
            name: name.to_string(),
            power_state: PowerState::Running,
            ..Default::default()
        };
        let mut topology = BuiltTopology {
            vnets: vec![TopologyVNet {
                name: "app-vnet".to_string(),
                subnets: vec![TopologySubnet {
                    name: "web".to_string(),
                    address_prefix: "10.1.1.0/24".to_string(),
                    vms: vec![vm("web-01"), vm("web-02")],
                    ..Default::default()
                }],
                vm_count: 2,
                ..Default::default()
            }],
            orphaned_vms: vec![vm("legacy-01")],
            ..Default::default()
        };
        topology.stats.total_vms = 3;

        let rows = vm_rows(&topology);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].vm_name, "web-01");
        assert_eq!(rows[0].subnet_prefix, "10.1.1.0/24");
        assert_eq!(rows[0].power_state, "running");
        assert_eq!(rows[2].vm_name, "legacy-01");
        assert_eq!(rows[2].vnet_name, "-");
        assert_eq!(rows[2].public_ip, "");
    }
}
