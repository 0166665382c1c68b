//! Terminal output utilities.
//!
//! Provides formatting helpers and the colored topology summary.

use crate::models::{resource_name, BuiltTopology, PeeringState, PowerState, VirtualMachine};
use colored::{ColoredString, Colorize};
use itertools::Itertools;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let quoted = format!("\"{}\"", value.to_string().replace('"', "\"\""));
    if quoted.len() >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

fn power_state_colored(state: PowerState) -> ColoredString {
    match state {
        PowerState::Running => state.as_str().green(),
        PowerState::Deallocated => state.as_str().yellow(),
        PowerState::Stopped => state.as_str().red(),
        PowerState::Unknown => state.as_str().normal(),
    }
}

fn peering_state_colored(state: PeeringState) -> ColoredString {
    match state {
        PeeringState::Connected => state.as_str().green(),
        PeeringState::Initiated => state.as_str().yellow(),
        PeeringState::Disconnected => state.as_str().red(),
        PeeringState::Unknown => state.as_str().normal(),
    }
}

fn vm_line(vm: &VirtualMachine) -> String {
    let mut line = format!(
        "'{name}' {state} {ip}",
        name = vm.name,
        state = power_state_colored(vm.power_state),
        ip = if vm.private_ip.is_empty() { "-" } else { vm.private_ip.as_str() },
    );
    if let Some(public_ip) = &vm.public_ip {
        line.push_str(&format!(" public={public_ip}"));
    }
    line
}

/// Summary of the topology, one line per VNet, subnet, VM, orphan, peering and error.
pub fn summary_lines(topology: &BuiltTopology) -> Vec<String> {
    let mut lines = Vec::new();

    let fetched = topology
        .fetched_at
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "unknown time".to_string());
    lines.push(format!("Snapshot {fetched}: {}", topology.stats));

    for vnet in &topology.vnets {
        lines.push(format!(
            "VNET: '{name}' {location} - {cidrs} ({count} VMs)",
            name = vnet.name.bold(),
            location = vnet.location,
            cidrs = vnet.address_prefixes.iter().join(", "),
            count = vnet.vm_count
        ));
        for subnet in &vnet.subnets {
            lines.push(format!(
                "    SUBNET: '{name}' {prefix} nsg={nsg} vms={count}",
                name = subnet.name,
                prefix = subnet.address_prefix,
                nsg = subnet.nsg.as_ref().map(|n| n.name.as_str()).unwrap_or("-"),
                count = subnet.vms.len()
            ));
            for vm in &subnet.vms {
                lines.push(format!("        VM: {}", vm_line(vm)));
            }
        }
    }

    for vm in &topology.orphaned_vms {
        lines.push(format!("{}: {}", "ORPHAN VM".on_red(), vm_line(vm)));
    }

    for peering in &topology.peerings {
        lines.push(format!(
            "PEERING: '{name}' {from} <-> {to} {state}",
            name = peering.name,
            from = resource_name(&peering.from_vnet_id),
            to = resource_name(&peering.to_vnet_id),
            state = peering_state_colored(peering.state)
        ));
    }

    for error in &topology.errors {
        lines.push(format!("{}: {error}", "ERROR".on_red()));
    }

    lines
}

/// Print the topology summary to stdout.
pub fn print_summary(topology: &BuiltTopology) {
    log::info!("#Start print_summary() vnets={}", topology.vnets.len());
    for line in summary_lines(topology) {
        println!("{line}");
    }
}
