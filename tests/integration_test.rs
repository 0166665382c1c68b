//! Integration tests for azure-topology-diagram
//!
//! These tests verify the complete workflow from reading a cached snapshot to the rendered diagram.

use azure_topology_diagram::{
    azure::load_topology_cache,
    diagram::{layout, layout_topology},
    models::{
        PeeringState, PowerState, RawTopology, Subnet, VirtualMachine, VirtualNetwork,
    },
    processing::{build, build_topology},
    render_topology,
};

const TEST_CACHE: &str = "src/tests/test_data/topology_test_cache_01.json";

fn read_test_cache() -> RawTopology {
    load_topology_cache(TEST_CACHE).expect("Failed to read topology cache")
}

#[test]
fn test_full_workflow_with_cache() {
    let raw = read_test_cache();
    let result = render_topology(&raw);
    let topology = &result.topology;

    let names: Vec<&str> = topology.vnets.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["app-vnet", "hub-vnet", "data-vnet"]);
    assert_eq!(topology.vnets[0].vm_count, 3);
    assert_eq!(topology.vnets[1].vm_count, 1);
    assert_eq!(topology.vnets[2].vm_count, 0);

    assert_eq!(topology.orphaned_vms.len(), 1);
    assert_eq!(topology.orphaned_vms[0].name, "legacy-01");

    assert_eq!(topology.peerings.len(), 2, "hub<->app must collapse to one");
    assert_eq!(topology.peerings[0].name, "hub-to-app");
    assert_eq!(topology.peerings[1].state, PeeringState::Initiated);

    assert_eq!(topology.errors.len(), 1);
    assert!(topology.errors[0].starts_with("loadBalancers:"));
    assert!(topology.fetched_at.is_some());

    assert!(result.diagram.svg.starts_with("<svg"));
    assert!(result.diagram.width > 0 && result.diagram.height > 0);
}

#[test]
fn test_enrichment_from_cache() {
    let topology = build_topology(&read_test_cache());
    let web = &topology.vnets[0].subnets[0];
    assert_eq!(web.name, "web");

    let web_01 = web
        .vms
        .iter()
        .find(|vm| vm.name == "web-01")
        .expect("web-01 attached to web subnet");
    assert_eq!(web_01.private_ip, "10.1.1.4");
    assert_eq!(web_01.public_ip.as_deref(), Some("20.10.1.5"));

    let jump = &topology.vnets[1].subnets[1].vms[0];
    assert_eq!(jump.name, "jump-01");
    assert_eq!(jump.public_ip, None, "reserved public IP without address");
    assert_eq!(jump.resource_group, "net-rg");

    let nsg = web.nsg.as_ref().expect("web-nsg attached");
    assert_eq!(nsg.rules[0].name, "allow-https");
}

#[test]
fn test_stats_conservation() {
    let topology = build_topology(&read_test_cache());
    let stats = &topology.stats;

    assert_eq!(stats.total_vms, 5);
    assert_eq!(stats.running_vms, 2);
    assert_eq!(stats.deallocated_vms, 1);
    assert_eq!(stats.stopped_vms, 1);
    assert_eq!(stats.other_vms, 1);
    assert_eq!(
        stats.running_vms + stats.deallocated_vms + stats.stopped_vms + stats.other_vms,
        stats.total_vms
    );
    let attached: usize = topology.vnets.iter().map(|v| v.vm_count).sum();
    assert_eq!(attached + topology.orphaned_vms.len(), stats.total_vms);

    assert_eq!(stats.total_public_ips, 1);
    assert_eq!(stats.peering_count, 2);
    assert_eq!(stats.total_vnets, 3);
    assert_eq!(stats.total_subnets, 4);
    assert_eq!(stats.total_nsgs, 3);
    assert_eq!(stats.vms_by_os.get("Linux"), Some(&3));
    assert_eq!(stats.vms_by_location.get("westeurope"), Some(&1));
}

#[test]
fn test_idempotent_output() {
    let raw = read_test_cache();
    assert_eq!(render_topology(&raw), render_topology(&raw));
}

#[test]
fn test_connectors_follow_peerings() {
    let topology = build_topology(&read_test_cache());
    let geometry = layout_topology(&topology);

    assert_eq!(geometry.connectors.len(), 2);
    let hub = geometry
        .vnets
        .iter()
        .find(|v| v.name == "hub-vnet")
        .expect("hub placed");
    for connector in &geometry.connectors {
        assert_eq!((connector.x1, connector.y1), hub.rect.bottom_center());
    }
}

#[test]
fn test_empty_graph() {
    let topology = build(&[], &[], &[]);
    assert!(topology.vnets.is_empty());
    assert!(topology.orphaned_vms.is_empty());
    assert!(topology.peerings.is_empty());

    let geometry = layout(&[], &[], 2);
    assert_eq!((geometry.width, geometry.height), (0, 0));

    let result = render_topology(&RawTopology::default());
    assert_eq!(result.diagram.svg, "");
    assert_eq!((result.diagram.width, result.diagram.height), (0, 0));
    assert_eq!(result.topology.stats.total_vms, 0);
}

#[test]
fn test_script_name_is_escaped() {
    let subnet_id = "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet-a/subnets/default";
    let raw = RawTopology {
        vnets: vec![VirtualNetwork {
            id: "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Network/virtualNetworks/vnet-a".to_string(),
            name: "vnet-a".to_string(),
            address_prefixes: vec!["10.0.0.0/16".to_string()],
            subnets: vec![Subnet {
                id: subnet_id.to_string(),
                name: "default".to_string(),
                address_prefix: "10.0.1.0/24".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }],
        vms: vec![VirtualMachine {
            id: "/vms/evil".to_string(),
            name: "<script>alert(1)</script>".to_string(),
            power_state: PowerState::Running,
            subnet_id: Some(subnet_id.to_string()),
            ..Default::default()
        }],
        ..Default::default()
    };

    let svg = render_topology(&raw).diagram.svg;
    assert!(svg.contains("&lt;script&gt;"));
    assert!(!svg.contains("<script>"));
}
