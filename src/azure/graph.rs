//! Azure Resource Graph queries.
//!
//! One KQL query per resource type, each projecting straight into the shape
//! of the matching model so the pages deserialize without a mapping step.

use super::cli;
use crate::config;
use crate::models::{
    LoadBalancer, NetworkInterface, NetworkSecurityGroup, PublicIpAddress, RawTopology,
    RouteTable, VirtualMachine, VirtualNetwork,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::error::Error;

const VNET_QUERY: &str = r#"resources
        | where type =~ "microsoft.network/virtualnetworks"
        | extend addressPrefixes = properties.addressSpace.addressPrefixes
        | extend subnets = properties.subnets, vnetPeerings = properties.virtualNetworkPeerings
        | mv-apply s = subnets on (
            summarize subnets = make_list(pack(
                "id", tostring(s.id),
                "name", tostring(s.name),
                "addressPrefix", coalesce(tostring(s.properties.addressPrefix), tostring(s.properties.addressPrefixes[0])),
                "nsgId", s.properties.networkSecurityGroup.id,
                "routeTableId", s.properties.routeTable.id)))
        | mv-apply p = vnetPeerings on (
            summarize peerings = make_list(pack(
                "name", tostring(p.name),
                "state", tostring(p.properties.peeringState),
                "remoteVNetId", tostring(p.properties.remoteVirtualNetwork.id),
                "allowForwardedTraffic", tobool(p.properties.allowForwardedTraffic),
                "allowGatewayTransit", tobool(p.properties.allowGatewayTransit),
                "useRemoteGateways", tobool(p.properties.useRemoteGateways))))
        | project id, name, location, addressPrefixes, subnets, peerings
        | sort by id asc"#;

const VM_QUERY: &str = r#"resources
        | where type =~ "microsoft.compute/virtualmachines"
        | extend nics = properties.networkProfile.networkInterfaces
        | mv-apply n = nics on (summarize nicIds = make_list(tostring(n.id)))
        | project id, name, resourceGroup, location,
            size = tostring(properties.hardwareProfile.vmSize),
            osType = tostring(properties.storageProfile.osDisk.osType),
            powerState = tostring(properties.extended.instanceView.powerState.code),
            nicIds
        | sort by id asc"#;

const NIC_QUERY: &str = r#"resources
        | where type =~ "microsoft.network/networkinterfaces"
        | extend ipConfigs = properties.ipConfigurations
        | mv-apply c = ipConfigs on (
            summarize ipConfigurations = make_list(pack(
                "privateIP", tostring(c.properties.privateIPAddress),
                "subnetId", tostring(c.properties.subnet.id),
                "publicIPId", c.properties.publicIPAddress.id)))
        | project id, ipConfigurations
        | sort by id asc"#;

const NSG_QUERY: &str = r#"resources
        | where type =~ "microsoft.network/networksecuritygroups"
        | extend securityRules = properties.securityRules
        | mv-apply r = securityRules on (
            summarize rules = make_list(pack(
                "name", tostring(r.name),
                "priority", toint(r.properties.priority),
                "direction", tostring(r.properties.direction),
                "access", tostring(r.properties.access),
                "protocol", tostring(r.properties.protocol),
                "sourceAddressPrefix", tostring(r.properties.sourceAddressPrefix),
                "destinationAddressPrefix", tostring(r.properties.destinationAddressPrefix),
                "destinationPortRange", tostring(r.properties.destinationPortRange))))
        | project id, name, rules
        | sort by id asc"#;

const PUBLIC_IP_QUERY: &str = r#"resources
        | where type =~ "microsoft.network/publicipaddresses"
        | project id, name, ipAddress = tostring(properties.ipAddress)
        | sort by id asc"#;

const LOAD_BALANCER_QUERY: &str = r#"resources
        | where type =~ "microsoft.network/loadbalancers"
        | project id, name, location
        | sort by id asc"#;

const ROUTE_TABLE_QUERY: &str = r#"resources
        | where type =~ "microsoft.network/routetables"
        | project id, name, location
        | sort by id asc"#;

/// One page of an `az graph query` response.
#[derive(Deserialize, Debug)]
pub struct GraphPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// Token for pagination (if more results available).
    pub skip_token: Option<String>,
    pub total_records: Option<u32>,
    #[serde(default)]
    pub count: i32,
}

/// Parse one page, reporting the JSON path of any mismatch.
pub fn parse_page<T: DeserializeOwned>(output: &str, block: usize) -> Result<GraphPage<T>, Box<dyn Error>> {
    let mut deserializer = serde_json::Deserializer::from_str(output);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        log::error!("OUTPUT START:\n\n{}\n\nOUTPUT END\n", output);
        format!(
            "Error parsing JSON block {}: path={} error={}",
            block,
            e.path(),
            e
        )
        .into()
    })
}

/// Run `query` and follow skip tokens until every page is read.
pub fn query_all<T: DeserializeOwned>(query: &str) -> Result<Vec<T>, Box<dyn Error>> {
    let first = config::GRAPH_PAGE_SIZE.to_string();
    let mut rows: Vec<T> = Vec::new();
    let mut skip_token: Option<String> = None;
    let mut block = 0;

    loop {
        let mut args = vec!["graph", "query", "--first", first.as_str(), "-q", query, "--output", "json"];
        if let Some(token) = skip_token.as_deref() {
            args.push("--skip-token");
            args.push(token);
        }
        let output = cli::run_az(&args)?;
        let page: GraphPage<T> = parse_page(&output, block)?;

        log::info!(
            "got block#{block:2} record_count=+{count:3} => {total:4} of {records:?}",
            count = page.count,
            total = rows.len() + page.data.len(),
            records = page.total_records,
        );
        rows.extend(page.data);

        match page.skip_token {
            Some(next) if skip_token.as_deref() == Some(next.as_str()) => {
                return Err("Skip token not unique - possible infinite loop".into());
            }
            Some(next) => skip_token = Some(next),
            None => break,
        }

        // Rate limiting pause
        std::thread::sleep(std::time::Duration::from_millis(config::SLEEP_MSEC * 5));
        block += 1;
    }

    Ok(rows)
}

/// Run one query on the blocking pool, turning any failure into a message
/// prefixed with the resource kind.
async fn fetch_kind<T>(kind: &'static str, query: &'static str) -> Result<Vec<T>, String>
where
    T: DeserializeOwned + Send + 'static,
{
    tokio::task::spawn_blocking(move || query_all::<T>(query).map_err(|e| e.to_string()))
        .await
        .map_err(|e| format!("{kind}: fetch task failed: {e}"))?
        .map_err(|e| format!("{kind}: {e}"))
}

fn take<T>(result: Result<Vec<T>, String>, errors: &mut Vec<String>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        log::warn!("{}", e);
        errors.push(e);
        Vec::new()
    })
}

/// Fetch every resource type concurrently.
///
/// A failing resource type leaves its collection empty and adds one entry to
/// `errors`; the other types are unaffected.
pub async fn fetch_raw_topology() -> RawTopology {
    log::info!("#Start fetch_raw_topology()");

    let (vnets, vms, nics, nsgs, public_ips, load_balancers, route_tables) = futures::join!(
        fetch_kind::<VirtualNetwork>("vnets", VNET_QUERY),
        fetch_kind::<VirtualMachine>("vms", VM_QUERY),
        fetch_kind::<NetworkInterface>("nics", NIC_QUERY),
        fetch_kind::<NetworkSecurityGroup>("nsgs", NSG_QUERY),
        fetch_kind::<PublicIpAddress>("publicIPs", PUBLIC_IP_QUERY),
        fetch_kind::<LoadBalancer>("loadBalancers", LOAD_BALANCER_QUERY),
        fetch_kind::<RouteTable>("routeTables", ROUTE_TABLE_QUERY),
    );

    let mut errors = Vec::new();
    let raw = RawTopology {
        vnets: take(vnets, &mut errors),
        vms: take(vms, &mut errors),
        nics: take(nics, &mut errors),
        nsgs: take(nsgs, &mut errors),
        public_ips: take(public_ips, &mut errors),
        load_balancers: take(load_balancers, &mut errors),
        route_tables: take(route_tables, &mut errors),
        errors,
        fetched_at: Some(chrono::Utc::now()),
    };

    log::info!(
        "Fetched vnets={} vms={} nics={} nsgs={} public_ips={} errors={}",
        raw.vnets.len(),
        raw.vms.len(),
        raw.nics.len(),
        raw.nsgs.len(),
        raw.public_ips.len(),
        raw.errors.len()
    );
    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PowerState;

    #[test]
    fn test_parse_page_vms() {
        let output = r#"{
            "count": 1,
            "data": [{
                "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm1",
                "name": "vm1",
                "resourceGroup": "rg",
                "location": "eastus",
                "size": "Standard_B2s",
                "osType": "Linux",
                "powerState": "PowerState/running",
                "nicIds": ["/x/nic1"]
            }],
            "skip_token": null,
            "total_records": 1
        }"#;
        let page: GraphPage<VirtualMachine> = parse_page(output, 0).expect("Error parsing page");
        assert_eq!(page.count, 1);
        assert_eq!(page.total_records, Some(1));
        assert!(page.skip_token.is_none());
        assert_eq!(page.data[0].power_state, PowerState::Running);
        assert_eq!(page.data[0].nic_ids.len(), 1);
    }

    #[test]
    fn test_parse_page_reports_path() {
        let output = r#"{"count": 1, "data": [{"id": "/x/nsg", "rules": [{"priority": "high"}]}]}"#;
        let err = parse_page::<NetworkSecurityGroup>(output, 3)
            .expect_err("priority must be numeric")
            .to_string();
        assert!(err.contains("block 3"), "{err}");
        assert!(err.contains("data[0].rules[0].priority"), "{err}");
    }

    #[derive(Deserialize, Debug)]
    struct IdOnly {
        id: String,
    }

    #[test]
    fn test_parse_page_row_type_without_default() {
        let page: GraphPage<IdOnly> =
            parse_page(r#"{"count": 0, "skip_token": null}"#, 0).expect("Error parsing page");
        assert!(page.data.is_empty(), "missing data is an empty page");

        let page: GraphPage<IdOnly> =
            parse_page(r#"{"count": 1, "data": [{"id": "/x/a"}]}"#, 1).expect("Error parsing page");
        assert_eq!(page.data[0].id, "/x/a");
    }

    #[test]
    fn test_take_collects_errors() {
        let mut errors = Vec::new();
        let ok: Vec<u32> = take(Ok(vec![1, 2]), &mut errors);
        let failed: Vec<u32> = take(Err("nsgs: az not found".to_string()), &mut errors);
        assert_eq!(ok, vec![1, 2]);
        assert!(failed.is_empty());
        assert_eq!(errors, vec!["nsgs: az not found".to_string()]);
    }
}
