//! Deterministic placement of VNets, subnets and VMs.
//!
//! VNets are packed greedily into a fixed number of columns: each VNet goes
//! to the column that is currently shortest. Subnets stack inside their VNet,
//! VMs fill rows of [`VMS_PER_ROW`] inside their subnet. All coordinates are
//! absolute canvas pixels.

use crate::models::{
    normalize_id, BuiltTopology, Peering, PeeringState, PowerState, TopologySubnet, TopologyVNet,
    VirtualMachine,
};
use serde::Serialize;
use std::collections::HashMap;

pub const DEFAULT_COLUMNS: usize = 2;
/// Upper bound on `columns`; larger requests are clamped.
pub const MAX_COLUMNS: usize = 64;
pub const VMS_PER_ROW: usize = 5;

/// Canvas edge margin, also the gap between columns.
pub const MARGIN: u32 = 40;
pub const TOP_MARGIN: u32 = MARGIN;
/// Vertical gap between VNets in a column.
pub const VNET_MARGIN: u32 = 24;

pub const VNET_HEADER_HEIGHT: u32 = 48;
/// Inner padding of a VNet box, left/right and below the header.
pub const VNET_PADDING: u32 = 12;
pub const EMPTY_VNET_BODY: u32 = 32;

pub const SUBNET_HEADER_HEIGHT: u32 = 32;
/// Inner padding of a subnet box, left/right.
pub const SUBNET_PADDING: u32 = 12;
pub const SUBNET_BOTTOM_MARGIN: u32 = 12;
pub const EMPTY_SUBNET_BODY: u32 = 24;

pub const VM_BOX_WIDTH: u32 = 96;
pub const VM_BOX_HEIGHT: u32 = 44;
pub const VM_COL_MARGIN: u32 = 8;
pub const VM_ROW_MARGIN: u32 = 8;

pub const SUBNET_WIDTH: u32 = VMS_PER_ROW as u32 * VM_BOX_WIDTH
    + (VMS_PER_ROW as u32 - 1) * VM_COL_MARGIN
    + 2 * SUBNET_PADDING;
pub const VNET_WIDTH: u32 = SUBNET_WIDTH + 2 * VNET_PADDING;

/// Axis aligned box in canvas coordinates.
#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn top_center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y)
    }

    pub fn bottom_center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height)
    }

    #[cfg(test)]
    fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VmBox {
    pub id: String,
    pub name: String,
    pub private_ip: String,
    pub public_ip: Option<String>,
    pub power_state: PowerState,
    pub os_type: String,
    pub size: String,
    pub rect: Rect,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetBox {
    pub id: String,
    pub name: String,
    pub address_prefix: String,
    pub nsg_name: Option<String>,
    pub rect: Rect,
    pub vms: Vec<VmBox>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VNetBox {
    pub id: String,
    pub name: String,
    pub location: String,
    pub address_prefixes: Vec<String>,
    pub vm_count: usize,
    pub column: usize,
    pub rect: Rect,
    pub subnets: Vec<SubnetBox>,
}

/// Straight peering line from one VNet box to another.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub name: String,
    pub from_vnet_id: String,
    pub to_vnet_id: String,
    pub state: PeeringState,
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

/// Absolute geometry of a whole diagram.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub vnets: Vec<VNetBox>,
    pub connectors: Vec<Connector>,
}

impl Geometry {
    pub fn is_empty(&self) -> bool {
        self.vnets.is_empty()
    }
}

/// Rows needed for `vm_count` VMs.
fn vm_rows(vm_count: usize) -> u32 {
    vm_count.div_ceil(VMS_PER_ROW) as u32
}

/// Height of a subnet slot, including the margin below its box.
pub fn subnet_height(vm_count: usize) -> u32 {
    let body = match vm_count {
        0 => EMPTY_SUBNET_BODY,
        n => vm_rows(n) * (VM_BOX_HEIGHT + VM_ROW_MARGIN),
    };
    SUBNET_HEADER_HEIGHT + body + SUBNET_BOTTOM_MARGIN
}

/// Height of a VNet box.
pub fn vnet_height(vnet: &TopologyVNet) -> u32 {
    let body = match vnet.subnets.is_empty() {
        true => EMPTY_VNET_BODY,
        false => vnet.subnets.iter().map(|s| subnet_height(s.vms.len())).sum(),
    };
    VNET_HEADER_HEIGHT + VNET_PADDING + body
}

/// Lay out VNets, already sorted by the topology builder, into `columns` columns.
///
/// # Arguments
/// * `vnets` - VNets in placement order
/// * `peerings` - De-duplicated peerings, one connector each
/// * `columns` - Number of columns, clamped to `1..=MAX_COLUMNS`
///
/// # Returns
/// The diagram geometry; empty and 0x0 when there are no VNets.
pub fn layout(vnets: &[TopologyVNet], peerings: &[Peering], columns: usize) -> Geometry {
    if vnets.is_empty() {
        return Geometry::default();
    }
    let columns = columns.clamp(1, MAX_COLUMNS);

    let mut column_heights = vec![TOP_MARGIN; columns];
    let mut boxes = Vec::with_capacity(vnets.len());

    for vnet in vnets {
        let column = shortest_column(&column_heights);
        let height = vnet_height(vnet);
        let rect = Rect {
            x: MARGIN + column as u32 * (VNET_WIDTH + MARGIN),
            y: column_heights[column],
            width: VNET_WIDTH,
            height,
        };
        column_heights[column] = column_heights[column].saturating_add(height + VNET_MARGIN);
        log::trace!(
            "layout: VNet {} -> column {column} at y={} h={height}",
            vnet.name,
            rect.y
        );
        boxes.push(place_vnet(vnet, column, rect));
    }

    let connectors = connect(&boxes, peerings);

    let width = columns as u32 * (VNET_WIDTH + MARGIN) + MARGIN;
    let height = column_heights
        .iter()
        .copied()
        .max()
        .unwrap_or(TOP_MARGIN)
        .saturating_add(MARGIN);

    log::debug!(
        "layout: {} VNets in {columns} columns, {} connectors, canvas {width}x{height}",
        boxes.len(),
        connectors.len()
    );

    Geometry {
        width,
        height,
        vnets: boxes,
        connectors,
    }
}

/// [`layout`] with the default column count.
pub fn layout_topology(topology: &BuiltTopology) -> Geometry {
    layout(&topology.vnets, &topology.peerings, DEFAULT_COLUMNS)
}

/// Index of the shortest column, lowest index on ties.
fn shortest_column(column_heights: &[u32]) -> usize {
    let mut best = 0;
    for (i, &h) in column_heights.iter().enumerate() {
        if h < column_heights[best] {
            best = i;
        }
    }
    best
}

fn place_vnet(vnet: &TopologyVNet, column: usize, rect: Rect) -> VNetBox {
    let x = rect.x + VNET_PADDING;
    let mut y = rect.y + VNET_HEADER_HEIGHT + VNET_PADDING;
    let mut subnets = Vec::with_capacity(vnet.subnets.len());

    for subnet in &vnet.subnets {
        let slot = subnet_height(subnet.vms.len());
        let subnet_rect = Rect {
            x,
            y,
            width: SUBNET_WIDTH,
            height: slot - SUBNET_BOTTOM_MARGIN,
        };
        subnets.push(place_subnet(subnet, subnet_rect));
        y += slot;
    }

    VNetBox {
        id: vnet.id.clone(),
        name: vnet.name.clone(),
        location: vnet.location.clone(),
        address_prefixes: vnet.address_prefixes.clone(),
        vm_count: vnet.vm_count,
        column,
        rect,
        subnets,
    }
}

fn place_subnet(subnet: &TopologySubnet, rect: Rect) -> SubnetBox {
    let vms = subnet
        .vms
        .iter()
        .enumerate()
        .map(|(i, vm)| {
            let row = (i / VMS_PER_ROW) as u32;
            let col = (i % VMS_PER_ROW) as u32;
            let vm_rect = Rect {
                x: rect.x + SUBNET_PADDING + col * (VM_BOX_WIDTH + VM_COL_MARGIN),
                y: rect.y + SUBNET_HEADER_HEIGHT + row * (VM_BOX_HEIGHT + VM_ROW_MARGIN),
                width: VM_BOX_WIDTH,
                height: VM_BOX_HEIGHT,
            };
            vm_box(vm, vm_rect)
        })
        .collect();

    SubnetBox {
        id: subnet.id.clone(),
        name: subnet.name.clone(),
        address_prefix: subnet.address_prefix.clone(),
        nsg_name: subnet.nsg.as_ref().map(|nsg| nsg.name.clone()),
        rect,
        vms,
    }
}

fn vm_box(vm: &VirtualMachine, rect: Rect) -> VmBox {
    VmBox {
        id: vm.id.clone(),
        name: vm.name.clone(),
        private_ip: vm.private_ip.clone(),
        public_ip: vm.public_ip.clone(),
        power_state: vm.power_state,
        os_type: vm.os_type.clone(),
        size: vm.size.clone(),
        rect,
    }
}

/// One connector per peering, source bottom-center to target top-center,
/// whatever the relative position of the two boxes.
fn connect(boxes: &[VNetBox], peerings: &[Peering]) -> Vec<Connector> {
    let rect_by_id: HashMap<String, Rect> = boxes
        .iter()
        .map(|b| (normalize_id(&b.id), b.rect))
        .collect();

    peerings
        .iter()
        .filter_map(|peering| {
            let from_key = normalize_id(&peering.from_vnet_id);
            let to_key = normalize_id(&peering.to_vnet_id);
            if from_key == to_key {
                log::debug!("layout: skipping self peering {}", peering.name);
                return None;
            }
            let (Some(from), Some(to)) = (rect_by_id.get(&from_key), rect_by_id.get(&to_key))
            else {
                log::debug!(
                    "layout: peering {} points outside the inventory ({})",
                    peering.name,
                    peering.to_vnet_id
                );
                return None;
            };
            let (x1, y1) = from.bottom_center();
            let (x2, y2) = to.top_center();
            Some(Connector {
                name: peering.name.clone(),
                from_vnet_id: peering.from_vnet_id.clone(),
                to_vnet_id: peering.to_vnet_id.clone(),
                state: peering.state,
                x1,
                y1,
                x2,
                y2,
            })
        })
        .collect()
}
