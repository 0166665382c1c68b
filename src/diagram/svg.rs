//! SVG serialization of a laid out topology.
//!
//! The document is standalone: one embedded stylesheet, no external fonts or
//! images, so it can be inlined into a page or saved as-is.

use super::escape::{escape_xml, label};
use super::layout::{Connector, Geometry, SubnetBox, VNetBox, VmBox, VNET_PADDING};
use crate::models::{PeeringState, PowerState};
use serde::Serialize;

const VNET_LABEL_CHARS: usize = 56;
const VNET_META_CHARS: usize = 80;
const SUBNET_LABEL_CHARS: usize = 44;
const SUBNET_META_CHARS: usize = 60;
const VM_LABEL_CHARS: usize = 14;

const FONT_FAMILY: &str = "Segoe UI, Helvetica, Arial, sans-serif";

/// Power state -> (stroke, fill).
const POWER_STATE_COLORS: [(PowerState, &str, &str); 4] = [
    (PowerState::Running, "#2e7d32", "#e8f5e9"),
    (PowerState::Deallocated, "#757575", "#f5f5f5"),
    (PowerState::Stopped, "#c62828", "#ffebee"),
    (PowerState::Unknown, "#f9a825", "#fffde7"),
];

/// Peering state -> (stroke, dash pattern).
const PEERING_STYLES: [(PeeringState, &str, Option<&str>); 4] = [
    (PeeringState::Connected, "#1565c0", None),
    (PeeringState::Initiated, "#ef6c00", Some("6 4")),
    (PeeringState::Disconnected, "#c62828", Some("2 4")),
    (PeeringState::Unknown, "#757575", Some("4 4")),
];

/// Rendered diagram, as returned to the presentation layer.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagram {
    pub svg: String,
    pub width: u32,
    pub height: u32,
}

/// Render `geometry` into a [`Diagram`]; empty geometry gives an empty diagram.
pub fn render_diagram(geometry: &Geometry) -> Diagram {
    Diagram {
        svg: render_svg(geometry),
        width: geometry.width,
        height: geometry.height,
    }
}

/// Serialize `geometry` as an SVG document, or `""` when there is nothing to draw.
pub fn render_svg(geometry: &Geometry) -> String {
    if geometry.is_empty() {
        return String::new();
    }

    let (width, height) = (geometry.width, geometry.height);
    let mut svg = String::with_capacity(4096 + geometry.vnets.len() * 2048);

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" font-family=\"{FONT_FAMILY}\">\n",
    ));
    svg.push_str("<defs>\n<style>\n");
    svg.push_str(&stylesheet());
    svg.push_str("</style>\n");
    svg.push_str("<marker id=\"peering-arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"context-stroke\"/></marker>\n");
    svg.push_str("</defs>\n");
    svg.push_str("<rect class=\"background\" width=\"100%\" height=\"100%\"/>\n");

    for vnet in &geometry.vnets {
        push_vnet(&mut svg, vnet);
    }
    // connectors last so they are drawn over the boxes
    for connector in &geometry.connectors {
        push_connector(&mut svg, connector);
    }

    svg.push_str("</svg>\n");
    svg
}

/// Stroke and fill for a power state.
pub fn power_state_colors(state: PowerState) -> (&'static str, &'static str) {
    POWER_STATE_COLORS
        .iter()
        .find(|(s, _, _)| *s == state)
        .map(|(_, stroke, fill)| (*stroke, *fill))
        .unwrap_or(("#000000", "#ffffff"))
}

fn stylesheet() -> String {
    let mut css = String::from(
        ".background{fill:#ffffff}\n\
         .vnet-box{fill:#f3f8fd;stroke:#0d47a1;stroke-width:2}\n\
         .vnet-title{font-size:15px;font-weight:600;fill:#0d47a1}\n\
         .vnet-meta{font-size:11px;fill:#37474f}\n\
         .subnet-box{fill:#ffffff;stroke:#90a4ae;stroke-width:1}\n\
         .subnet-title{font-size:12px;font-weight:600;fill:#263238}\n\
         .subnet-meta{font-size:10px;fill:#546e7a}\n\
         .empty-label{font-size:10px;font-style:italic;fill:#90a4ae}\n\
         .nsg-badge{fill:#fff3e0;stroke:#e65100;stroke-width:1}\n\
         .nsg-label{font-size:9px;font-weight:600;fill:#e65100}\n\
         .vm-box{stroke-width:1.5}\n\
         .vm-name{font-size:11px;fill:#212121}\n\
         .vm-ip{font-size:9px;fill:#616161}\n\
         .peering{stroke-width:2;fill:none}\n",
    );
    for (state, stroke, fill) in POWER_STATE_COLORS {
        css.push_str(&format!(".vm-{state}{{stroke:{stroke};fill:{fill}}}\n"));
    }
    for (state, stroke, dash) in PEERING_STYLES {
        match dash {
            Some(dash) => css.push_str(&format!(
                ".peering-{state}{{stroke:{stroke};stroke-dasharray:{dash}}}\n"
            )),
            None => css.push_str(&format!(".peering-{state}{{stroke:{stroke}}}\n")),
        }
    }
    css
}

fn push_vnet(svg: &mut String, vnet: &VNetBox) {
    let r = vnet.rect;
    let meta = format!(
        "{prefixes} · {location} · {count} VMs",
        prefixes = vnet.address_prefixes.join(", "),
        location = vnet.location,
        count = vnet.vm_count
    );

    svg.push_str("<g class=\"vnet\">\n");
    svg.push_str(&format!(
        "<title>{name}\n{meta}</title>\n",
        name = escape_xml(&vnet.name),
        meta = escape_xml(&meta)
    ));
    svg.push_str(&format!(
        "<rect class=\"vnet-box\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"8\"/>\n",
        r.x, r.y, r.width, r.height
    ));
    svg.push_str(&format!(
        "<text class=\"vnet-title\" x=\"{x}\" y=\"{y}\">{name}</text>\n",
        x = r.x + VNET_PADDING,
        y = r.y + 22,
        name = label(&vnet.name, VNET_LABEL_CHARS)
    ));
    svg.push_str(&format!(
        "<text class=\"vnet-meta\" x=\"{x}\" y=\"{y}\">{meta}</text>\n",
        x = r.x + VNET_PADDING,
        y = r.y + 40,
        meta = label(&meta, VNET_META_CHARS)
    ));
    if vnet.subnets.is_empty() {
        svg.push_str(&format!(
            "<text class=\"empty-label\" x=\"{x}\" y=\"{y}\">no subnets</text>\n",
            x = r.x + VNET_PADDING,
            y = r.y + r.height - 14
        ));
    }
    for subnet in &vnet.subnets {
        push_subnet(svg, subnet);
    }
    svg.push_str("</g>\n");
}

fn push_subnet(svg: &mut String, subnet: &SubnetBox) {
    let r = subnet.rect;

    svg.push_str("<g class=\"subnet\">\n");
    svg.push_str(&format!(
        "<title>{name}\n{prefix}</title>\n",
        name = escape_xml(&subnet.name),
        prefix = escape_xml(&subnet.address_prefix)
    ));
    svg.push_str(&format!(
        "<rect class=\"subnet-box\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"4\"/>\n",
        r.x, r.y, r.width, r.height
    ));
    svg.push_str(&format!(
        "<text class=\"subnet-title\" x=\"{x}\" y=\"{y}\">{name}</text>\n",
        x = r.x + 10,
        y = r.y + 15,
        name = label(&subnet.name, SUBNET_LABEL_CHARS)
    ));
    svg.push_str(&format!(
        "<text class=\"subnet-meta\" x=\"{x}\" y=\"{y}\">{prefix}</text>\n",
        x = r.x + 10,
        y = r.y + 27,
        prefix = label(&subnet.address_prefix, SUBNET_META_CHARS)
    ));

    if let Some(nsg_name) = &subnet.nsg_name {
        let bx = r.x + r.width - 48;
        svg.push_str(&format!(
            "<g class=\"nsg\"><title>NSG: {name}</title><rect class=\"nsg-badge\" x=\"{bx}\" y=\"{by}\" width=\"38\" height=\"16\" rx=\"3\"/><text class=\"nsg-label\" x=\"{tx}\" y=\"{ty}\" text-anchor=\"middle\">NSG</text></g>\n",
            name = escape_xml(nsg_name),
            by = r.y + 8,
            tx = bx + 19,
            ty = r.y + 19,
        ));
    }

    if subnet.vms.is_empty() {
        svg.push_str(&format!(
            "<text class=\"empty-label\" x=\"{x}\" y=\"{y}\">no VMs</text>\n",
            x = r.x + 10,
            y = r.y + r.height - 8
        ));
    }
    for vm in &subnet.vms {
        push_vm(svg, vm);
    }
    svg.push_str("</g>\n");
}

fn push_vm(svg: &mut String, vm: &VmBox) {
    let r = vm.rect;
    let mut title = format!(
        "{name}\n{state} · {size} · {os}",
        name = vm.name,
        state = vm.power_state,
        size = vm.size,
        os = vm.os_type
    );
    if !vm.private_ip.is_empty() {
        title.push_str(&format!("\nprivate {}", vm.private_ip));
    }
    if let Some(public_ip) = &vm.public_ip {
        title.push_str(&format!("\npublic {public_ip}"));
    }

    svg.push_str(&format!(
        "<g class=\"vm\"><title>{title}</title><rect class=\"vm-box vm-{state}\" x=\"{x}\" y=\"{y}\" width=\"{w}\" height=\"{h}\" rx=\"3\"/><text class=\"vm-name\" x=\"{tx}\" y=\"{ny}\">{name}</text><text class=\"vm-ip\" x=\"{tx}\" y=\"{iy}\">{ip}</text></g>\n",
        title = escape_xml(&title),
        state = vm.power_state,
        x = r.x,
        y = r.y,
        w = r.width,
        h = r.height,
        tx = r.x + 6,
        ny = r.y + 18,
        iy = r.y + 34,
        name = label(&vm.name, VM_LABEL_CHARS),
        ip = label(&vm.private_ip, VM_LABEL_CHARS + 2),
    ));
}

fn push_connector(svg: &mut String, c: &Connector) {
    svg.push_str(&format!(
        "<line class=\"peering peering-{state}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" marker-end=\"url(#peering-arrow)\"><title>{name} ({state})</title></line>\n",
        c.x1,
        c.y1,
        c.x2,
        c.y2,
        state = c.state,
        name = escape_xml(&c.name),
    ));
}
