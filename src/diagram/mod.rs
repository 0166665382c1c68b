//! Diagram generation for a built topology.
//!
//! - [`layout`] - greedy column packing into absolute geometry
//! - [`svg`] - standalone SVG serialization
//! - [`escape`] - XML escaping and label truncation

mod escape;
mod layout;
mod svg;

pub use escape::{escape_xml, truncate_label};
pub use layout::{
    layout, layout_topology, subnet_height, vnet_height, Connector, Geometry, Rect, SubnetBox,
    VNetBox, VmBox, DEFAULT_COLUMNS, MAX_COLUMNS, VMS_PER_ROW,
};
pub use svg::{power_state_colors, render_diagram, render_svg, Diagram};
