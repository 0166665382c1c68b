//! Azure network topology diagrams.
//!
//! Correlates independently fetched VNet, VM, NIC, NSG and public IP
//! inventories into a VNet -> subnet -> VM hierarchy and lays it out as a
//! deterministic SVG diagram.
//!
//! ```
//! use azure_topology_diagram::{models::RawTopology, render_topology};
//!
//! let result = render_topology(&RawTopology::default());
//! assert!(result.topology.vnets.is_empty());
//! assert_eq!(result.diagram.svg, "");
//! ```

pub mod azure;
pub mod config;
pub mod diagram;
pub mod models;
pub mod output;
pub mod processing;

use diagram::{layout, render_diagram, Diagram, DEFAULT_COLUMNS};
use models::{BuiltTopology, RawTopology};
use serde::Serialize;

/// Topology and its rendered diagram, as handed to the presentation layer.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct TopologyDiagram {
    pub topology: BuiltTopology,
    pub diagram: Diagram,
}

/// Build the topology from a raw snapshot and render it in the default two columns.
pub fn render_topology(raw: &RawTopology) -> TopologyDiagram {
    render_topology_with_columns(raw, DEFAULT_COLUMNS)
}

/// [`render_topology`] with an explicit column count.
pub fn render_topology_with_columns(raw: &RawTopology, columns: usize) -> TopologyDiagram {
    let topology = processing::build_topology(raw);
    let geometry = layout(&topology.vnets, &topology.peerings, columns);
    let diagram = render_diagram(&geometry);
    log::debug!(
        "render_topology: diagram {}x{} svg_len={}",
        diagram.width,
        diagram.height,
        diagram.svg.len()
    );
    TopologyDiagram { topology, diagram }
}
