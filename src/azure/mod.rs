//! Azure CLI and Graph API interaction.
//!
//! This module fills the raw snapshot the core works on:
//! - [`cli`] - Command execution for Azure CLI
//! - [`cache`] - Caching of inventory snapshots
//! - [`graph`] - Azure Resource Graph queries, one per resource type

mod cache;
mod cli;
mod graph;

// Re-export public types and functions
pub use cache::{default_cache_file, load_topology_cache, read_topology_cache};
pub use cli::run_az;
pub use graph::{fetch_raw_topology, parse_page, query_all, GraphPage};
