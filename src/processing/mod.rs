//! Topology reconstruction.
//!
//! This module contains the business logic that turns a raw snapshot into a
//! [`crate::models::BuiltTopology`]:
//! - [`correlate`] - VM enrichment from NICs and public IPs
//! - [`topology`] - VNet/subnet/VM hierarchy, orphans and peering de-duplication
//! - [`stats`] - aggregate counts

mod correlate;
mod stats;
mod topology;

// Re-export public functions
pub use correlate::enrich;
pub use stats::{compute_stats, count_assigned_public_ips};
pub use topology::{build, build_topology, dedup_peerings};
