//! Output formatting for the built topology.
//!
//! This module handles the text outputs of the binary:
//! - [`csv`] - CSV VM inventory
//! - [`terminal`] - Colored terminal summary

mod csv;
mod terminal;

pub use csv::{vm_print, vm_rows, VmPrintRow};
pub use terminal::{format_field, print_summary, summary_lines};
