//! Azure Resource Manager identifier helpers.
//!
//! ARM ids look like
//! `/subscriptions/<sub>/resourceGroups/<rg>/providers/Microsoft.Network/virtualNetworks/<name>`
//! and are compared case-insensitively by Azure, so every cross reference in
//! this crate goes through [`normalize_id`].

use regex::Regex;
use std::sync::OnceLock;

static RESOURCE_GROUP_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_resource_group_regex() -> &'static Regex {
    RESOURCE_GROUP_REGEX
        .get_or_init(|| Regex::new(r"(?i)/resourcegroups/([^/]+)").expect("Invalid Regex"))
}

/// Normalize an ARM id for use as a map key.
///
/// # Examples
/// ```
/// use azure_topology_diagram::models::normalize_id;
/// assert_eq!(normalize_id(" /Subscriptions/ABC/ "), "/subscriptions/abc");
/// ```
pub fn normalize_id(id: &str) -> String {
    id.trim().trim_end_matches('/').to_lowercase()
}

/// Last path segment of an ARM id, usually the resource name.
pub fn resource_name(id: &str) -> &str {
    id.trim()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}

/// Resource group segment of an ARM id, with its original casing.
pub fn resource_group(id: &str) -> Option<&str> {
    get_resource_group_regex()
        .captures(id)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
