//! Cache management for inventory snapshots.
//!
//! Provides caching functionality to avoid repeated Azure Graph API calls.
//! Only the raw snapshot is cached; diagrams are always rebuilt from it.

use super::graph::fetch_raw_topology;
use crate::models::RawTopology;
use std::error::Error;
use std::path::Path;

/// Dated default snapshot name, e.g. `topology_cache_2024-05-01.json`.
pub fn default_cache_file() -> String {
    let now = chrono::Utc::now().with_timezone(&chrono_tz::Pacific::Auckland);
    format!("topology_cache_{}.json", now.format("%Y-%m-%d"))
}

/// Read and parse a snapshot file.
pub fn load_topology_cache(cache_file: &str) -> Result<RawTopology, Box<dyn Error>> {
    let json = std::fs::read_to_string(cache_file)
        .map_err(|e| format!("Error reading cache file {cache_file}: {e}"))?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let raw: RawTopology = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        format!(
            "Error parsing cache JSON {cache_file}: path={} error={}",
            e.path(),
            e
        )
    })?;
    log::info!(
        "Read cache file: {cache_file} vnets={} vms={} errors={}",
        raw.vnets.len(),
        raw.vms.len(),
        raw.errors.len()
    );
    Ok(raw)
}

/// Read the snapshot from cache file, or fetch from Azure if the cache doesn't exist.
///
/// # Arguments
/// * `cache_file` - Optional path to a specific cache file. If None, uses default naming.
///
/// # Returns
/// * `Ok(RawTopology)` - The snapshot from cache or Azure
/// * `Err` - If cache file specified but doesn't exist, or it cannot be parsed
pub async fn read_topology_cache(cache_file: Option<&str>) -> Result<RawTopology, Box<dyn Error>> {
    let cache_file = match cache_file {
        Some(file) => {
            if !Path::new(file).exists() {
                return Err(format!("Cache file does not exist: {file}").into());
            }
            log::info!("Using provided cache file: {file}");
            file.to_string()
        }
        None => default_cache_file(),
    };

    if Path::new(&cache_file).exists() {
        return load_topology_cache(&cache_file);
    }

    log::warn!("Cache file not found: {cache_file}");
    let raw = fetch_raw_topology().await;

    if raw.errors.is_empty() {
        let json =
            serde_json::to_string(&raw).map_err(|e| format!("Error serializing JSON: {e}"))?;
        log::warn!("Writing data to cache file: {cache_file}");
        std::fs::write(&cache_file, json)
            .map_err(|e| format!("Error writing cache file {cache_file}: {e}"))?;
    } else {
        log::warn!(
            "Not caching partial snapshot ({} fetch errors)",
            raw.errors.len()
        );
    }

    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_CACHE: &str = "src/tests/test_data/topology_test_cache_01.json";

    #[test]
    fn test_load_topology_cache() {
        let raw = load_topology_cache(TEST_CACHE).expect("Error reading topology cache");
        assert_eq!(raw.vnets.len(), 3, "Wrong vnet count in test sample.");
        assert_eq!(raw.vnets[0].name, "hub-vnet");
        assert_eq!(raw.vms.len(), 5);
        assert_eq!(raw.errors.len(), 1);
        assert!(raw.fetched_at.is_some());
    }

    #[test]
    fn test_load_topology_cache_missing() {
        let err = load_topology_cache("src/tests/test_data/does_not_exist.json")
            .expect_err("missing file must fail");
        assert!(err.to_string().contains("does_not_exist.json"));
    }

    #[test]
    fn test_default_cache_file_name() {
        let name = default_cache_file();
        assert!(name.starts_with("topology_cache_"));
        assert!(name.ends_with(".json"));
        assert_eq!(name.len(), "topology_cache_2024-05-01.json".len());
    }

    #[tokio::test]
    async fn test_read_topology_cache_provided_file() {
        let raw = read_topology_cache(Some(TEST_CACHE))
            .await
            .expect("Error reading topology cache");
        assert_eq!(raw.nics.len(), 4);
    }

    #[tokio::test]
    async fn test_read_topology_cache_provided_file_missing() {
        let result = read_topology_cache(Some("src/tests/test_data/nope.json")).await;
        assert!(result.is_err());
    }
}
