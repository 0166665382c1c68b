//! Azure virtual machine model.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// VM power state, reduced to the states the diagram distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub enum PowerState {
    Running,
    Deallocated,
    Stopped,
    #[default]
    Unknown,
}

impl PowerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerState::Running => "running",
            PowerState::Deallocated => "deallocated",
            PowerState::Stopped => "stopped",
            PowerState::Unknown => "unknown",
        }
    }
}

/// Accepts `running` as well as instance view codes like `PowerState/running`.
impl From<&str> for PowerState {
    fn from(s: &str) -> Self {
        let s = s.trim().to_ascii_lowercase();
        let code = s.strip_prefix("powerstate/").unwrap_or(&s);
        match code {
            "running" => PowerState::Running,
            "deallocated" => PowerState::Deallocated,
            "stopped" => PowerState::Stopped,
            _ => PowerState::Unknown,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PowerState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PowerState {
    fn deserialize<D>(deserializer: D) -> Result<PowerState, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        Ok(s.as_deref().map(PowerState::from).unwrap_or_default())
    }
}

/// An Azure virtual machine.
///
/// `private_ip`, `public_ip` and `subnet_id` are usually empty in the raw
/// snapshot and filled in by [`crate::processing::enrich`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachine {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub resource_group: String,
    #[serde(default)]
    pub location: String,
    /// VM size, e.g. `Standard_B2s`.
    #[serde(default)]
    pub size: String,
    /// `Linux` or `Windows`.
    #[serde(default)]
    pub os_type: String,
    #[serde(default)]
    pub power_state: PowerState,
    #[serde(default)]
    pub nic_ids: Vec<String>,
    #[serde(rename = "privateIP", default)]
    pub private_ip: String,
    #[serde(rename = "publicIP", default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub subnet_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_state_from_codes() {
        assert_eq!(PowerState::from("running"), PowerState::Running);
        assert_eq!(PowerState::from("PowerState/running"), PowerState::Running);
        assert_eq!(PowerState::from("PowerState/Deallocated"), PowerState::Deallocated);
        assert_eq!(PowerState::from("STOPPED"), PowerState::Stopped);
        assert_eq!(PowerState::from("PowerState/starting"), PowerState::Unknown);
        assert_eq!(PowerState::from(""), PowerState::Unknown);
    }

    #[test]
    fn test_vm_deserialize() {
        let json = r#"{
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Compute/virtualMachines/vm1",
            "name": "vm1",
            "powerState": "PowerState/deallocated",
            "nicIds": ["/x/nic1"]
        }"#;
        let vm: VirtualMachine = serde_json::from_str(json).expect("Error parsing vm");
        assert_eq!(vm.power_state, PowerState::Deallocated);
        assert_eq!(vm.nic_ids, vec!["/x/nic1".to_string()]);
        assert_eq!(vm.private_ip, "");
        assert_eq!(vm.public_ip, None);
        assert_eq!(vm.subnet_id, None);
    }

    #[test]
    fn test_vm_deserialize_null_power_state() {
        let vm: VirtualMachine =
            serde_json::from_str(r#"{"id":"/x/vm","powerState":null}"#).expect("Error parsing vm");
        assert_eq!(vm.power_state, PowerState::Unknown);
    }

    #[test]
    fn test_vm_serialize_names() {
        let vm = VirtualMachine {
            id: "/x/vm".to_string(),
            power_state: PowerState::Running,
            private_ip: "10.0.0.4".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&vm).expect("Error serializing vm");
        assert_eq!(json["powerState"], "running");
        assert_eq!(json["privateIP"], "10.0.0.4");
        assert!(json["publicIP"].is_null());
    }
}
