//! Inventory document model.
//!
//! The inventory is a YAML mapping keyed by device identifier. Iteration
//! order is the insertion order of the source file, which fixes the order
//! devices are processed in.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;

/// Ordered mapping from device identifier to its spec.
pub type Inventory = IndexMap<String, DeviceSpec>;

/// Per-device options and the commands to run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceSpec {
    /// Device-specific login; when set, a dedicated password prompt is
    /// issued for this device.
    pub login: Option<String>,

    /// Explicit platform tag override, passed through verbatim.
    pub platform: Option<String>,

    /// Whether to escalate to enable mode before running commands.
    #[serde(default)]
    pub enable: bool,

    /// Custom port, applied to whichever protocol ends up used.
    pub port: Option<u16>,

    /// Commands to execute, in order. An empty list is a per-device
    /// configuration error caught by the orchestrator, not a parse error.
    #[serde(default)]
    pub cmds: Vec<String>,
}

/// Load an inventory document from a YAML file.
pub fn load_inventory(path: &Path) -> Result<Inventory, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_device() {
        let inventory: Inventory = serde_yaml::from_str(
            r#"
sw-core1:
  cmds:
    - show version
"#,
        )
        .unwrap();

        let spec = &inventory["sw-core1"];
        assert_eq!(spec.cmds, vec!["show version"]);
        assert!(spec.login.is_none());
        assert!(spec.platform.is_none());
        assert!(!spec.enable);
        assert!(spec.port.is_none());
    }

    #[test]
    fn test_parse_full_device() {
        let inventory: Inventory = serde_yaml::from_str(
            r#"
mx-edge1:
  login: netops
  platform: juniper_junos
  enable: true
  port: 2022
  cmds:
    - show chassis hardware
    - show system uptime
"#,
        )
        .unwrap();

        let spec = &inventory["mx-edge1"];
        assert_eq!(spec.login.as_deref(), Some("netops"));
        assert_eq!(spec.platform.as_deref(), Some("juniper_junos"));
        assert!(spec.enable);
        assert_eq!(spec.port, Some(2022));
        assert_eq!(spec.cmds.len(), 2);
    }

    #[test]
    fn test_iteration_preserves_document_order() {
        let inventory: Inventory = serde_yaml::from_str(
            r#"
sw-b: {cmds: [a]}
mt-a: {cmds: [b]}
mx-c: {cmds: [c]}
"#,
        )
        .unwrap();

        let order: Vec<&str> = inventory.keys().map(String::as_str).collect();
        assert_eq!(order, vec!["sw-b", "mt-a", "mx-c"]);
    }

    #[test]
    fn test_missing_cmds_is_empty_not_parse_error() {
        let inventory: Inventory = serde_yaml::from_str("sw-bare: {login: ops}").unwrap();
        assert!(inventory["sw-bare"].cmds.is_empty());
    }
}
