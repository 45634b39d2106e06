//! Platform registry for looking up platform definitions by tag.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::definition::PlatformDefinition;
use super::vendors;

static REGISTRY: Lazy<PlatformRegistry> = Lazy::new(PlatformRegistry::with_builtins);

/// Registry of the built-in platform definitions.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: HashMap<String, PlatformDefinition>,
}

impl PlatformRegistry {
    fn with_builtins() -> Self {
        let mut platforms = HashMap::new();
        for platform in [
            vendors::cisco_ios::platform(),
            vendors::juniper_junos::platform(),
            vendors::extreme_exos::platform(),
            vendors::mikrotik_routeros::platform(),
        ] {
            platforms.insert(platform.name.clone(), platform);
        }
        Self { platforms }
    }

    /// Get the global registry.
    pub fn global() -> &'static PlatformRegistry {
        &REGISTRY
    }

    /// Get a platform by tag.
    pub fn get(&self, name: &str) -> Option<&PlatformDefinition> {
        self.platforms.get(name)
    }

    /// Check if a platform tag is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.platforms.contains_key(name)
    }

    /// List all registered platform tags.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.platforms.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let registry = PlatformRegistry::global();
        for name in ["cisco_ios", "juniper_junos", "extreme_exos", "mikrotik_routeros"] {
            assert!(registry.contains(name), "missing platform '{name}'");
        }
        assert_eq!(registry.names().count(), 4);
    }

    #[test]
    fn test_unknown_tag() {
        assert!(PlatformRegistry::global().get("cisco_nxos").is_none());
    }
}
