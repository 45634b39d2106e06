//! Platform and address resolution for device identifiers.

use std::net::IpAddr;

use crate::platform::vendors;

/// Hostname-prefix to platform-tag table. The prefix is the part of the
/// identifier before the first `-`.
const PREFIX_PLATFORMS: &[(&str, &str)] = &[
    ("mx", vendors::juniper_junos::PLATFORM_NAME),
    ("swe", vendors::extreme_exos::PLATFORM_NAME),
    ("sw", vendors::cisco_ios::PLATFORM_NAME),
    ("mt", vendors::mikrotik_routeros::PLATFORM_NAME),
];

/// Platform tag used when no prefix matches.
pub const DEFAULT_PLATFORM: &str = vendors::mikrotik_routeros::PLATFORM_NAME;

/// Resolve the platform tag for a device.
///
/// A non-empty explicit override wins and is passed through verbatim; an
/// unknown tag surfaces later as a connection-stage error. Otherwise the
/// hostname prefix selects a tag from the table, falling back to
/// [`DEFAULT_PLATFORM`].
pub fn resolve_platform(identifier: &str, explicit: Option<&str>) -> String {
    if let Some(tag) = explicit {
        if !tag.is_empty() {
            return tag.to_string();
        }
    }

    let prefix = identifier.split('-').next().unwrap_or("");
    PREFIX_PLATFORMS
        .iter()
        .find(|(candidate, _)| *candidate == prefix)
        .map_or_else(|| DEFAULT_PLATFORM.to_string(), |(_, tag)| (*tag).to_string())
}

/// Resolve the network address for a device.
///
/// Literal IPv4/IPv6 addresses pass through unchanged; anything else gets
/// the default domain appended. The result is not validated further, so a
/// malformed name surfaces as a connection failure.
pub fn resolve_address(identifier: &str, default_domain: &str) -> String {
    if identifier.parse::<IpAddr>().is_ok() {
        identifier.to_string()
    } else {
        format!("{identifier}{default_domain}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_table() {
        assert_eq!(resolve_platform("mx-edge1", None), "juniper_junos");
        assert_eq!(resolve_platform("swe-agg1", None), "extreme_exos");
        assert_eq!(resolve_platform("sw-core1", None), "cisco_ios");
        assert_eq!(resolve_platform("mt-gw1", None), "mikrotik_routeros");
    }

    #[test]
    fn test_unmapped_prefix_gets_default() {
        assert_eq!(resolve_platform("fw-dmz1", None), DEFAULT_PLATFORM);
        assert_eq!(resolve_platform("nodash", None), DEFAULT_PLATFORM);
        assert_eq!(resolve_platform("", None), DEFAULT_PLATFORM);
    }

    #[test]
    fn test_explicit_override_verbatim() {
        // No validation against the registry here: an unknown tag is the
        // connection stage's problem.
        assert_eq!(
            resolve_platform("sw-core1", Some("cisco_nxos")),
            "cisco_nxos"
        );
    }

    #[test]
    fn test_empty_override_falls_back_to_prefix() {
        assert_eq!(resolve_platform("sw-core1", Some("")), "cisco_ios");
    }

    #[test]
    fn test_literal_addresses_unchanged() {
        assert_eq!(resolve_address("10.0.0.5", ".example.com"), "10.0.0.5");
        assert_eq!(resolve_address("2001:db8::1", ".example.com"), "2001:db8::1");
    }

    #[test]
    fn test_names_get_domain_suffix() {
        assert_eq!(
            resolve_address("sw-core1", ".example.com"),
            "sw-core1.example.com"
        );
        // Almost-literals are still names.
        assert_eq!(
            resolve_address("10.0.0", ".example.com"),
            "10.0.0.example.com"
        );
    }
}
