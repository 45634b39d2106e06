//! MikroTik RouterOS platform definition.
//!
//! The RouterOS prompt is `[user@identity] >`. There is no pagination to
//! disable and no enable mode.

use crate::platform::PlatformDefinition;

/// Platform tag for MikroTik RouterOS.
pub const PLATFORM_NAME: &str = "mikrotik_routeros";

/// Create the MikroTik RouterOS platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new(PLATFORM_NAME, r"(?m)^\[[\w@.\-]+\]\s?>\s*$").unwrap()
}
