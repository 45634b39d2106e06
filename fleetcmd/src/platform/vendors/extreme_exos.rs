//! Extreme EXOS platform definition.
//!
//! EXOS prompts carry a session counter (`SW1.2 #`) and a leading `*`
//! while the configuration is unsaved.

use crate::platform::PlatformDefinition;

/// Platform tag for Extreme EXOS.
pub const PLATFORM_NAME: &str = "extreme_exos";

/// Create the Extreme EXOS platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new(PLATFORM_NAME, r"(?m)^(\*\s?)?[\w.\-]+(\.\d+)?\s?[>#]\s*$")
        .unwrap()
        .with_prep("disable clipaging")
}
