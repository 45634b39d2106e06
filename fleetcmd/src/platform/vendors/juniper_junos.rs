//! Juniper JUNOS platform definition.
//!
//! Prompts are `user@router>` in operational mode and `user@router#` in
//! configuration mode. JUNOS has no enable mode; authorization comes from
//! the login class.

use crate::platform::PlatformDefinition;

/// Platform tag for Juniper JUNOS.
pub const PLATFORM_NAME: &str = "juniper_junos";

/// Create the Juniper JUNOS platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new(PLATFORM_NAME, r"(?m)^[\w\-@()/:\.]{1,63}[>#%]\s?$")
        .unwrap()
        .with_prep("set cli screen-length 0")
        .with_prep("set cli screen-width 511")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_match() {
        let platform = platform();
        assert!(platform.prompt.is_match(b"user@mx-edge1>"));
        assert!(platform.prompt.is_match(b"user@mx-edge1> "));
        assert!(platform.prompt.is_match(b"admin@mx960#"));
        assert!(platform.prompt.is_match(b"root@mx-edge1.lab%"));
        assert!(!platform.prompt.is_match(b"login:"));
    }

    #[test]
    fn test_no_escalation() {
        assert!(platform().escalation.is_none());
    }
}
