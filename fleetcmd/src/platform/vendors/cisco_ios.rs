//! Cisco IOS platform definition.
//!
//! Prompts are `hostname>` in user exec and `hostname#` in privileged
//! exec. This is the only built-in platform with an enable-mode
//! escalation sequence.

use crate::platform::PlatformDefinition;

/// Platform tag for Cisco IOS.
pub const PLATFORM_NAME: &str = "cisco_ios";

/// Create the Cisco IOS platform definition.
pub fn platform() -> PlatformDefinition {
    PlatformDefinition::new(PLATFORM_NAME, r"(?m)^[\w.\-]+[>#]\s*$")
        .unwrap()
        .with_prep("terminal length 0")
        .with_prep("terminal width 511")
        .with_escalation("enable", r"(?i)password[:\s]*$")
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_match() {
        let platform = platform();
        assert!(platform.prompt.is_match(b"sw-core1>"));
        assert!(platform.prompt.is_match(b"sw-core1# "));
        assert!(platform.prompt.is_match(b"banner text\nsw-core1#"));
        assert!(!platform.prompt.is_match(b"Username:"));
    }

    #[test]
    fn test_escalation() {
        let platform = platform();
        let escalation = platform.escalation.expect("IOS has enable mode");
        assert_eq!(escalation.command, "enable");
        assert!(escalation.auth_prompt.is_match(b"Password: "));
        assert!(escalation.auth_prompt.is_match(b"password:"));
    }

    #[test]
    fn test_session_prep() {
        let platform = platform();
        assert_eq!(
            platform.session_prep,
            vec!["terminal length 0", "terminal width 511"]
        );
    }
}
