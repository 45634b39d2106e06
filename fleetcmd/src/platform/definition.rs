//! Platform definition for vendor-specific dialect behavior.

use regex::bytes::Regex;

/// Platform definition selecting per-vendor session behavior.
///
/// The prompt pattern is only used to settle the login banner; command
/// output capture is time-boxed and does not scan for prompts.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform tag (e.g. "cisco_ios", "juniper_junos").
    pub name: String,

    /// Pattern marking a settled command prompt after login.
    pub prompt: Regex,

    /// Commands run once after login, before the batch commands
    /// (pagination off and the like).
    pub session_prep: Vec<String>,

    /// Privilege escalation sequence, for platforms that have one.
    pub escalation: Option<Escalation>,
}

/// An enable-mode escalation sequence.
#[derive(Debug, Clone)]
pub struct Escalation {
    /// Command that requests escalation.
    pub command: String,

    /// Pattern of the secret prompt the device answers with.
    pub auth_prompt: Regex,
}

impl PlatformDefinition {
    /// Create a new platform definition with a prompt pattern.
    pub fn new(name: impl Into<String>, prompt_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            prompt: Regex::new(prompt_pattern)?,
            session_prep: vec![],
            escalation: None,
        })
    }

    /// Add a session-preparation command.
    pub fn with_prep(mut self, command: impl Into<String>) -> Self {
        self.session_prep.push(command.into());
        self
    }

    /// Set the escalation sequence.
    pub fn with_escalation(
        mut self,
        command: impl Into<String>,
        auth_prompt_pattern: &str,
    ) -> Result<Self, regex::Error> {
        self.escalation = Some(Escalation {
            command: command.into(),
            auth_prompt: Regex::new(auth_prompt_pattern)?,
        });
        Ok(self)
    }
}
