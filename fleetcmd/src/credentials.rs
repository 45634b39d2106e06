//! Per-device credential resolution.
//!
//! Credentials are resolved once per device, live for that device's
//! processing only, and are never logged. Interactive prompting sits
//! behind [`SecretPrompt`] so the orchestrator can be exercised without a
//! terminal.

use std::fmt;
use std::io;

use secrecy::SecretString;

use crate::inventory::DeviceSpec;

/// Source of interactively entered secrets (echo-off console input in the
/// CLI implementation).
pub trait SecretPrompt: Send + Sync {
    /// Read one secret from the operator.
    fn prompt(&self, label: &str) -> io::Result<SecretString>;
}

/// Resolved credentials for one device.
#[derive(Clone)]
pub struct Credentials {
    /// Username for both protocol stages.
    pub username: String,

    /// Login password.
    pub password: SecretString,

    /// Enable-mode secret, when the device asks for escalation.
    pub enable_secret: Option<SecretString>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// The batch-wide login and its password, prompted once before the run.
#[derive(Clone)]
pub struct BatchCredentials {
    pub login: String,
    pub password: SecretString,
}

/// Resolve the credentials for one device.
///
/// A device without its own `login` reuses the batch credentials. A
/// device-specific login gets exactly one fresh password prompt; the
/// batch password is never reused across logins. A truthy `enable` flag
/// adds exactly one enable-secret prompt.
pub fn resolve_credentials(
    device: &str,
    spec: &DeviceSpec,
    batch: &BatchCredentials,
    prompter: &dyn SecretPrompt,
) -> io::Result<Credentials> {
    let (username, password) = match &spec.login {
        None => (batch.login.clone(), batch.password.clone()),
        Some(login) => {
            let password = prompter.prompt(&format!("{login}'s password on {device}: "))?;
            (login.clone(), password)
        }
    };

    let enable_secret = if spec.enable {
        Some(prompter.prompt(&format!("enable secret for {device}: "))?)
    } else {
        None
    };

    Ok(Credentials {
        username,
        password,
        enable_secret,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records every label it is asked for.
    pub(crate) struct RecordingPrompt {
        pub labels: Mutex<Vec<String>>,
    }

    impl RecordingPrompt {
        pub(crate) fn new() -> Self {
            Self {
                labels: Mutex::new(Vec::new()),
            }
        }
    }

    impl SecretPrompt for RecordingPrompt {
        fn prompt(&self, label: &str) -> io::Result<SecretString> {
            self.labels.lock().unwrap().push(label.to_string());
            Ok(SecretString::from("prompted-secret".to_string()))
        }
    }

    fn batch() -> BatchCredentials {
        BatchCredentials {
            login: "ops".to_string(),
            password: SecretString::from("batch-password".to_string()),
        }
    }

    #[test]
    fn test_default_login_never_prompts() {
        let prompter = RecordingPrompt::new();
        let spec = DeviceSpec {
            cmds: vec!["show version".into()],
            ..DeviceSpec::default()
        };

        let creds = resolve_credentials("sw-core1", &spec, &batch(), &prompter).unwrap();
        assert_eq!(creds.username, "ops");
        assert!(creds.enable_secret.is_none());
        assert!(prompter.labels.lock().unwrap().is_empty());
    }

    #[test]
    fn test_custom_login_prompts_exactly_once() {
        let prompter = RecordingPrompt::new();
        let spec = DeviceSpec {
            login: Some("netops".into()),
            cmds: vec!["show version".into()],
            ..DeviceSpec::default()
        };

        let creds = resolve_credentials("mx-edge1", &spec, &batch(), &prompter).unwrap();
        assert_eq!(creds.username, "netops");

        let labels = prompter.labels.lock().unwrap();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].contains("netops"));
        assert!(labels[0].contains("mx-edge1"));
    }

    #[test]
    fn test_enable_flag_adds_one_prompt() {
        let prompter = RecordingPrompt::new();
        let spec = DeviceSpec {
            enable: true,
            cmds: vec!["show running-config".into()],
            ..DeviceSpec::default()
        };

        let creds = resolve_credentials("sw-core1", &spec, &batch(), &prompter).unwrap();
        assert!(creds.enable_secret.is_some());

        let labels = prompter.labels.lock().unwrap();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].contains("sw-core1"));
    }

    #[test]
    fn test_debug_never_exposes_secrets() {
        let creds = Credentials {
            username: "ops".into(),
            password: SecretString::from("hunter2".to_string()),
            enable_secret: Some(SecretString::from("hunter3".to_string())),
        };
        let printed = format!("{creds:?}");
        assert!(!printed.contains("hunter2"));
        assert!(!printed.contains("hunter3"));
    }
}
