//! Batch orchestrator: drives the device loop.
//!
//! Devices are processed strictly one at a time, in inventory order.
//! Every per-device error is converted to a warning and a skip; nothing a
//! single device does can abort the batch.

use log::{info, warn};
use secrecy::SecretString;
use thiserror::Error;

use crate::credentials::{resolve_credentials, BatchCredentials, SecretPrompt};
use crate::inventory::{DeviceSpec, Inventory};
use crate::resolve::{resolve_address, resolve_platform};
use crate::session::{
    ConnectionParams, DeviceExecutor, ProtocolEngine, SessionFailure, SessionSuccess,
};

/// Why a device was skipped.
#[derive(Error, Debug)]
pub enum DeviceFailure {
    /// The inventory entry has no commands.
    #[error("no commands configured for this device")]
    NoCommands,

    /// An interactive secret prompt failed.
    #[error("secret prompt failed: {0}")]
    Prompt(#[source] std::io::Error),

    /// Both protocol stages failed.
    #[error(transparent)]
    Session(#[from] SessionFailure),
}

/// Outcome of one device's processing.
#[derive(Debug)]
pub struct DeviceReport {
    /// Device identifier from the inventory.
    pub device: String,

    /// The command outputs, or why the device was skipped.
    pub outcome: Result<SessionSuccess, DeviceFailure>,
}

/// End-of-run totals.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Devices whose whole command list ran.
    pub succeeded: usize,

    /// Devices skipped after a failure.
    pub skipped: usize,

    /// Per-device reports, in processing order.
    pub reports: Vec<DeviceReport>,
}

/// Drives the whole batch against a device executor.
pub struct BatchRunner<E = ProtocolEngine> {
    login: String,
    password: SecretString,
    default_domain: String,
    prompter: Box<dyn SecretPrompt>,
    engine: E,
}

impl BatchRunner<ProtocolEngine> {
    /// Create a runner with the real two-stage protocol engine.
    pub fn new(
        login: String,
        password: SecretString,
        default_domain: String,
        prompter: Box<dyn SecretPrompt>,
    ) -> Self {
        Self::with_engine(login, password, default_domain, prompter, ProtocolEngine::new())
    }
}

impl<E: DeviceExecutor> BatchRunner<E> {
    /// Create a runner with a custom executor.
    pub fn with_engine(
        login: String,
        password: SecretString,
        default_domain: String,
        prompter: Box<dyn SecretPrompt>,
        engine: E,
    ) -> Self {
        Self {
            login,
            password,
            default_domain,
            prompter,
            engine,
        }
    }

    /// Process every device in inventory order.
    ///
    /// `observe` is called with each report as soon as the device
    /// finishes, so output streams while the batch is still running.
    pub async fn run(
        &self,
        inventory: &Inventory,
        mut observe: impl FnMut(&DeviceReport),
    ) -> BatchSummary {
        let batch_credentials = BatchCredentials {
            login: self.login.clone(),
            password: self.password.clone(),
        };

        let mut summary = BatchSummary::default();
        for (device, spec) in inventory {
            info!("logging into {device}");

            let report = self.process_device(device, spec, &batch_credentials).await;
            match &report.outcome {
                Ok(_) => summary.succeeded += 1,
                Err(failure) => {
                    warn!("{device}: skipped: {failure}");
                    summary.skipped += 1;
                }
            }

            observe(&report);
            summary.reports.push(report);
        }

        info!(
            "batch finished: {} succeeded, {} skipped",
            summary.succeeded, summary.skipped
        );
        summary
    }

    async fn process_device(
        &self,
        device: &str,
        spec: &DeviceSpec,
        batch_credentials: &BatchCredentials,
    ) -> DeviceReport {
        if spec.cmds.is_empty() {
            return DeviceReport {
                device: device.to_string(),
                outcome: Err(DeviceFailure::NoCommands),
            };
        }

        let credentials =
            match resolve_credentials(device, spec, batch_credentials, self.prompter.as_ref()) {
                Ok(credentials) => credentials,
                Err(err) => {
                    return DeviceReport {
                        device: device.to_string(),
                        outcome: Err(DeviceFailure::Prompt(err)),
                    };
                }
            };

        let params = ConnectionParams {
            host: resolve_address(device, &self.default_domain),
            port: spec.port,
            platform: resolve_platform(device, spec.platform.as_deref()),
            credentials,
        };

        let outcome = self
            .engine
            .run_device(device, &params, &spec.cmds)
            .await
            .map_err(DeviceFailure::from);

        DeviceReport {
            device: device.to_string(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use secrecy::SecretString;

    use super::*;
    use crate::session::{CommandOutput, Via};

    /// Scripted executor: fails listed devices, records every call.
    struct ScriptedEngine {
        fail: Vec<String>,
        calls: Mutex<Vec<(String, String, String)>>,
    }

    impl ScriptedEngine {
        fn new(fail: &[&str]) -> Self {
            Self {
                fail: fail.iter().map(|d| d.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl DeviceExecutor for ScriptedEngine {
        async fn run_device(
            &self,
            device: &str,
            params: &ConnectionParams,
            commands: &[String],
        ) -> Result<SessionSuccess, SessionFailure> {
            self.calls.lock().unwrap().push((
                device.to_string(),
                params.host.clone(),
                params.platform.clone(),
            ));

            if self.fail.iter().any(|d| d == device) {
                return Err(SessionFailure::RawAuth {
                    device: device.to_string(),
                });
            }

            Ok(SessionSuccess {
                via: Via::Ssh,
                outputs: commands
                    .iter()
                    .map(|command| CommandOutput {
                        command: command.clone(),
                        output: format!("{command}: ok"),
                    })
                    .collect(),
            })
        }
    }

    struct CountingPrompt {
        labels: Arc<Mutex<Vec<String>>>,
    }

    impl CountingPrompt {
        fn new() -> Self {
            Self {
                labels: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl SecretPrompt for CountingPrompt {
        fn prompt(&self, label: &str) -> io::Result<SecretString> {
            self.labels.lock().unwrap().push(label.to_string());
            Ok(SecretString::from("prompted".to_string()))
        }
    }

    fn runner(engine: ScriptedEngine) -> BatchRunner<ScriptedEngine> {
        BatchRunner::with_engine(
            "ops".to_string(),
            SecretString::from("batch-password".to_string()),
            ".example.com".to_string(),
            Box::new(CountingPrompt::new()),
            engine,
        )
    }

    fn inventory(yaml: &str) -> Inventory {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[tokio::test]
    async fn test_one_failure_never_stops_the_batch() {
        let runner = runner(ScriptedEngine::new(&["sw-bad"]));
        let inventory = inventory(
            r#"
sw-good1: {cmds: [show version]}
sw-bad: {cmds: [show version]}
sw-good2: {cmds: [show version]}
"#,
        );

        let summary = runner.run(&inventory, |_| {}).await;

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.skipped, 1);

        let calls = runner.engine.calls.lock().unwrap();
        let order: Vec<&str> = calls.iter().map(|(d, _, _)| d.as_str()).collect();
        assert_eq!(order, vec!["sw-good1", "sw-bad", "sw-good2"]);
    }

    #[tokio::test]
    async fn test_device_without_commands_is_skipped_without_dialing() {
        let runner = runner(ScriptedEngine::new(&[]));
        let inventory = inventory(
            r#"
sw-bare: {login: ops}
sw-real: {cmds: [show clock]}
"#,
        );

        let summary = runner.run(&inventory, |_| {}).await;

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped, 1);
        assert!(matches!(
            summary.reports[0].outcome,
            Err(DeviceFailure::NoCommands)
        ));

        let calls = runner.engine.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "sw-real");
    }

    #[tokio::test]
    async fn test_resolution_feeds_the_engine() {
        let runner = runner(ScriptedEngine::new(&[]));
        let inventory = inventory(
            r#"
sw-core1: {cmds: [show version]}
10.0.0.5: {platform: cisco_ios, cmds: [show ip route]}
"#,
        );

        runner.run(&inventory, |_| {}).await;

        let calls = runner.engine.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            (
                "sw-core1".to_string(),
                "sw-core1.example.com".to_string(),
                "cisco_ios".to_string()
            )
        );
        // Literal address passes through untouched.
        assert_eq!(calls[1].1, "10.0.0.5");
        assert_eq!(calls[1].2, "cisco_ios");
    }

    #[tokio::test]
    async fn test_custom_login_prompts_once_per_device() {
        let engine = ScriptedEngine::new(&[]);
        let prompter = CountingPrompt::new();
        let labels = prompter.labels.clone();
        let runner = BatchRunner::with_engine(
            "ops".to_string(),
            SecretString::from("batch-password".to_string()),
            ".example.com".to_string(),
            Box::new(prompter),
            engine,
        );

        let inventory = inventory(
            r#"
sw-default: {cmds: [show version]}
mx-special: {login: netops, cmds: [show system uptime]}
"#,
        );

        let summary = runner.run(&inventory, |_| {}).await;
        assert_eq!(summary.succeeded, 2);

        // Only the device with its own login prompted, and only once.
        let labels = labels.lock().unwrap();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].contains("netops"));
        assert!(labels[0].contains("mx-special"));
    }

    #[tokio::test]
    async fn test_reports_stream_through_the_observer() {
        let runner = runner(ScriptedEngine::new(&["mt-down"]));
        let inventory = inventory(
            r#"
mt-up: {cmds: [/system identity print]}
mt-down: {cmds: [/system identity print]}
"#,
        );

        let mut seen = Vec::new();
        runner
            .run(&inventory, |report| {
                seen.push((report.device.clone(), report.outcome.is_ok()));
            })
            .await;

        assert_eq!(
            seen,
            vec![("mt-up".to_string(), true), ("mt-down".to_string(), false)]
        );
    }
}
