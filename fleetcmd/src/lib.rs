//! # Fleetcmd
//!
//! Batch command executor for network device fleets.
//!
//! Fleetcmd runs an operator-supplied command list against each device in
//! an inventory, authenticating per device. Every device gets one
//! interactive SSH attempt; if that fails for any reason, the same
//! commands are retried once over a raw telnet login state machine. A
//! device that fails both stages is skipped with a warning - one broken
//! device never aborts the batch.
//!
//! ## Features
//!
//! - Async SSH sessions via russh, raw telnet fallback via tokio TCP
//! - Multi-vendor support (Cisco IOS, Juniper JUNOS, Extreme EXOS,
//!   MikroTik RouterOS) with hostname-prefix platform detection
//! - Enable-mode escalation on both protocol paths
//! - Per-device credential resolution with a pluggable secret prompt
//! - Strict per-device failure isolation and an end-of-run summary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fleetcmd::{BatchRunner, DeviceSpec, Inventory, SecretPrompt};
//! use secrecy::SecretString;
//!
//! struct StaticPrompt;
//!
//! impl SecretPrompt for StaticPrompt {
//!     fn prompt(&self, _label: &str) -> std::io::Result<SecretString> {
//!         Ok(SecretString::from("secret".to_string()))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut inventory = Inventory::new();
//!     inventory.insert(
//!         "sw-core1".to_string(),
//!         DeviceSpec {
//!             cmds: vec!["show version".to_string()],
//!             ..DeviceSpec::default()
//!         },
//!     );
//!
//!     let runner = BatchRunner::new(
//!         "ops".to_string(),
//!         SecretString::from("password".to_string()),
//!         ".net.example.com".to_string(),
//!         Box::new(StaticPrompt),
//!     );
//!
//!     let summary = runner.run(&inventory, |report| {
//!         println!("{}: {:?}", report.device, report.outcome.is_ok());
//!     })
//!     .await;
//!
//!     println!("{} succeeded, {} skipped", summary.succeeded, summary.skipped);
//! }
//! ```

pub mod batch;
pub mod channel;
pub mod config;
pub mod credentials;
pub mod error;
pub mod inventory;
pub mod platform;
pub mod resolve;
pub mod session;
pub mod transport;

// Re-export main types for convenience
pub use batch::{BatchRunner, BatchSummary, DeviceFailure, DeviceReport};
pub use config::AppConfig;
pub use credentials::{BatchCredentials, Credentials, SecretPrompt};
pub use error::Error;
pub use inventory::{load_inventory, DeviceSpec, Inventory};
pub use session::{
    CommandOutput, ConnectionParams, DeviceExecutor, ProtocolEngine, SessionFailure,
    SessionSuccess, Via,
};
