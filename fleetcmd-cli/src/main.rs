//! Command-line front end: argument parsing, interactive prompting and
//! console output. Everything protocol-shaped lives in the fleetcmd
//! library.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use fleetcmd::config::{AppConfig, DEFAULT_CONFIG_PATH};
use fleetcmd::{load_inventory, BatchRunner, SecretPrompt, Via};
use log::{info, warn};
use secrecy::SecretString;

/// Execute a command batch across a fleet of network devices.
#[derive(Debug, Parser)]
#[command(name = "fleetcmd", version, about)]
struct Cli {
    /// Common login for the network equipment (defaults to the invoking
    /// user).
    #[arg(short = 'l', long)]
    login: Option<String>,

    /// YAML file with devices and commands.
    inventory: PathBuf,
}

/// Echo-off console prompting.
struct ConsolePrompt;

impl SecretPrompt for ConsolePrompt {
    fn prompt(&self, label: &str) -> io::Result<SecretString> {
        rpassword::prompt_password(label).map(SecretString::from)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let config = AppConfig::load(Path::new(DEFAULT_CONFIG_PATH))
        .with_context(|| format!("loading {DEFAULT_CONFIG_PATH}"))?;

    let inventory = load_inventory(&cli.inventory)
        .with_context(|| format!("loading inventory {}", cli.inventory.display()))?;

    let login = match cli.login {
        Some(login) => login,
        None => std::env::var("USER").context("no --login given and $USER is not set")?,
    };

    info!("asking for password of user {login}");
    let password = rpassword::prompt_password("Password: ")
        .map(SecretString::from)
        .context("reading batch password")?;

    let runner = BatchRunner::new(login, password, config.def_domain, Box::new(ConsolePrompt));

    let summary = runner
        .run(&inventory, |report| match &report.outcome {
            Ok(success) => {
                if success.via == Via::Telnet {
                    warn!("{}: answered over telnet fallback", report.device);
                }
                for pair in &success.outputs {
                    println!("{}\n", pair.command);
                    println!("{}\n", pair.output);
                }
            }
            Err(_) => {
                // Already logged by the orchestrator; nothing on stdout.
            }
        })
        .await;

    info!(
        "{} device(s) succeeded, {} skipped",
        summary.succeeded, summary.skipped
    );

    Ok(())
}
