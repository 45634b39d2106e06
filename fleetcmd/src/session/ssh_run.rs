//! Interactive SSH stage of the protocol engine.

use std::time::Duration;

use log::{debug, warn};
use secrecy::{ExposeSecret, SecretString};

use super::{CommandOutput, ConnectionParams, DEFAULT_SSH_PORT};
use crate::channel::ShellChannel;
use crate::error::{PlatformError, Result};
use crate::platform::{Escalation, PlatformDefinition, PlatformRegistry};
use crate::transport::{SshConfig, SshTransport};

/// Run the command batch over an interactive SSH session.
///
/// Any error here - unknown platform tag, refused connection, failed
/// authentication, a prompt that never settles - is the caller's cue to
/// fall back to the raw telnet path.
pub(crate) async fn run(
    device: &str,
    params: &ConnectionParams,
    commands: &[String],
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<Vec<CommandOutput>> {
    let platform = PlatformRegistry::global()
        .get(&params.platform)
        .ok_or_else(|| PlatformError::UnknownPlatform {
            name: params.platform.clone(),
        })?;

    let ssh_config = SshConfig {
        host: params.host.clone(),
        port: params.port.unwrap_or(DEFAULT_SSH_PORT),
        username: params.credentials.username.clone(),
        password: params.credentials.password.clone(),
        connect_timeout,
        terminal_width: 511,
        terminal_height: 24,
    };

    let transport = SshTransport::connect(ssh_config).await?;

    let outcome = exec_commands(
        &transport,
        platform,
        params,
        commands,
        connect_timeout,
        read_timeout,
    )
    .await;

    // Best-effort disconnect; on the error path the dropped handle tears
    // the connection down.
    if let Err(err) = transport.close().await {
        debug!("{device}: ssh disconnect: {err}");
    }

    outcome
}

async fn exec_commands(
    transport: &SshTransport,
    platform: &PlatformDefinition,
    params: &ConnectionParams,
    commands: &[String],
    settle_timeout: Duration,
    read_timeout: Duration,
) -> Result<Vec<CommandOutput>> {
    let mut shell = transport.open_shell(read_timeout).await?;

    // Swallow the login banner up to the first prompt. A timeout here
    // usually means the platform tag does not match the device.
    shell
        .read_until_pattern(&platform.prompt, settle_timeout)
        .await?;

    for prep in &platform.session_prep {
        shell.send_line(prep).await?;
        shell.read_timed().await?;
    }

    if let Some(secret) = &params.credentials.enable_secret {
        match &platform.escalation {
            Some(escalation) => escalate(&mut shell, escalation, secret, read_timeout).await,
            None => debug!(
                "platform '{}' has no escalation sequence, enable secret unused",
                platform.name
            ),
        }
    }

    let mut outputs = Vec::with_capacity(commands.len());
    for command in commands {
        shell.send_line(command).await?;
        let raw = shell.read_timed().await?;
        outputs.push(CommandOutput {
            command: command.clone(),
            output: super::normalize_output(&String::from_utf8_lossy(&raw), command),
        });
    }

    Ok(outputs)
}

/// Request enable mode. Escalation failures are logged, not fatal: if the
/// secret was wrong, the escalated commands fail visibly on their own.
async fn escalate(
    shell: &mut ShellChannel,
    escalation: &Escalation,
    secret: &SecretString,
    read_timeout: Duration,
) {
    let attempt = async {
        shell.send_line(&escalation.command).await?;
        shell
            .read_until_pattern(&escalation.auth_prompt, read_timeout)
            .await?;
        shell.send_line(secret.expose_secret()).await?;
        shell.read_timed().await?;
        Ok::<(), crate::error::Error>(())
    };

    match attempt.await {
        Ok(()) => debug!("enable mode acquired"),
        Err(err) => warn!("privilege escalation failed: {err}"),
    }
}
