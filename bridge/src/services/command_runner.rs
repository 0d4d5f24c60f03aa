//! adb invocation service
//!
//! Launches `adb exec-out "am start ..."` for a validated URL and streams
//! both output channels back through the session's notifier.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::process::Stdio;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use shared::{ProcessId, process_debug, process_error, process_info, process_warn};

use crate::config::BridgeConfig;
use crate::error::LaunchError;
use crate::services::notifier::Notifier;
use crate::services::output_relay::{OutputChannel, spawn_relay};
use crate::traits::CommandRunner;
use crate::validator::ValidatedUrl;

/// Intent action used to open a URL in the target app
pub const VIEW_ACTION: &str = "android.intent.action.VIEW";

/// Exit code reported when the process was terminated by a signal
pub const SIGNALLED_EXIT_CODE: i32 = -1;

/// Real command runner backed by the adb binary
#[derive(Debug)]
pub struct AdbCommandRunner {
    adb_binary: String,
    target_package: String,

    /// Held for the whole invocation: at most one child per runner
    run_lock: Mutex<()>,
}

impl AdbCommandRunner {
    pub fn new(adb_binary: impl Into<String>, target_package: impl Into<String>) -> Self {
        Self {
            adb_binary: adb_binary.into(),
            target_package: target_package.into(),
            run_lock: Mutex::new(()),
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self::new(config.adb_binary.clone(), config.target_package.clone())
    }

    /// Build the argument vector for `url`
    ///
    /// The URL is one opaque argument of the device-side command line; that
    /// line is shell-quoted because `adb exec-out` hands it to the device
    /// shell. The host side never goes through a shell.
    pub fn build_argv(&self, url: &ValidatedUrl) -> Result<Vec<String>, LaunchError> {
        let device_command = shlex::try_join([
            "am",
            "start",
            "-a",
            VIEW_ACTION,
            "-d",
            url.as_str(),
            "-p",
            self.target_package.as_str(),
        ])
        .map_err(|e| LaunchError::StartFailed {
            detail: format!("cannot quote device command: {e}"),
        })?;

        Ok(vec![
            self.adb_binary.clone(),
            "exec-out".to_string(),
            device_command,
        ])
    }

    fn spawn(&self, argv: &[String]) -> Result<Child, LaunchError> {
        let (program, args) = argv.split_first().ok_or_else(|| LaunchError::StartFailed {
            detail: "empty argument vector".to_string(),
        })?;

        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => LaunchError::BinaryNotFound {
                    binary: self.adb_binary.clone(),
                },
                _ => LaunchError::StartFailed {
                    detail: e.to_string(),
                },
            })
    }
}

/// Render an argument vector as a JSON list with `", "` separators
pub fn render_argv(argv: &[String]) -> String {
    let items: Vec<String> = argv
        .iter()
        .map(|arg| serde_json::to_string(arg).unwrap_or_else(|_| format!("{arg:?}")))
        .collect();
    format!("[{}]", items.join(", "))
}

#[async_trait]
impl CommandRunner for AdbCommandRunner {
    async fn run(
        &self,
        url: &ValidatedUrl,
        notifier: &Notifier,
        cancel: &CancellationToken,
    ) -> Option<i32> {
        let _running = self.run_lock.lock().await;

        let argv = match self.build_argv(url) {
            Ok(argv) => argv,
            Err(e) => {
                notifier.error(e.to_string()).await;
                return None;
            }
        };

        notifier.log(format!("Command executed: {}", render_argv(&argv))).await;

        let mut child = match self.spawn(&argv) {
            Ok(child) => child,
            Err(e) => {
                process_warn!(ProcessId::current(), "❌ {}", e);
                notifier.error(e.to_string()).await;
                return None;
            }
        };
        process_info!(ProcessId::current(), "▶️ Started {} (pid {:?}) for {}", self.adb_binary, child.id(), url);

        let mut relays = Vec::with_capacity(2);
        if let Some(stdout) = child.stdout.take() {
            relays.push(spawn_relay(stdout, OutputChannel::Stdout, notifier.clone()));
        }
        if let Some(stderr) = child.stderr.take() {
            relays.push(spawn_relay(stderr, OutputChannel::Stderr, notifier.clone()));
        }

        let exit = tokio::select! {
            status = child.wait() => Some(status),
            _ = cancel.cancelled() => None,
        };

        let status = match exit {
            Some(status) => status,
            None => {
                process_info!(ProcessId::current(), "🛑 Session closed, killing {}", self.adb_binary);
                if let Err(e) = child.kill().await {
                    process_warn!(ProcessId::current(), "Failed to kill {}: {}", self.adb_binary, e);
                }
                // Nobody is listening any more; descendants may still hold the pipes
                for relay in relays {
                    relay.abort();
                }
                return None;
            }
        };

        // Every relayed line must be queued before `done`
        for relay in relays {
            match relay.await {
                Ok(lines) => {
                    process_debug!(ProcessId::current(), "Relay finished after {} lines", lines);
                }
                Err(e) => {
                    process_error!(ProcessId::current(), "Relay task failed: {}", e);
                }
            }
        }

        let returncode = match status {
            Ok(status) => status.code().unwrap_or(SIGNALLED_EXIT_CODE),
            Err(e) => {
                notifier.error(format!("Failed to wait for process: {e}")).await;
                return None;
            }
        };

        process_info!(ProcessId::current(), "✅ {} exited with code {}", self.adb_binary, returncode);
        notifier.done(returncode).await;
        Some(returncode)
    }
}
