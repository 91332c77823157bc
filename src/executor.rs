use crate::storage::{Execution, SPAWN_ERROR_EXIT_CODE};
use chrono::Local;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Runs the watched command through a shell and captures its result.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    command: String,
    shell: String,
}

impl CommandExecutor {
    pub fn new(command: &str, shell: &str) -> Self {
        Self {
            command: command.to_string(),
            shell: shell.to_string(),
        }
    }

    /// Runs the command once. Never fails: a spawn error or cancellation is
    /// reported inside the returned `Execution` with `SPAWN_ERROR_EXIT_CODE`.
    pub async fn execute(&self, cancel: CancellationToken) -> Execution {
        let start_time = Instant::now();
        debug!(command = %self.command, shell = %self.shell, "executing");

        let child = Command::new(&self.shell)
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(err) => {
                warn!(error = %err, "failed to spawn command");
                return Self::failure(format!("failed to run {}: {err}", self.shell), start_time);
            }
        };

        // Dropping the output future kills the child.
        let output = tokio::select! {
            output = child.wait_with_output() => output,
            _ = cancel.cancelled() => {
                debug!("execution cancelled");
                return Self::failure("cancelled".to_string(), start_time);
            }
        };

        let output = match output {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, "failed to collect command output");
                return Self::failure(format!("failed to wait for command: {err}"), start_time);
            }
        };

        let (exit_code, error) = match output.status.code() {
            Some(code) => (code, None),
            None => (SPAWN_ERROR_EXIT_CODE, Some(format!("command terminated: {}", output.status))),
        };

        let execution = Execution {
            timestamp: Local::now(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code,
            duration_ms: start_time.elapsed().as_millis() as u64,
            error,
        };
        debug!(exit_code, duration_ms = execution.duration_ms, "execution finished");
        execution
    }

    fn failure(error: String, start_time: Instant) -> Execution {
        Execution {
            timestamp: Local::now(),
            stdout: String::new(),
            stderr: String::new(),
            exit_code: SPAWN_ERROR_EXIT_CODE,
            duration_ms: start_time.elapsed().as_millis() as u64,
            error: Some(error),
        }
    }
}
