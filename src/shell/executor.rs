//! Mutual-exclusion gate and dispatch for appliance shell commands

use crate::shell::error::{Result, ShellError};
use crate::shell::runner::{ProcessRunner, SystemProcessRunner};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Serialized executor for the appliance configuration shell.
///
/// The shell tolerates only one writer at a time, so every command funnels
/// through a single-permit gate owned by this instance. Clones share the
/// gate: everything that talks to one appliance must hold clones of one
/// executor. Waiters are admitted one at a time with no ordering promise
/// beyond mutual exclusion.
///
/// There is no timeout at this layer; a hung shell process hangs its caller.
#[derive(Clone)]
pub struct ShellExecutor {
    runner: Arc<dyn ProcessRunner>,
    gate: Arc<Semaphore>,
    waiting: Arc<AtomicUsize>,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::with_runner(Arc::new(SystemProcessRunner))
    }

    pub fn with_runner(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            runner,
            gate: Arc::new(Semaphore::new(1)),
            waiting: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Runs one command line to completion and returns its captured stdout.
    ///
    /// The command is split quote-aware into program plus arguments, so a
    /// quoted segment like `-c 'cd /; list ...'` stays one argument. Any
    /// stderr output fails the command with the stderr text; a non-zero exit
    /// with silent stderr fails it with the stdout text. Failures are
    /// single-attempt, never retried here.
    pub async fn execute(&self, command: &str) -> Result<String> {
        let words = shell_words::split(command)?;
        let (program, args) = words.split_first().ok_or_else(|| ShellError::InvalidCommandLine {
            reason: "empty command".to_string(),
        })?;

        let queued = self.waiting.fetch_add(1, Ordering::SeqCst);
        if queued > 0 {
            debug!("waiting for appliance shell gate behind {} command(s)", queued);
        }
        let _permit = self
            .gate
            .acquire()
            .await
            .expect("executor gate is never closed");
        self.waiting.fetch_sub(1, Ordering::SeqCst);

        debug!("executing appliance command: {}", program);
        let output = self.runner.run(program, args).await?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stderr.is_empty() {
            warn!("appliance shell wrote to stderr: {}", stderr.trim_end());
            return Err(ShellError::CommandFailed { detail: stderr });
        }
        if !output.status.success() {
            warn!(
                "appliance shell exited with {}",
                output.status.code().unwrap_or(-1)
            );
            return Err(ShellError::CommandFailed { detail: stdout });
        }

        Ok(stdout)
    }
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new()
    }
}
