//! Subprocess seam for the executor

use async_trait::async_trait;
use std::process::Output;
use tokio::process::Command;

/// Runs one external process to completion with captured output.
///
/// The executor reaches the appliance shell exclusively through this trait so
/// tests can substitute a scripted stand-in for the real binary.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<Output>;
}

/// Spawns real processes, inheriting the parent environment.
pub struct SystemProcessRunner;

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<Output> {
        Command::new(program).args(args).output().await
    }
}
