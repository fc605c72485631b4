// file: src/runner.rs
// version: 1.2.0
// guid: 5b7d9f1a-3c4e-4f60-b2d4-6e8a0c2e4f6b

//! External command execution
//!
//! Every system mutation in the provisioning sequence goes through
//! [`CommandRunner`]. Command lines are split on whitespace (no shell, no
//! quoting, no globbing) and the child inherits stdout/stderr so package
//! manager and service output streams straight to the operator. There is no
//! timeout and no retry: a stalled mirror stalls the run.

use tokio::process::Command;
use tracing::debug;

use crate::{Result, SetupError};

#[cfg(test)]
#[derive(Default)]
struct MockState {
    executed: Vec<String>,
    fail_on: Option<String>,
}

/// Runs whitespace-delimited command lines as child processes
pub struct CommandRunner {
    #[cfg(test)]
    mock: Option<std::sync::Mutex<MockState>>,
}

impl CommandRunner {
    /// Create a runner that executes real commands
    pub fn new() -> Self {
        #[cfg(test)]
        {
            Self { mock: None }
        }

        #[cfg(not(test))]
        {
            Self {}
        }
    }

    /// Create a runner that records command lines instead of executing them
    #[cfg(test)]
    pub fn mock() -> Self {
        Self {
            mock: Some(std::sync::Mutex::new(MockState::default())),
        }
    }

    /// Like [`CommandRunner::mock`], but any command line containing
    /// `pattern` reports a non-zero exit
    #[cfg(test)]
    pub fn mock_failing_on(pattern: &str) -> Self {
        Self {
            mock: Some(std::sync::Mutex::new(MockState {
                executed: Vec::new(),
                fail_on: Some(pattern.to_string()),
            })),
        }
    }

    /// Command lines seen by a mock runner, in execution order
    #[cfg(test)]
    pub fn executed(&self) -> Vec<String> {
        self.mock
            .as_ref()
            .map(|m| m.lock().unwrap().executed.clone())
            .unwrap_or_default()
    }

    /// Execute a command line and report whether it exited zero
    ///
    /// `Err` means the child could not be spawned at all; `Ok(false)` means
    /// it ran and failed.
    pub async fn run(&self, command_line: &str) -> Result<bool> {
        #[cfg(test)]
        if let Some(mock) = &self.mock {
            let mut state = mock.lock().unwrap();
            state.executed.push(command_line.to_string());
            let fails = state
                .fail_on
                .as_deref()
                .is_some_and(|pattern| command_line.contains(pattern));
            return Ok(!fails);
        }

        debug!("-> {}", command_line);

        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| SetupError::system("empty command line"))?;

        let status = Command::new(program).args(parts).status().await?;
        Ok(status.success())
    }

    /// Execute a command line, turning a non-zero exit into a fatal step
    /// error carrying `message`
    pub async fn run_checked(&self, command_line: &str, message: &str) -> Result<()> {
        if self.run(command_line).await? {
            Ok(())
        } else {
            Err(SetupError::step(message, command_line))
        }
    }
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_reports_exit_status() {
        let runner = CommandRunner::new();
        assert!(runner.run("true").await.unwrap());
        assert!(!runner.run("false").await.unwrap());
    }

    #[tokio::test]
    async fn test_run_spawn_failure_is_an_error() {
        let runner = CommandRunner::new();
        let result = runner.run("nonexistent-command-12345 --flag").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_run_checked_carries_the_step_message() {
        let runner = CommandRunner::new();
        let err = runner
            .run_checked("false", "Error: unable to frobnicate")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Error: unable to frobnicate"));
    }

    #[tokio::test]
    async fn test_mock_records_in_order() {
        let runner = CommandRunner::mock();
        runner.run("apt update -y").await.unwrap();
        runner.run("systemctl stop hostapd").await.unwrap();
        assert_eq!(
            runner.executed(),
            vec!["apt update -y", "systemctl stop hostapd"]
        );
    }

    #[tokio::test]
    async fn test_mock_fail_pattern() {
        let runner = CommandRunner::mock_failing_on("dist-upgrade");
        assert!(runner.run("apt update -y").await.unwrap());
        assert!(!runner.run("apt dist-upgrade -y").await.unwrap());
    }
}
