// file: src/provision/cleanup.rs
// version: 1.0.0
// guid: 8c0e2a4b-6d7f-403d-cf6b-9f1b3c5f7a92

//! Stage 6: package cleanup

use tracing::info;

use crate::config::SetupContext;
use crate::runner::CommandRunner;
use crate::Result;

/// Drop packages nothing depends on anymore and clear the package cache
pub async fn run(_ctx: &SetupContext, runner: &CommandRunner) -> Result<()> {
    info!("Cleaning up...");
    runner
        .run_checked("apt -y autoremove", "Error: unable to autoremove packages")
        .await?;
    runner
        .run_checked("apt clean", "Error: unable to clear the package cache")
        .await?;
    Ok(())
}
