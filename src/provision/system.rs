// file: src/provision/system.rs
// version: 1.1.0
// guid: 3d5f7b9c-1e2a-4be8-da1c-4a6c8d0a2b4d

//! Stage 1: OS update and baseline tooling

use tracing::info;

use crate::config::SetupContext;
use crate::runner::CommandRunner;
use crate::Result;

/// Refresh and upgrade the OS, install baseline tools, sync the clock once
///
/// The clock sync matters because a freshly imaged Pi has no RTC; package
/// signature checks fail with a wildly wrong clock.
pub async fn update(_ctx: &SetupContext, runner: &CommandRunner) -> Result<()> {
    info!("Updating Raspberry Pi OS...");
    runner
        .run_checked("apt update -y", "Error: unable to update the package index")
        .await?;
    runner
        .run_checked(
            "apt dist-upgrade -y",
            "Error: unable to dist-upgrade Raspberry Pi OS",
        )
        .await?;

    info!("Installing baseline tools...");
    runner
        .run_checked(
            "apt install -y lynx python3-pip ntpdate",
            "Error: unable to install baseline tools",
        )
        .await?;
    runner
        .run_checked(
            "ntpdate -u pool.ntp.org",
            "Error: unable to synchronize the clock",
        )
        .await?;

    Ok(())
}
