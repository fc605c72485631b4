// file: src/cli/commands.rs
// version: 1.2.0
// guid: 1f3b5d7e-9a0c-436a-fb9e-2c4e6f8c0d25

//! Command implementations for the CLI

use tracing::{info, warn};

use crate::config::{HotspotParams, SetupContext};
use crate::provision::Provisioner;
use crate::runner::CommandRunner;
use crate::utils::system::SystemUtils;
use crate::{Result, SetupError};

/// Run the full provisioning sequence
pub async fn provision_command(country: &str, ssid: &str, www: Option<String>) -> Result<()> {
    warn_if_not_root();

    let ctx = SetupContext::detect(www)?;
    info!("Target architecture: {}", ctx.arch.as_str());
    if !ctx.web_source.is_dir() {
        return Err(SetupError::config(format!(
            "web front end directory {} not found; run from the ARCHIE Pi checkout or pass --www",
            ctx.web_source.display()
        )));
    }

    let params = HotspotParams::new(country, ssid);
    let provisioner = Provisioner::new(ctx, CommandRunner::new());
    provisioner.provision(&params).await
}

/// Apply the storage-durability hardening as a follow-up pass
pub async fn harden_command() -> Result<()> {
    warn_if_not_root();

    let ctx = SetupContext::detect(None)?;
    let provisioner = Provisioner::new(ctx, CommandRunner::new());
    provisioner.harden().await
}

/// Check system prerequisites
pub async fn check_prereqs_command() -> Result<()> {
    let missing = SystemUtils::check_prerequisites();

    if missing.is_empty() {
        info!("All prerequisites satisfied");
        Ok(())
    } else {
        Err(SetupError::system(format!(
            "missing required tools: {}",
            missing.join(", ")
        )))
    }
}

fn warn_if_not_root() {
    // Nearly every step mutates system state; without root the first apt
    // call will fail anyway, but say so up front.
    if !SystemUtils::is_root() {
        warn!("not running as root; provisioning steps will likely fail");
    }
}
