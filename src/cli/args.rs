// file: src/cli/args.rs
// version: 1.1.0
// guid: 0e2a4c6d-8f9b-425f-eb8d-1b3d5e7b9c14

//! Command line argument definitions

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "archie-pi-setup")]
#[command(about = "Provision a Raspberry Pi as an ARCHIE Pi offline education hotspot")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the one-shot provisioning sequence on a freshly imaged OS
    Provision {
        #[arg(long, help = "Wi-Fi regulatory country code (e.g. US)")]
        country: String,

        #[arg(long, default_value = "ARCHIE-Pi", help = "Access point SSID")]
        ssid: String,

        #[arg(long, help = "Directory holding the web front end (default: ./www)")]
        www: Option<String>,
    },

    /// Harden a provisioned machine against SD card wear (read-only mounts)
    Harden,

    /// Check that the required system tools are present
    CheckPrereqs,
}
