// file: src/main.rs
// version: 1.1.0
// guid: 2a4c6e8f-0b1d-447b-ac0f-3d5f7a9d1e36

//! ARCHIE Pi Setup - Main entry point

use archie_pi_setup::{
    cli::{args::Commands, commands::*, Cli},
    logging::logger,
    Result,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The first failing step anywhere in the sequence surfaces here; one
    // message, non-zero exit, nothing resumable.
    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    logger::init_logger(cli.verbose, cli.quiet)?;

    match cli.command {
        Commands::Provision { country, ssid, www } => {
            provision_command(&country, &ssid, www).await
        }
        Commands::Harden => harden_command().await,
        Commands::CheckPrereqs => check_prereqs_command().await,
    }
}
