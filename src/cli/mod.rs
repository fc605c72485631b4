// file: src/cli/mod.rs
// version: 1.0.0
// guid: 9d1f3b5c-7e8a-414e-da7c-0a2c4d6a8b03

//! Command line interface for the ARCHIE Pi provisioner

pub mod args;
pub mod commands;

pub use args::Cli;
pub use commands::*;
