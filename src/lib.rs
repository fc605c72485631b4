// file: src/lib.rs
// version: 1.0.0
// guid: 9b2d4e6f-8a0c-4e1d-b3f5-7a9c1e3d5f70

//! # ARCHIE Pi Setup
//!
//! Provisions a Raspberry Pi running Raspberry Pi OS Lite as a standalone,
//! offline Wi-Fi access point ("ARCHIE Pi") serving local educational web
//! content: hostapd + dnsmasq hotspot, nginx + PHP web server, a kiwix
//! content-archive server, and SD-card durability hardening.
//!
//! The tool is a one-shot, fail-fast provisioning sequence. It is not
//! idempotent: a failed run leaves the machine partially configured and a
//! retry requires a fresh OS image.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod network;
pub mod provision;
pub mod runner;
pub mod textedit;
pub mod utils;

pub use error::{Result, SetupError};

/// Version information for the utility
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
