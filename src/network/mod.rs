// file: src/network/mod.rs
// version: 1.2.0
// guid: 7d9f1b3c-5e6a-4b82-d4f6-8a0c2e4a6b8d

//! Network operations module

pub mod download;
pub mod release;

pub use download::NetworkDownloader;
pub use release::ReleaseLocator;
