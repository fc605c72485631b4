// file: src/utils/mod.rs
// version: 1.1.0
// guid: 0a2c4e6f-8b9d-4eb5-a7c9-1d3f5a7d9e1a

//! Utility modules for system operations

pub mod system;

pub use system::SystemUtils;
