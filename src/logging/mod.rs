// file: src/logging/mod.rs
// version: 1.0.0
// guid: 1c3e5a7b-9d0f-4b2c-8e4a-6f8b0d2c4e6a

//! Logging infrastructure

pub mod logger;
