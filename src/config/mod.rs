// ABOUTME: Configuration management for the session engine
// ABOUTME: Environment-only configuration, no config files
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Configuration management

/// Environment-based configuration parsing
pub mod environment;

pub use environment::{Environment, LogLevel, PortalConfig};
