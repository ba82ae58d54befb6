// ABOUTME: Engine-wide constants organized by domain
// ABOUTME: Sentinel identifiers, environment variable names, and default values
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Engine constants
//!
//! Constants are grouped into small domain modules rather than scattered
//! across call sites.

/// Template and program sentinels
pub mod templates {
    /// Template id the backend uses as a "nothing assigned" placeholder.
    /// A program carrying this template must not start a session.
    pub const DEFAULT_EMPTY_TEMPLATE_ID: &str = "default-empty";
}

/// Draft persistence defaults
pub mod drafts {
    /// Drafts older than this are treated as absent on load (stale-session expiry)
    pub const MAX_DRAFT_AGE_HOURS: i64 = 24;
}

/// Environment variable names for configuration
pub mod env_vars {
    /// Base URL of the portal REST backend
    pub const PORTAL_BASE_URL: &str = "PORTAL_BASE_URL";
    /// Request timeout for portal calls, in seconds
    pub const PORTAL_TIMEOUT_SECS: &str = "PORTAL_TIMEOUT_SECS";
    /// Log level (trace, debug, info, warn, error)
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    /// Log output format (json, pretty, compact)
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Default configuration values
pub mod defaults {
    /// Default portal backend base URL for local development
    pub const PORTAL_BASE_URL: &str = "http://localhost:5000/api";
    /// Default portal request timeout in seconds
    pub const PORTAL_TIMEOUT_SECS: u64 = 30;
}

/// Service identification for structured logging
pub mod service_names {
    /// Service name reported in log output
    pub const SERVICE_NAME: &str = "workout-session-engine";
}
