// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes, and runtime configuration parsing
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! Environment-based configuration management

use crate::constants::{defaults, env_vars};
use crate::portal::http::PortalClientConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "testing" | "test" => Environment::Testing,
            _ => Environment::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Engine configuration assembled from environment variables
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL of the portal REST backend
    pub base_url: String,
    /// Per-request timeout for portal calls, in seconds
    pub timeout_secs: u64,
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::PORTAL_BASE_URL.to_owned(),
            timeout_secs: defaults::PORTAL_TIMEOUT_SECS,
            log_level: LogLevel::default(),
            environment: Environment::default(),
        }
    }
}

impl PortalConfig {
    /// Load configuration from environment variables, falling back to local
    /// development defaults
    ///
    /// # Errors
    ///
    /// Returns an error when a set variable fails to parse
    pub fn from_env() -> Result<Self> {
        let base_url = env::var(env_vars::PORTAL_BASE_URL)
            .unwrap_or_else(|_| defaults::PORTAL_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let timeout_secs = match env::var(env_vars::PORTAL_TIMEOUT_SECS) {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("invalid {}: {raw}", env_vars::PORTAL_TIMEOUT_SECS))?,
            Err(_) => defaults::PORTAL_TIMEOUT_SECS,
        };

        let log_level = env::var(env_vars::LOG_LEVEL)
            .map(|raw| LogLevel::from_str_or_default(&raw))
            .unwrap_or_default();

        let environment = env::var(env_vars::ENVIRONMENT)
            .map(|raw| Environment::from_str_or_default(&raw))
            .unwrap_or_default();

        Ok(Self {
            base_url,
            timeout_secs,
            log_level,
            environment,
        })
    }

    /// Derive the portal HTTP client configuration
    #[must_use]
    pub fn client_config(&self) -> PortalClientConfig {
        PortalClientConfig {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}
