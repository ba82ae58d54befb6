// ABOUTME: Unified error handling for the workout session engine
// ABOUTME: Defines standard error codes, the AppError type, and HTTP status mapping
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Unified Error Handling
//!
//! Centralized error types for the session engine. Every failure a collaborator
//! or component can surface is classified by an [`ErrorCode`] so callers can
//! distinguish the load-bearing cases: a failed finalize (`CompletionFailed`)
//! retains the draft, a failed checkpoint (`CheckpointFailed`) is non-fatal,
//! and a failed session load (`LoadFailed`) creates no partial state.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Template or draft fetch failed; the session cannot start
    #[serde(rename = "LOAD_FAILED")]
    LoadFailed,
    /// Draft save failed; the session continues, progress may be unsaved
    #[serde(rename = "CHECKPOINT_FAILED")]
    CheckpointFailed,
    /// Log submission failed; the draft is retained and the user must retry
    #[serde(rename = "COMPLETION_FAILED")]
    CompletionFailed,
    /// Operation not valid in the current session state
    #[serde(rename = "INVALID_TRANSITION")]
    InvalidTransition,
    /// The provided input is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,
    /// A portal collaborator returned an error or was unreachable
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError,
    /// Payload serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError,
    /// Configuration is missing or invalid
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::InvalidInput => 400,
            ErrorCode::InvalidTransition => 409,
            ErrorCode::LoadFailed
            | ErrorCode::CheckpointFailed
            | ErrorCode::CompletionFailed
            | ErrorCode::ExternalServiceError => 502,
            ErrorCode::SerializationError | ErrorCode::ConfigError => 500,
        }
    }

    /// Get a user-facing description of this error
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::LoadFailed => "Failed to load workout data",
            ErrorCode::CheckpointFailed => "Failed to save workout progress",
            ErrorCode::CompletionFailed => "Failed to complete the workout",
            ErrorCode::InvalidTransition => "Operation not valid for the current session state",
            ErrorCode::InvalidInput => "The provided input is invalid",
            ErrorCode::ExternalServiceError => "A portal service encountered an error",
            ErrorCode::SerializationError => "Data serialization/deserialization failed",
            ErrorCode::ConfigError => "Configuration error encountered",
        }
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Session load failure (no partial state is created)
    pub fn load_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::LoadFailed, message)
    }

    /// Draft checkpoint failure (non-fatal)
    pub fn checkpoint_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CheckpointFailed, message)
    }

    /// Finalize submission failure (draft retained)
    pub fn completion_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CompletionFailed, message)
    }

    /// Invalid session state for the requested operation
    pub fn invalid_transition(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidTransition, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// External portal service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Conversion from `anyhow::Error` for configuration loading paths
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::new(ErrorCode::ConfigError, error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        AppError::serialization(error.to_string()).with_source(error)
    }
}
