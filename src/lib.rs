// ABOUTME: Library entry point for the workout session engine
// ABOUTME: Tracks in-progress workouts, persists resumable drafts, finalizes history records
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![deny(unsafe_code)]

//! # Workout Session Engine
//!
//! Core logic behind the trainer/client portal's workout surfaces: the state
//! machine that tracks an in-progress workout (elapsed time, per-set
//! performance entries, free-text notes), persists a resumable draft of the
//! session, and finalizes it into a permanent workout-history record.
//!
//! ## Architecture
//!
//! Leaf components compose upward:
//! - **Clock**: drift-free elapsed-time tracking across pause/resume
//! - **Set Ledger**: append-only per-exercise set records
//! - **Notes Store**: per-exercise annotations
//! - **Session State Machine**: `Idle -> Active -> Finalized` lifecycle
//! - **Draft Gateway**: coalesced checkpoints to the external session store
//! - **Completion Reporter**: finalize-and-submit with draft retention on failure
//!
//! The portal backend (program assignments, draft storage, workout history)
//! is consumed through the trait seams in [`portal`]; [`portal::http`] talks
//! to the real REST backend and [`portal::memory`] backs tests.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workout_session_engine::config::PortalConfig;
//! use workout_session_engine::errors::AppResult;
//! use workout_session_engine::models::SetField;
//! use workout_session_engine::portal::http::PortalClient;
//! use workout_session_engine::session::WorkoutSession;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = PortalConfig::from_env()?;
//!     let client = Arc::new(PortalClient::new(config.client_config())?);
//!     let mut session = WorkoutSession::with_backend(client);
//!
//!     session.load_session("c1").await?;
//!     session.start_clock()?;
//!     session.append_set("ex1")?;
//!     session.update_set_field("ex1", 0, SetField::Reps, 10)?;
//!     session.checkpoint().await?;
//!     session.complete().await?;
//!     Ok(())
//! }
//! ```

/// Workout clock with drift-free pause/resume
pub mod clock;

/// Configuration management from environment variables
pub mod config;

/// Engine-wide constants
pub mod constants;

/// Draft persistence gateway with coalesced checkpoints
pub mod draft;

/// Unified error handling with standard error codes
pub mod errors;

/// Append-only per-exercise set ledger
pub mod ledger;

/// Structured logging setup
pub mod logging;

/// Common data models for templates, drafts, and log records
pub mod models;

/// Per-exercise free-text notes
pub mod notes;

/// Portal collaborator contracts and backends
pub mod portal;

/// Completion reporter for finalized workout logs
pub mod reporter;

/// Workout session state machine
pub mod session;
