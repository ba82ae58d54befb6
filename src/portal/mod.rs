// ABOUTME: Collaborator contracts for the portal backend consumed by the session engine
// ABOUTME: Program assignment, draft storage, and workout history as async trait seams
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Portal Collaborators
//!
//! The engine never owns client records, program assignments, or workout
//! history; it consumes them through these trait seams. [`http::PortalClient`]
//! talks to the portal REST backend; [`memory::InMemoryPortal`] backs tests
//! and offline use.

use crate::errors::AppResult;
use crate::models::{ActiveProgram, LogAck, SessionDraft, WorkoutLogRecord};
use async_trait::async_trait;

/// HTTP client for the portal REST backend
pub mod http;

/// In-memory portal backend for tests and offline use
pub mod memory;

/// Source of the client's assigned active program
#[async_trait]
pub trait ProgramProvider: Send + Sync {
    /// Fetch the active program for a client.
    ///
    /// `None` means no real program is assigned; backends normalize empty
    /// placeholder templates to `None` so callers can tell "nothing to run"
    /// apart from a loadable session.
    async fn active_program(&self, client_id: &str) -> AppResult<Option<ActiveProgram>>;
}

/// Durable storage for resumable session drafts, one per client
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Upsert the draft for a client; last write wins
    async fn save_draft(&self, client_id: &str, draft: &SessionDraft) -> AppResult<()>;

    /// Fetch the draft for a client; absence is not an error
    async fn load_draft(&self, client_id: &str) -> AppResult<Option<SessionDraft>>;

    /// Delete the draft for a client; a no-op when none exists
    async fn delete_draft(&self, client_id: &str) -> AppResult<()>;
}

/// Sink for finalized workout log records
#[async_trait]
pub trait WorkoutHistory: Send + Sync {
    /// Submit an immutable workout log and receive the created-record ack
    async fn submit_log(&self, client_id: &str, record: &WorkoutLogRecord) -> AppResult<LogAck>;
}
