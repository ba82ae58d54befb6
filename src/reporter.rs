// ABOUTME: Completion reporter submitting finalized workout logs to history
// ABOUTME: Discards the draft only after a successful submission, never on failure
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Completion Reporter
//!
//! Turns a session snapshot into the permanent workout-history record. The
//! one hard invariant lives here: a failed submission must never discard the
//! draft, so a network failure during finalize can never lose logged sets.
//! The converse holds too: once the log is durable the finalize succeeds,
//! even if the draft cleanup afterwards fails, so a retry can never create a
//! duplicate history record.

use crate::draft::DraftGateway;
use crate::errors::{AppError, AppResult};
use crate::models::{LogAck, WorkoutLogRecord};
use crate::portal::WorkoutHistory;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a successful finalize
#[derive(Debug, Clone)]
pub struct FinalizeOutcome {
    /// Acknowledgement for the created history record
    pub ack: LogAck,
    /// False when the log was recorded but the draft delete failed; the
    /// leftover draft is superseded by the log and expires on its own
    pub draft_cleared: bool,
}

/// Submits finalized logs and clears the corresponding draft
pub struct CompletionReporter {
    history: Arc<dyn WorkoutHistory>,
    drafts: Arc<DraftGateway>,
}

impl CompletionReporter {
    /// Create a reporter over a history collaborator and the draft gateway
    #[must_use]
    pub fn new(history: Arc<dyn WorkoutHistory>, drafts: Arc<DraftGateway>) -> Self {
        Self { history, drafts }
    }

    /// Submit the immutable log record for a client and clear the draft.
    ///
    /// Serialized after any checkpoint still in flight for the session. On
    /// submission failure the draft is deliberately retained and the error
    /// surfaces as `CompletionFailed` so the caller can offer a retry. Once
    /// the submission succeeds the finalize is a success: a failed draft
    /// cleanup is reported through [`FinalizeOutcome::draft_cleared`] instead
    /// of an error, so a retry can never submit the same workout twice.
    pub async fn finalize(
        &self,
        client_id: &str,
        record: WorkoutLogRecord,
    ) -> AppResult<FinalizeOutcome> {
        let _in_flight = self.drafts.settle().await;

        let ack = self
            .history
            .submit_log(client_id, &record)
            .await
            .map_err(|e| {
                warn!(client_id, "workout log submission failed, draft retained");
                AppError::completion_failed(format!(
                    "log submission failed for client {client_id}"
                ))
                .with_source(e)
            })?;

        // The log is durable; the draft has served its purpose
        let draft_cleared = match self.drafts.discard(client_id).await {
            Ok(()) => true,
            Err(error) => {
                warn!(
                    client_id,
                    log_id = %ack.log_id,
                    %error,
                    "workout logged but draft cleanup failed"
                );
                false
            }
        };

        info!(client_id, log_id = %ack.log_id, draft_cleared, "workout finalized");
        Ok(FinalizeOutcome { ack, draft_cleared })
    }
}
