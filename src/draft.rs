// ABOUTME: Draft persistence gateway with coalesced at-most-one-in-flight checkpoints
// ABOUTME: Rapid successive checkpoints collapse to the latest snapshot; last write wins
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Draft Persistence Gateway
//!
//! Serializes session snapshots to the external [`SessionStore`]. Checkpoints
//! are one-directional (local to remote): save acks are never used to update
//! local state, so in-memory state stays authoritative for display.
//!
//! Writes go through a queue of at-most-one-in-flight-plus-one-pending per
//! client: a checkpoint issued while another save is outstanding parks its
//! snapshot under its client id, and a newer snapshot for the *same* client
//! replaces an older parked one. When the outstanding save returns, each
//! waiting caller saves the latest parked snapshot for its own client; only
//! callers whose snapshot was superseded by a newer one for the same client
//! return without issuing a request. Snapshots for different clients never
//! coalesce with each other.

use crate::errors::{AppError, AppResult};
use crate::models::SessionDraft;
use crate::portal::SessionStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Gateway between the session and the durable draft store
pub struct DraftGateway {
    store: Arc<dyn SessionStore>,
    /// Held for the duration of one outstanding save request
    in_flight: Mutex<()>,
    /// Latest snapshot per client waiting for the in-flight save to finish
    pending: Mutex<HashMap<String, SessionDraft>>,
}

impl DraftGateway {
    /// Create a gateway over a draft store
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            in_flight: Mutex::new(()),
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Upsert the client's draft, coalescing rapid successive calls for the
    /// same client.
    ///
    /// Safe to call repeatedly with unchanged data. A call whose snapshot was
    /// superseded while waiting returns `Ok` without touching the store.
    pub async fn checkpoint(&self, client_id: &str, draft: SessionDraft) -> AppResult<()> {
        self.pending
            .lock()
            .await
            .insert(client_id.to_owned(), draft);

        let _guard = self.in_flight.lock().await;
        let Some(next) = self.pending.lock().await.remove(client_id) else {
            // a save that completed while we queued already covered this snapshot
            debug!(client_id, "checkpoint coalesced, nothing left to save");
            return Ok(());
        };

        self.store
            .save_draft(client_id, &next)
            .await
            .map_err(|e| {
                AppError::checkpoint_failed(format!("draft save failed for client {client_id}"))
                    .with_source(e)
            })
    }

    /// Fetch the client's draft; `None` when absent
    pub async fn load(&self, client_id: &str) -> AppResult<Option<SessionDraft>> {
        self.store.load_draft(client_id).await
    }

    /// Delete the client's draft; a no-op when none exists
    pub async fn discard(&self, client_id: &str) -> AppResult<()> {
        self.store.delete_draft(client_id).await
    }

    /// Wait out any in-flight save, flush every parked snapshot, and return a
    /// guard that keeps new saves from starting while held.
    ///
    /// Finalize runs under this guard so it is serialized after any pending
    /// checkpoint. A flush failure is non-fatal here: for the finalizing
    /// client the submission about to happen supersedes the draft anyway.
    pub async fn settle(&self) -> MutexGuard<'_, ()> {
        let guard = self.in_flight.lock().await;
        let parked = std::mem::take(&mut *self.pending.lock().await);
        for (client_id, draft) in parked {
            if let Err(error) = self.store.save_draft(&client_id, &draft).await {
                warn!(
                    client_id = %client_id,
                    %error,
                    "pending checkpoint flush failed while settling"
                );
            }
        }
        guard
    }
}
