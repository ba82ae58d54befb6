// ABOUTME: In-memory portal backend implementing all collaborator contracts
// ABOUTME: Supports failure injection, call counting, and draft-age expiry for tests
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # In-Memory Portal Backend
//!
//! A complete portal backend held in process memory. Used by the test suite
//! and for offline/demo runs. Mirrors the real backend's behavior where it
//! matters to the engine: one draft per client with last-write-wins upserts,
//! idempotent draft deletion, and stale-draft expiry on load.

use crate::constants::drafts::MAX_DRAFT_AGE_HOURS;
use crate::errors::{AppError, AppResult};
use crate::models::{
    ActiveProgram, DraftEnvelope, LogAck, SessionDraft, WorkoutLogRecord,
};
use crate::portal::{ProgramProvider, SessionStore, WorkoutHistory};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

const SERVICE: &str = "in-memory portal";

/// In-memory portal backend
#[derive(Debug, Default)]
pub struct InMemoryPortal {
    programs: RwLock<HashMap<String, ActiveProgram>>,
    drafts: RwLock<HashMap<String, DraftEnvelope>>,
    logs: RwLock<Vec<(String, WorkoutLogRecord)>>,
    save_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    fail_saves: AtomicBool,
    fail_deletes: AtomicBool,
    fail_submissions: AtomicBool,
    /// Artificial latency applied to draft saves, for in-flight coalescing tests
    save_delay: RwLock<Option<Duration>>,
}

impl InMemoryPortal {
    /// Create an empty backend with no programs assigned
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign an active program to a client
    pub async fn assign_program(&self, client_id: &str, program: ActiveProgram) {
        self.programs
            .write()
            .await
            .insert(client_id.to_owned(), program);
    }

    /// Seed a draft directly, bypassing the save path
    pub async fn seed_draft(&self, envelope: DraftEnvelope) {
        self.drafts
            .write()
            .await
            .insert(envelope.client_id.clone(), envelope);
    }

    /// Whether a draft currently exists for the client
    pub async fn has_draft(&self, client_id: &str) -> bool {
        self.drafts.read().await.contains_key(client_id)
    }

    /// All submitted workout logs, in submission order
    pub async fn submitted_logs(&self) -> Vec<(String, WorkoutLogRecord)> {
        self.logs.read().await.clone()
    }

    /// Number of `save_draft` calls that reached the backend
    #[must_use]
    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Number of `delete_draft` calls that reached the backend
    #[must_use]
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    /// Make subsequent draft saves fail
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent draft deletes fail
    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    /// Make subsequent log submissions fail
    pub fn fail_submissions(&self, fail: bool) {
        self.fail_submissions.store(fail, Ordering::SeqCst);
    }

    /// Apply artificial latency to draft saves
    pub async fn set_save_delay(&self, delay: Option<Duration>) {
        *self.save_delay.write().await = delay;
    }
}

#[async_trait]
impl ProgramProvider for InMemoryPortal {
    async fn active_program(&self, client_id: &str) -> AppResult<Option<ActiveProgram>> {
        let programs = self.programs.read().await;
        Ok(programs
            .get(client_id)
            .filter(|program| !program.template.is_placeholder())
            .cloned())
    }
}

#[async_trait]
impl SessionStore for InMemoryPortal {
    async fn save_draft(&self, client_id: &str, draft: &SessionDraft) -> AppResult<()> {
        if let Some(delay) = *self.save_delay.read().await {
            tokio::time::sleep(delay).await;
        }
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::external_service(SERVICE, "draft save rejected"));
        }
        self.drafts
            .write()
            .await
            .insert(client_id.to_owned(), DraftEnvelope::now(draft.clone()));
        Ok(())
    }

    async fn load_draft(&self, client_id: &str) -> AppResult<Option<SessionDraft>> {
        // Stale drafts are dropped on read, same as the backend's 24h expiry
        let mut drafts = self.drafts.write().await;
        match drafts.get(client_id) {
            Some(envelope) if envelope.is_stale(MAX_DRAFT_AGE_HOURS) => {
                drafts.remove(client_id);
                Ok(None)
            }
            Some(envelope) => Ok(Some(envelope.workout_data.clone())),
            None => Ok(None),
        }
    }

    async fn delete_draft(&self, client_id: &str) -> AppResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(AppError::external_service(SERVICE, "draft delete rejected"));
        }
        self.drafts.write().await.remove(client_id);
        Ok(())
    }
}

#[async_trait]
impl WorkoutHistory for InMemoryPortal {
    async fn submit_log(&self, client_id: &str, record: &WorkoutLogRecord) -> AppResult<LogAck> {
        if self.fail_submissions.load(Ordering::SeqCst) {
            return Err(AppError::external_service(SERVICE, "log submission rejected"));
        }
        self.logs
            .write()
            .await
            .push((client_id.to_owned(), record.clone()));
        Ok(LogAck {
            log_id: Uuid::new_v4().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WorkoutDay, WorkoutTemplate};
    use chrono::{Duration as ChronoDuration, Utc};

    fn program(template_id: &str) -> ActiveProgram {
        ActiveProgram {
            assignment_id: "a1".into(),
            current_day_index: 0,
            template: WorkoutTemplate {
                id: template_id.into(),
                template_name: "Strength".into(),
                days: vec![WorkoutDay {
                    name: "Day 1".into(),
                    groups: Vec::new(),
                }],
            },
        }
    }

    #[tokio::test]
    async fn test_placeholder_program_reads_as_none() {
        let portal = InMemoryPortal::new();
        portal.assign_program("c1", program("default-empty")).await;
        assert!(portal.active_program("c1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_draft_last_write_wins() {
        let portal = InMemoryPortal::new();
        let mut draft = SessionDraft {
            client_id: "c1".into(),
            ..SessionDraft::default()
        };
        portal.save_draft("c1", &draft).await.unwrap();
        draft.elapsed_seconds = 90;
        portal.save_draft("c1", &draft).await.unwrap();
        let loaded = portal.load_draft("c1").await.unwrap().unwrap();
        assert_eq!(loaded.elapsed_seconds, 90);
        assert_eq!(portal.save_calls(), 2);
    }

    #[tokio::test]
    async fn test_stale_draft_expires_on_load() {
        let portal = InMemoryPortal::new();
        let mut envelope = DraftEnvelope::now(SessionDraft {
            client_id: "c1".into(),
            ..SessionDraft::default()
        });
        envelope.saved_at = Utc::now() - ChronoDuration::hours(MAX_DRAFT_AGE_HOURS + 1);
        portal.seed_draft(envelope).await;
        assert!(portal.load_draft("c1").await.unwrap().is_none());
        assert!(!portal.has_draft("c1").await);
    }

    #[tokio::test]
    async fn test_delete_absent_draft_is_noop() {
        let portal = InMemoryPortal::new();
        portal.delete_draft("nobody").await.unwrap();
        assert_eq!(portal.delete_calls(), 1);
    }
}
