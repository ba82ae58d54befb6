// ABOUTME: Integration tests for draft persistence: coalescing, expiry, and finalize ordering
// ABOUTME: Exercises the gateway and reporter against the in-memory portal backend
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

mod common;

use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use workout_session_engine::draft::DraftGateway;
use workout_session_engine::models::{DraftEnvelope, SessionDraft, WorkoutLogRecord};
use workout_session_engine::portal::memory::InMemoryPortal;
use workout_session_engine::portal::SessionStore;
use workout_session_engine::reporter::CompletionReporter;
use workout_session_engine::session::{LoadOutcome, WorkoutSession};

fn draft(client_id: &str, elapsed: u64) -> SessionDraft {
    SessionDraft {
        client_id: client_id.into(),
        elapsed_seconds: elapsed,
        ..SessionDraft::default()
    }
}

fn record() -> WorkoutLogRecord {
    WorkoutLogRecord {
        assignment_id: "assign-1".into(),
        day_index_completed: 0,
        performance_log: HashMap::new(),
        exercise_notes: HashMap::new(),
        elapsed_seconds: 0,
    }
}

#[tokio::test(start_paused = true)]
async fn test_rapid_checkpoints_keep_one_request_in_flight() {
    common::init_test_logging();
    let portal = Arc::new(InMemoryPortal::new());
    portal
        .set_save_delay(Some(Duration::from_millis(50)))
        .await;
    let gateway = Arc::new(DraftGateway::new(portal.clone()));

    let mut handles = Vec::new();
    for elapsed in 1..=10 {
        let gateway = Arc::clone(&gateway);
        handles.push(tokio::spawn(async move {
            gateway.checkpoint("c1", draft("c1", elapsed)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // one in flight plus at most one coalesced follow-up
    assert!(
        portal.save_calls() <= 2,
        "expected coalescing, saw {} saves",
        portal.save_calls()
    );
    let stored = portal.load_draft("c1").await.unwrap().unwrap();
    assert_eq!(stored.elapsed_seconds, 10);
}

#[tokio::test(start_paused = true)]
async fn test_finalize_serializes_after_pending_checkpoint() {
    common::init_test_logging();
    let portal = Arc::new(InMemoryPortal::new());
    portal
        .set_save_delay(Some(Duration::from_millis(50)))
        .await;
    let gateway = Arc::new(DraftGateway::new(portal.clone()));
    let reporter = CompletionReporter::new(portal.clone(), Arc::clone(&gateway));

    let racing = {
        let gateway = Arc::clone(&gateway);
        tokio::spawn(async move { gateway.checkpoint("c1", draft("c1", 120)).await })
    };
    // let the checkpoint reach its save before finalizing
    tokio::task::yield_now().await;

    let outcome = reporter.finalize("c1", record()).await.unwrap();
    assert!(!outcome.ack.log_id.is_empty());
    racing.await.unwrap().unwrap();

    // the racing checkpoint must not resurrect the draft after finalize
    assert!(!portal.has_draft("c1").await);
    assert_eq!(portal.submitted_logs().await.len(), 1);
}

#[tokio::test]
async fn test_discard_is_idempotent() {
    common::init_test_logging();
    let portal = Arc::new(InMemoryPortal::new());
    let gateway = DraftGateway::new(portal.clone());

    gateway.discard("c1").await.unwrap();
    gateway.checkpoint("c1", draft("c1", 5)).await.unwrap();
    gateway.discard("c1").await.unwrap();
    gateway.discard("c1").await.unwrap();
    assert!(!portal.has_draft("c1").await);
}

#[tokio::test]
async fn test_stale_draft_is_not_resumed() {
    let portal = common::portal_with_program("c1").await;
    let mut envelope = DraftEnvelope::now(draft("c1", 900));
    envelope.saved_at = Utc::now() - ChronoDuration::hours(30);
    portal.seed_draft(envelope).await;

    let mut session = WorkoutSession::with_backend(portal);
    let outcome = session.load_session("c1").await.unwrap();
    assert_eq!(outcome, LoadOutcome::Started { resumed: false });
    assert_eq!(session.elapsed_seconds(), 0);
}

#[tokio::test]
async fn test_checkpoint_overwrites_prior_draft() {
    common::init_test_logging();
    let portal = Arc::new(InMemoryPortal::new());
    let gateway = DraftGateway::new(portal.clone());

    gateway.checkpoint("c1", draft("c1", 10)).await.unwrap();
    gateway.checkpoint("c1", draft("c1", 20)).await.unwrap();
    let stored = portal.load_draft("c1").await.unwrap().unwrap();
    assert_eq!(stored.elapsed_seconds, 20);
}

#[tokio::test]
async fn test_drafts_are_isolated_per_client() {
    common::init_test_logging();
    let portal = Arc::new(InMemoryPortal::new());
    let gateway = DraftGateway::new(portal.clone());

    gateway.checkpoint("c1", draft("c1", 10)).await.unwrap();
    gateway.checkpoint("c2", draft("c2", 99)).await.unwrap();
    gateway.discard("c1").await.unwrap();

    assert!(!portal.has_draft("c1").await);
    let kept = portal.load_draft("c2").await.unwrap().unwrap();
    assert_eq!(kept.elapsed_seconds, 99);
}
