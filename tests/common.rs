// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides quiet logging setup and portal/program builders
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(dead_code)]

//! Shared test utilities for `workout_session_engine`

use std::sync::{Arc, Once};
use workout_session_engine::models::{
    ActiveProgram, Exercise, ExerciseGroup, SetEntry, WorkoutDay, WorkoutTemplate,
};
use workout_session_engine::portal::memory::InMemoryPortal;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// A two-day strength program with one group of two exercises per day
pub fn strength_program() -> ActiveProgram {
    ActiveProgram {
        assignment_id: "assign-1".into(),
        current_day_index: 0,
        template: WorkoutTemplate {
            id: "tmpl-1".into(),
            template_name: "Strength Block A".into(),
            days: vec![
                WorkoutDay {
                    name: "Day 1".into(),
                    groups: vec![ExerciseGroup {
                        name: "Main Lifts".into(),
                        exercises: vec![
                            Exercise {
                                id: "ex1".into(),
                                name: "Back Squat".into(),
                                instructions: Some("Pause at the bottom".into()),
                                default_sets: Some(vec![SetEntry::default(); 3]),
                            },
                            Exercise {
                                id: "ex2".into(),
                                name: "Bench Press".into(),
                                instructions: None,
                                default_sets: None,
                            },
                        ],
                    }],
                },
                WorkoutDay {
                    name: "Day 2".into(),
                    groups: vec![ExerciseGroup {
                        name: "Pull".into(),
                        exercises: vec![Exercise {
                            id: "ex3".into(),
                            name: "Deadlift".into(),
                            instructions: None,
                            default_sets: None,
                        }],
                    }],
                },
            ],
        },
    }
}

/// An in-memory portal with `strength_program` assigned to the client
pub async fn portal_with_program(client_id: &str) -> Arc<InMemoryPortal> {
    init_test_logging();
    let portal = Arc::new(InMemoryPortal::new());
    portal.assign_program(client_id, strength_program()).await;
    portal
}
