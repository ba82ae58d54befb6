// ABOUTME: Per-exercise free-text notes store, persisted alongside the set ledger
// ABOUTME: One note per exercise, overwritten wholesale on edit
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Notes Store
//!
//! Per-exercise annotation map, kept structurally parallel to the set ledger
//! because both travel in the same draft and final log payloads.

use crate::models::ExerciseNotes;
use serde::{Deserialize, Serialize};

/// Free-text notes for the exercises of one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotesStore {
    notes: ExerciseNotes,
}

impl NotesStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from persisted notes
    #[must_use]
    pub fn from_notes(notes: ExerciseNotes) -> Self {
        Self { notes }
    }

    /// Snapshot the notes, e.g. for a draft or final log record
    #[must_use]
    pub fn to_notes(&self) -> ExerciseNotes {
        self.notes.clone()
    }

    /// The stored note for an exercise, empty string when none
    #[must_use]
    pub fn note(&self, exercise_id: &str) -> &str {
        self.notes.get(exercise_id).map_or("", String::as_str)
    }

    /// Overwrite the note for an exercise
    pub fn set_note(&mut self, exercise_id: &str, text: impl Into<String>) {
        self.notes.insert(exercise_id.to_owned(), text.into());
    }
}
