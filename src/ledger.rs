// ABOUTME: Append-only per-exercise set ledger with field updates and completion toggles
// ABOUTME: Set lists only grow; reads past the end synthesize default entries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Set Ledger
//!
//! Per-exercise, per-set performance record. A logged session is an append-only
//! record of what was attempted: there is no delete operation and set lists
//! never shrink. Addressing a set beyond the current length pads the list with
//! default entries (on write) or synthesizes one (on read) rather than erroring.

use crate::models::{FieldValue, PerformanceLog, SetEntry, SetField};
use serde::{Deserialize, Serialize};

/// Mutable set-performance store for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetLedger {
    log: PerformanceLog,
}

impl SetLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate a ledger from persisted performance data
    #[must_use]
    pub fn from_log(log: PerformanceLog) -> Self {
        Self { log }
    }

    /// Borrow the underlying performance data
    #[must_use]
    pub fn as_log(&self) -> &PerformanceLog {
        &self.log
    }

    /// Snapshot the performance data, e.g. for a draft or final log record
    #[must_use]
    pub fn to_log(&self) -> PerformanceLog {
        self.log.clone()
    }

    /// Whether any sets have been recorded for any exercise
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Number of sets currently recorded for an exercise
    #[must_use]
    pub fn set_count(&self, exercise_id: &str) -> usize {
        self.log.get(exercise_id).map_or(0, Vec::len)
    }

    /// The set list to display for an exercise.
    ///
    /// Precedence: recorded progress wins; with nothing recorded the
    /// template's suggested sets are returned verbatim when supplied;
    /// otherwise exactly one default empty set.
    #[must_use]
    pub fn sets(&self, exercise_id: &str, fallback: Option<&[SetEntry]>) -> Vec<SetEntry> {
        if let Some(recorded) = self.log.get(exercise_id) {
            if !recorded.is_empty() {
                return recorded.clone();
            }
        }
        match fallback {
            Some(suggested) if !suggested.is_empty() => suggested.to_vec(),
            _ => vec![SetEntry::default()],
        }
    }

    /// The entry at `set_index`, synthesizing a default beyond the current
    /// length instead of erroring
    #[must_use]
    pub fn set_at(&self, exercise_id: &str, set_index: usize) -> SetEntry {
        self.log
            .get(exercise_id)
            .and_then(|sets| sets.get(set_index))
            .cloned()
            .unwrap_or_default()
    }

    /// Write `value` into one numeric field of the entry at `set_index`,
    /// creating default entries up to that index first if absent. Never
    /// touches the completion flag.
    pub fn update_field(
        &mut self,
        exercise_id: &str,
        set_index: usize,
        field: SetField,
        value: impl Into<FieldValue>,
    ) {
        let entry = self.entry_mut(exercise_id, set_index);
        match field {
            SetField::Weight => entry.weight = value.into(),
            SetField::Reps => entry.reps = value.into(),
        }
    }

    /// Flip the completion flag of the entry at `set_index`, creating default
    /// entries up to that index first if absent. Never touches weight/reps.
    pub fn toggle_completed(&mut self, exercise_id: &str, set_index: usize) {
        let entry = self.entry_mut(exercise_id, set_index);
        entry.completed = !entry.completed;
    }

    /// Append one default entry to the exercise's set list
    pub fn append_set(&mut self, exercise_id: &str) {
        self.log
            .entry(exercise_id.to_owned())
            .or_default()
            .push(SetEntry::default());
    }

    fn entry_mut(&mut self, exercise_id: &str, set_index: usize) -> &mut SetEntry {
        let sets = self.log.entry(exercise_id.to_owned()).or_default();
        while sets.len() <= set_index {
            sets.push(SetEntry::default());
        }
        &mut sets[set_index]
    }
}
