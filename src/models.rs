// ABOUTME: Data model for workout templates, set entries, session drafts, and log records
// ABOUTME: Serde wire shapes match the portal backend's JSON payloads
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Session Engine Data Model
//!
//! Common data structures shared by the engine components and the portal
//! collaborators. The trainer-authored [`WorkoutTemplate`] is read-only input;
//! the engine produces [`SessionDraft`] snapshots while a workout is in
//! progress and exactly one immutable [`WorkoutLogRecord`] when it completes.

use crate::constants::templates::DEFAULT_EMPTY_TEMPLATE_ID;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Performance data for a whole session: exercise id to ordered set list
pub type PerformanceLog = HashMap<String, Vec<SetEntry>>;

/// Free-text annotations: exercise id to note text
pub type ExerciseNotes = HashMap<String, String>;

/// A weight or reps value as entered by the user
///
/// Numeric fields start out empty and may hold whatever the user typed, so the
/// value is a number *or* a string *or* the not-yet-entered empty string. The
/// untagged representation round-trips losslessly through JSON: numbers stay
/// numbers, strings stay strings, empty stays `""`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Whole-number entry (reps, most barbell weights)
    Int(i64),
    /// Fractional entry (2.5 kg plates exist)
    Float(f64),
    /// Raw text, including the empty not-yet-entered state
    Text(String),
}

impl FieldValue {
    /// True for the not-yet-entered empty state
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.is_empty())
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(value) => write!(f, "{value}"),
            FieldValue::Float(value) => write!(f, "{value}"),
            FieldValue::Text(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// The two mutable numeric fields of a set entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetField {
    /// Weight moved in the set
    Weight,
    /// Repetitions performed in the set
    Reps,
}

impl SetField {
    /// Field name as it appears on the wire
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SetField::Weight => "weight",
            SetField::Reps => "reps",
        }
    }
}

/// One logged set for one exercise
///
/// Weight/reps and the completion flag are independent: mutating one never
/// touches the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    /// Weight moved, empty until entered
    #[serde(default)]
    pub weight: FieldValue,
    /// Reps performed, empty until entered
    #[serde(default)]
    pub reps: FieldValue,
    /// Whether the user marked the set done
    #[serde(default)]
    pub completed: bool,
}

/// One exercise inside a template group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Stable exercise identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional trainer instructions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    /// Trainer-suggested starting set list, used as the ledger fallback
    #[serde(default, rename = "sets", skip_serializing_if = "Option::is_none")]
    pub default_sets: Option<Vec<SetEntry>>,
}

/// An ordered group of exercises within a day (superset, circuit, plain block)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseGroup {
    /// Group display name
    #[serde(default)]
    pub name: String,
    /// Ordered exercises in this group
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

/// One training day of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    /// Day display name
    #[serde(default)]
    pub name: String,
    /// Ordered exercise groups
    #[serde(default)]
    pub groups: Vec<ExerciseGroup>,
}

/// Trainer-authored workout template (external, read-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplate {
    /// Stable template identifier
    pub id: String,
    /// Template display name
    #[serde(default)]
    pub template_name: String,
    /// Ordered training days
    #[serde(default)]
    pub days: Vec<WorkoutDay>,
}

impl WorkoutTemplate {
    /// True when this is the backend's "nothing assigned" placeholder
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.id == DEFAULT_EMPTY_TEMPLATE_ID || self.days.is_empty()
    }
}

/// The active program assignment for a client: template plus progress cursor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProgram {
    /// Assignment identifier, recorded on the final log
    pub assignment_id: String,
    /// Index of the day the client is currently on
    #[serde(default)]
    pub current_day_index: u32,
    /// The assigned template
    #[serde(rename = "workout")]
    pub template: WorkoutTemplate,
}

impl ActiveProgram {
    /// The day the client is on, falling back to the first day when the
    /// cursor points past the end of the template
    #[must_use]
    pub fn current_day(&self) -> Option<&WorkoutDay> {
        self.template
            .days
            .get(self.current_day_index as usize)
            .or_else(|| self.template.days.first())
    }

    /// Look up an exercise anywhere in the template by id
    #[must_use]
    pub fn find_exercise(&self, exercise_id: &str) -> Option<&Exercise> {
        self.template
            .days
            .iter()
            .flat_map(|day| &day.groups)
            .flat_map(|group| &group.exercises)
            .find(|exercise| exercise.id == exercise_id)
    }
}

/// Resumable snapshot of an in-progress session
///
/// Exactly one draft exists per client; saving overwrites any prior draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDraft {
    /// Client the draft belongs to
    pub client_id: String,
    /// Per-exercise set progress
    #[serde(default)]
    pub performance_log: PerformanceLog,
    /// Per-exercise notes
    #[serde(default)]
    pub exercise_notes: ExerciseNotes,
    /// Workout clock reading at snapshot time
    #[serde(default)]
    pub elapsed_seconds: u64,
}

/// Storage envelope around a draft, carrying the save timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftEnvelope {
    /// When the draft was saved
    #[serde(rename = "timestamp")]
    pub saved_at: DateTime<Utc>,
    /// Client the draft belongs to
    pub client_id: String,
    /// The draft itself
    pub workout_data: SessionDraft,
}

impl DraftEnvelope {
    /// Wrap a draft with the current timestamp
    #[must_use]
    pub fn now(draft: SessionDraft) -> Self {
        Self {
            saved_at: Utc::now(),
            client_id: draft.client_id.clone(),
            workout_data: draft,
        }
    }

    /// True when the draft is older than `max_age_hours` and should be
    /// treated as absent
    #[must_use]
    pub fn is_stale(&self, max_age_hours: i64) -> bool {
        Utc::now() - self.saved_at > Duration::hours(max_age_hours)
    }
}

/// Immutable record of a completed workout, created only on finalize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutLogRecord {
    /// Program assignment the workout belongs to
    pub assignment_id: String,
    /// Which day of the template was completed
    pub day_index_completed: u32,
    /// Final per-exercise set data
    pub performance_log: PerformanceLog,
    /// Final per-exercise notes
    pub exercise_notes: ExerciseNotes,
    /// Total workout duration in seconds
    pub elapsed_seconds: u64,
}

/// Acknowledgement for a submitted workout log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogAck {
    /// Identifier of the created history record
    pub log_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_round_trips_losslessly() {
        let entry = SetEntry {
            weight: FieldValue::Float(42.5),
            reps: FieldValue::Int(10),
            completed: true,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("42.5"));
        assert!(json.contains("10"));
        let back: SetEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_empty_field_value_round_trips_as_empty_string() {
        let entry = SetEntry::default();
        let json = serde_json::to_string(&entry).unwrap();
        let back: SetEntry = serde_json::from_str(&json).unwrap();
        assert!(back.weight.is_empty());
        assert!(back.reps.is_empty());
        assert!(!back.completed);
    }

    #[test]
    fn test_field_value_parses_numbers_and_text() {
        let reps: FieldValue = serde_json::from_str("10").unwrap();
        assert_eq!(reps, FieldValue::Int(10));
        let weight: FieldValue = serde_json::from_str("42.5").unwrap();
        assert_eq!(weight, FieldValue::Float(42.5));
        let raw: FieldValue = serde_json::from_str("\"8-12\"").unwrap();
        assert_eq!(raw, FieldValue::Text("8-12".into()));
    }

    #[test]
    fn test_placeholder_template_detection() {
        let placeholder = WorkoutTemplate {
            id: "default-empty".into(),
            template_name: String::new(),
            days: vec![WorkoutDay {
                name: "Day 1".into(),
                groups: Vec::new(),
            }],
        };
        assert!(placeholder.is_placeholder());

        let dayless = WorkoutTemplate {
            id: "t1".into(),
            template_name: "Strength".into(),
            days: Vec::new(),
        };
        assert!(dayless.is_placeholder());
    }

    #[test]
    fn test_current_day_falls_back_to_first_day() {
        let program = ActiveProgram {
            assignment_id: "a1".into(),
            current_day_index: 5,
            template: WorkoutTemplate {
                id: "t1".into(),
                template_name: "Strength".into(),
                days: vec![WorkoutDay {
                    name: "Day 1".into(),
                    groups: Vec::new(),
                }],
            },
        };
        assert_eq!(program.current_day().map(|d| d.name.as_str()), Some("Day 1"));
    }

    #[test]
    fn test_draft_staleness() {
        let mut envelope = DraftEnvelope::now(SessionDraft {
            client_id: "c1".into(),
            ..SessionDraft::default()
        });
        assert!(!envelope.is_stale(24));
        envelope.saved_at = Utc::now() - Duration::hours(25);
        assert!(envelope.is_stale(24));
    }
}
