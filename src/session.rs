// ABOUTME: Session state machine composing clock, set ledger, and notes into one workout
// ABOUTME: Governs the Idle -> Active -> Finalized lifecycle against the portal collaborators
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Workout Session State Machine
//!
//! Owns the active program reference and composes [`WorkoutClock`],
//! [`SetLedger`], and [`NotesStore`] into one in-progress session.
//!
//! Lifecycle: `Idle` until [`WorkoutSession::load_session`] finds a real
//! assigned program, then `Active` for the duration of the workout (pausing
//! the clock is not a state change), then `Finalized` once the log has been
//! submitted and the draft cleared. `Finalized` is terminal; a fresh
//! `load_session` starts the next workout. [`WorkoutSession::abandon`] is the
//! explicit way out of `Active` without logging anything.
//!
//! In-memory state is authoritative for display at all times; persistence is
//! one-directional (local to remote) except at `load_session` time.

use crate::clock::WorkoutClock;
use crate::draft::DraftGateway;
use crate::errors::{AppError, AppResult};
use crate::ledger::SetLedger;
use crate::models::{
    ActiveProgram, FieldValue, SessionDraft, SetEntry, SetField, WorkoutLogRecord,
};
use crate::notes::NotesStore;
use crate::portal::{ProgramProvider, SessionStore, WorkoutHistory};
use crate::reporter::{CompletionReporter, FinalizeOutcome};
use std::sync::Arc;
use tracing::{debug, info};

/// Context carried while a session is active
#[derive(Debug, Clone)]
pub struct ActiveContext {
    /// Client running the session
    pub client_id: String,
    /// The program assignment being worked through
    pub program: ActiveProgram,
}

/// Lifecycle state of a session
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No active template loaded
    Idle,
    /// Template loaded, ledger and notes mutable, clock may run
    Active(ActiveContext),
    /// Log submitted and draft cleared; terminal
    Finalized,
}

/// What `load_session` found for the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No real program is assigned; the machine stays idle and the caller
    /// should say so instead of silently starting a session
    NoProgram,
    /// A session started
    Started {
        /// True when an existing draft was rehydrated
        resumed: bool,
    },
}

/// One client's in-progress workout session
pub struct WorkoutSession {
    programs: Arc<dyn ProgramProvider>,
    drafts: Arc<DraftGateway>,
    reporter: CompletionReporter,
    clock: WorkoutClock,
    ledger: SetLedger,
    notes: NotesStore,
    state: SessionState,
}

impl WorkoutSession {
    /// Create an idle session over the three portal collaborators
    #[must_use]
    pub fn new(
        programs: Arc<dyn ProgramProvider>,
        store: Arc<dyn SessionStore>,
        history: Arc<dyn WorkoutHistory>,
    ) -> Self {
        let drafts = Arc::new(DraftGateway::new(store));
        let reporter = CompletionReporter::new(history, Arc::clone(&drafts));
        Self {
            programs,
            drafts,
            reporter,
            clock: WorkoutClock::new(),
            ledger: SetLedger::new(),
            notes: NotesStore::new(),
            state: SessionState::Idle,
        }
    }

    /// Create an idle session over one backend implementing all collaborator
    /// contracts
    #[must_use]
    pub fn with_backend<B>(backend: Arc<B>) -> Self
    where
        B: ProgramProvider + SessionStore + WorkoutHistory + 'static,
    {
        Self::new(
            Arc::clone(&backend) as Arc<dyn ProgramProvider>,
            Arc::clone(&backend) as Arc<dyn SessionStore>,
            backend as Arc<dyn WorkoutHistory>,
        )
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Whether a workout is in progress
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    /// Client of the active session, if any
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Active(ctx) => Some(&ctx.client_id),
            _ => None,
        }
    }

    /// Program of the active session, if any
    #[must_use]
    pub fn program(&self) -> Option<&ActiveProgram> {
        match &self.state {
            SessionState::Active(ctx) => Some(&ctx.program),
            _ => None,
        }
    }

    /// Start a session for a client, resuming any saved draft.
    ///
    /// Fetches the assigned program first; when nothing real is assigned the
    /// machine stays idle and reports [`LoadOutcome::NoProgram`]. A fetch
    /// failure surfaces as `LoadFailed` and leaves no partial state behind.
    pub async fn load_session(&mut self, client_id: &str) -> AppResult<LoadOutcome> {
        let program = self
            .programs
            .active_program(client_id)
            .await
            .map_err(|e| {
                AppError::load_failed(format!(
                    "active program fetch failed for client {client_id}"
                ))
                .with_source(e)
            })?;

        let Some(program) = program.filter(|p| !p.template.is_placeholder()) else {
            debug!(client_id, "no real program assigned, staying idle");
            self.reset_components();
            self.state = SessionState::Idle;
            return Ok(LoadOutcome::NoProgram);
        };

        let draft = self.drafts.load(client_id).await.map_err(|e| {
            AppError::load_failed(format!("draft fetch failed for client {client_id}"))
                .with_source(e)
        })?;

        let resumed = draft.is_some();
        match draft {
            Some(draft) => {
                self.ledger = SetLedger::from_log(draft.performance_log);
                self.notes = NotesStore::from_notes(draft.exercise_notes);
                self.clock = WorkoutClock::with_elapsed(draft.elapsed_seconds);
            }
            None => self.reset_components(),
        }
        info!(
            client_id,
            assignment_id = %program.assignment_id,
            resumed,
            "workout session started"
        );
        self.state = SessionState::Active(ActiveContext {
            client_id: client_id.to_owned(),
            program,
        });
        Ok(LoadOutcome::Started { resumed })
    }

    /// Start or resume the workout clock
    pub fn start_clock(&mut self) -> AppResult<()> {
        self.require_active("start the clock")?;
        self.clock.start();
        Ok(())
    }

    /// Pause the workout clock; the session stays active
    pub fn stop_clock(&mut self) -> AppResult<()> {
        self.require_active("stop the clock")?;
        self.clock.stop();
        Ok(())
    }

    /// Stop and zero the workout clock
    pub fn reset_clock(&mut self) -> AppResult<()> {
        self.require_active("reset the clock")?;
        self.clock.reset();
        Ok(())
    }

    /// Whether the clock is running
    #[must_use]
    pub fn clock_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Current elapsed reading in whole seconds
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.clock.elapsed_seconds()
    }

    /// Current elapsed reading rendered as `HH:MM:SS`
    #[must_use]
    pub fn formatted_time(&self) -> String {
        self.clock.formatted()
    }

    /// The set list to display for an exercise, using the template's
    /// suggested sets as the fallback when nothing is recorded yet
    pub fn sets(&self, exercise_id: &str) -> AppResult<Vec<SetEntry>> {
        let ctx = self.active("read sets")?;
        let fallback = ctx
            .program
            .find_exercise(exercise_id)
            .and_then(|exercise| exercise.default_sets.as_deref());
        Ok(self.ledger.sets(exercise_id, fallback))
    }

    /// Write one numeric field of a set entry
    pub fn update_set_field(
        &mut self,
        exercise_id: &str,
        set_index: usize,
        field: SetField,
        value: impl Into<FieldValue>,
    ) -> AppResult<()> {
        self.require_active("update a set")?;
        self.ledger.update_field(exercise_id, set_index, field, value);
        Ok(())
    }

    /// Flip the completion flag of a set entry
    pub fn toggle_set_completed(&mut self, exercise_id: &str, set_index: usize) -> AppResult<()> {
        self.require_active("toggle a set")?;
        self.ledger.toggle_completed(exercise_id, set_index);
        Ok(())
    }

    /// Append one empty set to an exercise
    pub fn append_set(&mut self, exercise_id: &str) -> AppResult<()> {
        self.require_active("add a set")?;
        self.ledger.append_set(exercise_id);
        Ok(())
    }

    /// The stored note for an exercise, empty when none
    pub fn note(&self, exercise_id: &str) -> AppResult<&str> {
        self.require_active("read a note")?;
        Ok(self.notes.note(exercise_id))
    }

    /// Overwrite the note for an exercise
    pub fn set_note(&mut self, exercise_id: &str, text: impl Into<String>) -> AppResult<()> {
        self.require_active("edit a note")?;
        self.notes.set_note(exercise_id, text);
        Ok(())
    }

    /// Snapshot the current state as a resumable draft
    pub fn draft(&self) -> AppResult<SessionDraft> {
        let ctx = self.active("snapshot a draft")?;
        Ok(SessionDraft {
            client_id: ctx.client_id.clone(),
            performance_log: self.ledger.to_log(),
            exercise_notes: self.notes.to_notes(),
            elapsed_seconds: self.clock.elapsed_seconds(),
        })
    }

    /// Persist the current snapshot through the draft gateway.
    ///
    /// Failures are non-fatal (`CheckpointFailed`): the session continues and
    /// the caller should warn that progress may not be saved.
    pub async fn checkpoint(&self) -> AppResult<()> {
        let draft = self.draft()?;
        let client_id = draft.client_id.clone();
        self.drafts.checkpoint(&client_id, draft).await
    }

    /// Finalize the session: stop the clock, submit the immutable log, clear
    /// the draft, and transition to `Finalized`.
    ///
    /// On submission failure the session stays `Active` and resumable, the
    /// draft is retained, and the error surfaces as `CompletionFailed`. Once
    /// the log is submitted the session is `Finalized` even when the draft
    /// cleanup afterwards fails (see [`FinalizeOutcome::draft_cleared`]), so
    /// retrying cannot submit a duplicate record.
    pub async fn complete(&mut self) -> AppResult<FinalizeOutcome> {
        let ctx = self.active("complete the workout")?.clone();

        // Stopped regardless of prior running state; on failure the user can
        // restart it along with the retry.
        self.clock.stop();

        let record = WorkoutLogRecord {
            assignment_id: ctx.program.assignment_id.clone(),
            day_index_completed: ctx.program.current_day_index,
            performance_log: self.ledger.to_log(),
            exercise_notes: self.notes.to_notes(),
            elapsed_seconds: self.clock.elapsed_seconds(),
        };

        let outcome = self.reporter.finalize(&ctx.client_id, record).await?;
        self.state = SessionState::Finalized;
        Ok(outcome)
    }

    /// Explicitly walk away from an active session, discarding the draft.
    ///
    /// A no-op from `Idle`; not available once `Finalized`.
    pub async fn abandon(&mut self) -> AppResult<()> {
        let ctx = match &self.state {
            SessionState::Idle => return Ok(()),
            SessionState::Finalized => {
                return Err(AppError::invalid_transition(
                    "cannot abandon a finalized session",
                ))
            }
            SessionState::Active(ctx) => ctx.clone(),
        };
        self.drafts.discard(&ctx.client_id).await?;
        info!(client_id = %ctx.client_id, "workout session abandoned");
        self.reset_components();
        self.state = SessionState::Idle;
        Ok(())
    }

    fn reset_components(&mut self) {
        self.clock.reset();
        self.ledger = SetLedger::new();
        self.notes = NotesStore::new();
    }

    fn active(&self, operation: &str) -> AppResult<&ActiveContext> {
        match &self.state {
            SessionState::Active(ctx) => Ok(ctx),
            SessionState::Idle => Err(AppError::invalid_transition(format!(
                "cannot {operation}: no active session"
            ))),
            SessionState::Finalized => Err(AppError::invalid_transition(format!(
                "cannot {operation}: session already finalized"
            ))),
        }
    }

    fn require_active(&self, operation: &str) -> AppResult<()> {
        self.active(operation).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;
    use crate::models::{Exercise, ExerciseGroup, WorkoutDay, WorkoutTemplate};
    use crate::portal::memory::InMemoryPortal;

    fn program() -> ActiveProgram {
        ActiveProgram {
            assignment_id: "a1".into(),
            current_day_index: 0,
            template: WorkoutTemplate {
                id: "t1".into(),
                template_name: "Strength Block".into(),
                days: vec![WorkoutDay {
                    name: "Day 1".into(),
                    groups: vec![ExerciseGroup {
                        name: "Main".into(),
                        exercises: vec![Exercise {
                            id: "ex1".into(),
                            name: "Back Squat".into(),
                            instructions: None,
                            default_sets: Some(vec![SetEntry::default(); 3]),
                        }],
                    }],
                }],
            },
        }
    }

    #[tokio::test]
    async fn test_mutations_require_active_session() {
        let portal = Arc::new(InMemoryPortal::new());
        let mut session = WorkoutSession::with_backend(portal);
        let error = session.append_set("ex1").unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidTransition);
        assert!(session.start_clock().is_err());
        assert!(session.set_note("ex1", "x").is_err());
        // reads that depend on session context are guarded the same way
        assert!(session.sets("ex1").is_err());
        assert!(session.note("ex1").is_err());
    }

    #[tokio::test]
    async fn test_complete_without_session_fails_loudly() {
        let portal = Arc::new(InMemoryPortal::new());
        let mut session = WorkoutSession::with_backend(portal);
        let error = session.complete().await.unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidTransition);
    }

    #[tokio::test]
    async fn test_no_program_stays_idle() {
        let portal = Arc::new(InMemoryPortal::new());
        let mut session = WorkoutSession::with_backend(portal);
        let outcome = session.load_session("c1").await.unwrap();
        assert_eq!(outcome, LoadOutcome::NoProgram);
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn test_placeholder_program_stays_idle() {
        let portal = Arc::new(InMemoryPortal::new());
        let mut placeholder = program();
        placeholder.template.id = "default-empty".into();
        portal.assign_program("c1", placeholder).await;
        let mut session = WorkoutSession::with_backend(portal);
        assert_eq!(
            session.load_session("c1").await.unwrap(),
            LoadOutcome::NoProgram
        );
    }

    #[tokio::test]
    async fn test_fresh_session_starts_empty() {
        let portal = Arc::new(InMemoryPortal::new());
        portal.assign_program("c1", program()).await;
        let mut session = WorkoutSession::with_backend(portal);
        let outcome = session.load_session("c1").await.unwrap();
        assert_eq!(outcome, LoadOutcome::Started { resumed: false });
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(session.client_id(), Some("c1"));
    }

    #[tokio::test]
    async fn test_sets_fall_back_to_template_suggestion() {
        let portal = Arc::new(InMemoryPortal::new());
        portal.assign_program("c1", program()).await;
        let mut session = WorkoutSession::with_backend(portal);
        session.load_session("c1").await.unwrap();
        // ex1 carries 3 suggested sets in the template
        assert_eq!(session.sets("ex1").unwrap().len(), 3);
        // unknown exercise falls back to the single empty set
        assert_eq!(session.sets("ex9").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_finalized_session_rejects_further_mutation() {
        let portal = Arc::new(InMemoryPortal::new());
        portal.assign_program("c1", program()).await;
        let mut session = WorkoutSession::with_backend(portal);
        session.load_session("c1").await.unwrap();
        session.append_set("ex1").unwrap();
        session.complete().await.unwrap();

        let error = session.append_set("ex1").unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidTransition);
        assert!(session.checkpoint().await.is_err());
        assert!(session.abandon().await.is_err());
    }

    #[tokio::test]
    async fn test_abandon_discards_draft_and_returns_to_idle() {
        let portal = Arc::new(InMemoryPortal::new());
        portal.assign_program("c1", program()).await;
        let mut session = WorkoutSession::with_backend(portal.clone());
        session.load_session("c1").await.unwrap();
        session.append_set("ex1").unwrap();
        session.checkpoint().await.unwrap();
        assert!(portal.has_draft("c1").await);

        session.abandon().await.unwrap();
        assert!(!session.is_active());
        assert!(!portal.has_draft("c1").await);
        // abandon from idle is a no-op
        session.abandon().await.unwrap();
    }
}
