use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::AnxietyRating;
use crate::prompts::PromptSet;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Errors from writing into an in-progress session draft.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionDraftError {
    #[error("write at index {index} would leave a gap (recorded: {len})")]
    SparseWrite { index: usize, len: usize },
}

/// Errors from finalizing or rehydrating a completed session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("worry text is empty")]
    EmptyWorry,

    #[error("initial anxiety rating was never taken")]
    MissingInitialRating,

    #[error("final anxiety rating was never taken")]
    MissingFinalRating,

    #[error("expected {expected} exposure answers, found {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("expected {expected} reflections, found {actual}")]
    ReflectionCountMismatch { expected: usize, actual: usize },

    #[error("completed_at is before started_at")]
    InvalidTimeRange,
}

//
// ─── IN-PROGRESS DRAFT ─────────────────────────────────────────────────────────
//

/// Mutable working state for the session currently moving through the wizard.
///
/// Answers and reflections are written strictly in prompt order: a write either
/// appends at the next free index or overwrites an index that already holds a
/// value (the re-edit path after `back`). Sparse writes are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDraft {
    worry: String,
    duration_minutes: u32,
    initial_anxiety: Option<AnxietyRating>,
    final_anxiety: Option<AnxietyRating>,
    answers: Vec<String>,
    reflections: Vec<String>,
    elapsed_seconds: u64,
}

impl SessionDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_worry(&mut self, worry: impl Into<String>) {
        self.worry = worry.into();
    }

    pub fn set_duration_minutes(&mut self, minutes: u32) {
        self.duration_minutes = minutes;
    }

    pub fn set_initial_anxiety(&mut self, rating: AnxietyRating) {
        self.initial_anxiety = Some(rating);
    }

    /// Set or overwrite the post-exposure rating. The wizard takes this once
    /// after the exposure prompts and again after reflection; the later value
    /// wins.
    pub fn set_final_anxiety(&mut self, rating: AnxietyRating) {
        self.final_anxiety = Some(rating);
    }

    /// Store the answer for exposure prompt `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionDraftError::SparseWrite` if `index` is past the next
    /// free slot.
    pub fn record_answer(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), SessionDraftError> {
        Self::write_in_order(&mut self.answers, index, text.into())
    }

    /// Store the answer for reflection question `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionDraftError::SparseWrite` if `index` is past the next
    /// free slot.
    pub fn record_reflection(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), SessionDraftError> {
        Self::write_in_order(&mut self.reflections, index, text.into())
    }

    fn write_in_order(
        slots: &mut Vec<String>,
        index: usize,
        text: String,
    ) -> Result<(), SessionDraftError> {
        match index.cmp(&slots.len()) {
            std::cmp::Ordering::Less => {
                slots[index] = text;
                Ok(())
            }
            std::cmp::Ordering::Equal => {
                slots.push(text);
                Ok(())
            }
            std::cmp::Ordering::Greater => Err(SessionDraftError::SparseWrite {
                index,
                len: slots.len(),
            }),
        }
    }

    /// Add one second of wall-clock exposure/reflection time.
    pub fn add_elapsed_second(&mut self) {
        self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
    }

    #[must_use]
    pub fn worry(&self) -> &str {
        &self.worry
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn initial_anxiety(&self) -> Option<AnxietyRating> {
        self.initial_anxiety
    }

    #[must_use]
    pub fn final_anxiety(&self) -> Option<AnxietyRating> {
        self.final_anxiety
    }

    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn reflection(&self, index: usize) -> Option<&str> {
        self.reflections.get(index).map(String::as_str)
    }

    /// Number of exposure answers recorded so far.
    #[must_use]
    pub fn answers_recorded(&self) -> usize {
        self.answers.len()
    }

    /// Number of reflections recorded so far.
    #[must_use]
    pub fn reflections_recorded(&self) -> usize {
        self.reflections.len()
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    /// Convert the draft into an immutable `Session`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if either rating is missing, either sequence is
    /// shorter than its prompt list, the worry is empty, or the time range is
    /// inverted.
    pub fn finalize(
        self,
        prompts: &PromptSet,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Session, SessionError> {
        let initial = self
            .initial_anxiety
            .ok_or(SessionError::MissingInitialRating)?;
        let final_ = self.final_anxiety.ok_or(SessionError::MissingFinalRating)?;

        if self.answers.len() != prompts.exposure_len() {
            return Err(SessionError::AnswerCountMismatch {
                expected: prompts.exposure_len(),
                actual: self.answers.len(),
            });
        }
        if self.reflections.len() != prompts.reflection_len() {
            return Err(SessionError::ReflectionCountMismatch {
                expected: prompts.reflection_len(),
                actual: self.reflections.len(),
            });
        }

        Session::from_persisted(
            self.worry,
            self.duration_minutes,
            initial,
            final_,
            self.answers,
            self.reflections,
            self.elapsed_seconds,
            started_at,
            completed_at,
        )
    }
}

//
// ─── COMPLETED SESSION ─────────────────────────────────────────────────────────
//

/// One completed pass through the wizard, as persisted to history.
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    worry: String,
    duration_minutes: u32,
    initial_anxiety: AnxietyRating,
    final_anxiety: AnxietyRating,
    answers: Vec<String>,
    reflections: Vec<String>,
    elapsed_seconds: u64,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl Session {
    /// Rehydrate a session from persisted storage.
    ///
    /// Answer/reflection counts are not checked here: the catalog a historical
    /// session was recorded against may differ from the current one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyWorry` or `SessionError::InvalidTimeRange`.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        worry: String,
        duration_minutes: u32,
        initial_anxiety: AnxietyRating,
        final_anxiety: AnxietyRating,
        answers: Vec<String>,
        reflections: Vec<String>,
        elapsed_seconds: u64,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if worry.trim().is_empty() {
            return Err(SessionError::EmptyWorry);
        }
        if completed_at < started_at {
            return Err(SessionError::InvalidTimeRange);
        }

        Ok(Self {
            worry,
            duration_minutes,
            initial_anxiety,
            final_anxiety,
            answers,
            reflections,
            elapsed_seconds,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn worry(&self) -> &str {
        &self.worry
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn initial_anxiety(&self) -> AnxietyRating {
        self.initial_anxiety
    }

    #[must_use]
    pub fn final_anxiety(&self) -> AnxietyRating {
        self.final_anxiety
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[must_use]
    pub fn reflections(&self) -> &[String] {
        &self.reflections
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// `initial - final`; positive values indicate anxiety reduction.
    #[must_use]
    pub fn anxiety_delta(&self) -> i16 {
        AnxietyRating::delta(self.initial_anxiety, self.final_anxiety)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
